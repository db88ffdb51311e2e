//! # Dataset Module
//!
//! The in-memory collection of well records and the lookups built on it.
//!
//! Lookups are linear scans; the network is a few hundred wells.

use crate::WellRecord;

/// An ordered collection of well records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<WellRecord>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<WellRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[WellRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a new set of records, returning the old ones.
    pub fn replace(&mut self, records: Vec<WellRecord>) -> Vec<WellRecord> {
        std::mem::replace(&mut self.records, records)
    }

    /// Well with exactly this id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&WellRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Wells whose district equals `district`, ignoring case.
    #[must_use]
    pub fn in_district(&self, district: &str) -> Vec<&WellRecord> {
        let wanted = district.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.district.to_lowercase() == wanted)
            .collect()
    }

    /// Wells whose region contains `fragment`, ignoring case.
    #[must_use]
    pub fn in_region(&self, fragment: &str) -> Vec<&WellRecord> {
        let wanted = fragment.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.region.to_lowercase().contains(&wanted))
            .collect()
    }

    /// Distinct non-empty districts in first-seen order.
    #[must_use]
    pub fn districts(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.district.as_str()))
    }

    /// Distinct non-empty regions in first-seen order.
    #[must_use]
    pub fn regions(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    // =========================================================================
    // FREE-TEXT MENTIONS
    // =========================================================================

    /// Well whose id or name appears in `text` (already lowercased).
    ///
    /// The longest matching id or name wins, so "well 12" is not mistaken
    /// for "well 1".
    #[must_use]
    pub fn mentioned_well(&self, text: &str) -> Option<&WellRecord> {
        self.records
            .iter()
            .filter_map(|r| {
                let id_len = match_len(text, &r.id);
                let name_len = match_len(text, &r.name);
                let best = id_len.max(name_len);
                (best > 0).then_some((best, r))
            })
            .fold(None, |best: Option<(usize, &WellRecord)>, candidate| {
                match best {
                    Some((len, _)) if len >= candidate.0 => best,
                    _ => Some(candidate),
                }
            })
            .map(|(_, r)| r)
    }

    /// First district (in dataset order) named in `text` (already lowercased).
    #[must_use]
    pub fn mentioned_district(&self, text: &str) -> Option<&str> {
        self.districts()
            .into_iter()
            .find(|d| text.contains(&d.to_lowercase()))
    }

    /// First region (in dataset order) named in `text` (already lowercased).
    #[must_use]
    pub fn mentioned_region(&self, text: &str) -> Option<&str> {
        self.regions()
            .into_iter()
            .find(|r| text.contains(&r.to_lowercase()))
    }
}

impl From<Vec<WellRecord>> for Dataset {
    fn from(records: Vec<WellRecord>) -> Self {
        Self::new(records)
    }
}

/// Length of `needle` if it is non-empty and occurs in `haystack` ignoring case.
fn match_len(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let needle = needle.to_lowercase();
    if haystack.contains(&needle) {
        needle.len()
    } else {
        0
    }
}

pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for v in values {
        if !v.is_empty() && !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

// =============================================================================
// TESTS
// =============================================================================
