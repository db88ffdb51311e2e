//! # Network Statistics
//!
//! Aggregates computed over a set of well records:
//! - [`Overview`]: the dashboard summary
//! - [`MapView`]: the map projection with risk and district counts
//! - [`DistrictSummary`]: per-district (or per-region) figures used in reports
//!
//! All averages are over the full record count; rounding matches what the
//! dashboard displays.

use crate::dataset::distinct;
use crate::{RechargeTrend, RiskLevel, WellRecord, WellStatus};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Round `value` to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn mean(records: &[&WellRecord], field: impl Fn(&WellRecord) -> f64) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| field(r)).sum::<f64>() / records.len() as f64
}

/// Parse a survey date; accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_survey_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.date_naive())
        })
}

// =============================================================================
// OVERVIEW
// =============================================================================

/// Dashboard summary of the whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_sites: usize,
    pub active_sites: usize,
    pub maintenance_sites: usize,
    pub avg_tds: f64,
    #[serde(rename = "avgPH")]
    pub avg_ph: f64,
    pub avg_conductivity: f64,
    pub avg_yield: f64,
    pub avg_depth: f64,
    pub avg_water_level: f64,
    pub high_risk_sites: usize,
    pub moderate_risk_sites: usize,
    pub safe_sites: usize,
    pub shallow_water_alerts: usize,
    pub rising_sites: usize,
    pub declining_sites: usize,
    pub stable_sites: usize,
    pub latest_inspection: Option<String>,
    pub districts: Vec<String>,
    pub regions: Vec<String>,
}

impl Overview {
    /// Summarise `records`. An empty slice yields all-zero figures.
    #[must_use]
    pub fn from_records(records: &[WellRecord]) -> Self {
        let all: Vec<&WellRecord> = records.iter().collect();
        let count = |pred: fn(&WellRecord) -> bool| records.iter().filter(|r| pred(r)).count();

        let latest_inspection = records
            .iter()
            .filter_map(|r| parse_survey_date(&r.last_inspection))
            .max()
            .map(|d| d.format("%Y-%m-%d").to_string());

        Self {
            total_sites: records.len(),
            active_sites: count(|r| r.status == WellStatus::Active),
            maintenance_sites: count(|r| r.status == WellStatus::Maintenance),
            avg_tds: round_to(mean(&all, |r| r.tds_level), 1),
            avg_ph: round_to(mean(&all, |r| r.ph), 2),
            avg_conductivity: round_to(mean(&all, |r| r.conductivity), 0),
            avg_yield: round_to(mean(&all, |r| r.yield_lph), 0),
            avg_depth: round_to(mean(&all, |r| r.depth_meters), 1),
            avg_water_level: round_to(mean(&all, |r| r.water_level_meters), 1),
            high_risk_sites: count(|r| r.risk() == RiskLevel::High),
            moderate_risk_sites: count(|r| r.risk() == RiskLevel::Moderate),
            safe_sites: count(|r| r.is_safe()),
            shallow_water_alerts: count(|r| r.is_shallow()),
            rising_sites: count(|r| r.trend() == RechargeTrend::Rising),
            declining_sites: count(|r| r.trend() == RechargeTrend::Declining),
            stable_sites: count(|r| r.trend() == RechargeTrend::Stable),
            latest_inspection,
            districts: distinct(records.iter().map(|r| r.district.as_str()))
                .into_iter()
                .map(str::to_string)
                .collect(),
            regions: distinct(records.iter().map(|r| r.region.as_str()))
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Wells neither high nor moderate risk.
    #[must_use]
    pub fn low_risk_sites(&self) -> usize {
        self.total_sites
            .saturating_sub(self.high_risk_sites)
            .saturating_sub(self.moderate_risk_sites)
    }

    /// Share of safe wells as a percentage; 0 for an empty network.
    #[must_use]
    pub fn safety_rate_percent(&self) -> f64 {
        if self.total_sites == 0 {
            0.0
        } else {
            self.safe_sites as f64 / self.total_sites as f64 * 100.0
        }
    }
}

// =============================================================================
// MAP VIEW
// =============================================================================

/// A well as drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapWell {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub district: String,
    pub region: String,
    pub tds_level: f64,
    pub contamination_risk: RiskLevel,
    pub yield_lph: f64,
    pub water_level_meters: f64,
    pub status: WellStatus,
}

impl From<&WellRecord> for MapWell {
    fn from(r: &WellRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            lat: r.lat,
            lon: r.lon,
            district: r.district.clone(),
            region: r.region.clone(),
            tds_level: r.tds_level,
            contamination_risk: r.risk(),
            yield_lph: r.yield_lph,
            water_level_meters: r.water_level_meters,
            status: r.status,
        }
    }
}

/// Wells per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

/// Wells in one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictCount {
    pub name: String,
    pub count: usize,
}

/// Map legend figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStats {
    pub total: usize,
    pub by_risk: RiskCounts,
    pub by_district: Vec<DistrictCount>,
}

/// Map projection of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub wells: Vec<MapWell>,
    pub stats: MapStats,
}

impl MapView {
    #[must_use]
    pub fn from_records(records: &[WellRecord]) -> Self {
        let wells: Vec<MapWell> = records.iter().map(MapWell::from).collect();

        let mut by_risk = RiskCounts::default();
        for w in &wells {
            match w.contamination_risk {
                RiskLevel::High => by_risk.high += 1,
                RiskLevel::Moderate => by_risk.moderate += 1,
                RiskLevel::Low => by_risk.low += 1,
            }
        }

        // Districts in first-seen order; an empty district still gets a bucket
        let mut by_district: Vec<DistrictCount> = Vec::new();
        for w in &wells {
            match by_district.iter_mut().find(|d| d.name == w.district) {
                Some(entry) => entry.count += 1,
                None => by_district.push(DistrictCount {
                    name: w.district.clone(),
                    count: 1,
                }),
            }
        }

        Self {
            stats: MapStats {
                total: wells.len(),
                by_risk,
                by_district,
            },
            wells,
        }
    }
}

// =============================================================================
// DISTRICT SUMMARY
// =============================================================================

/// Figures for a group of wells (one district or one region).
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSummary {
    pub count: usize,
    pub avg_tds: f64,
    pub avg_yield: f64,
    pub high_risk: usize,
}

impl DistrictSummary {
    #[must_use]
    pub fn from_wells(wells: &[&WellRecord]) -> Self {
        Self {
            count: wells.len(),
            avg_tds: mean(wells, |r| r.tds_level),
            avg_yield: mean(wells, |r| r.yield_lph),
            high_risk: wells.iter().filter(|r| r.risk() == RiskLevel::High).count(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
