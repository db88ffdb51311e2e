//! # Loader Module
//!
//! Reading, normalising and writing well records.
//!
//! - JSON arrays are read record by record; malformed entries are skipped
//! - CSV rows are normalised into `WellRecord`s with defaults and derived labels
//! - Sources are merged by id, keeping first-seen order
//! - The primary JSON file is the only file ever written

use crate::primitives::{
    CONDUCTIVITY_PER_TDS, DEFAULT_PH, DEFAULT_STATE, PRIMARY_DATA_FILE, SURVEY_CSV_FILE,
    WELLS_DATA_FILE,
};
use crate::{IngresError, QualityGrade, RechargeTrend, RiskLevel, WellRecord, WellStatus};
use chrono::Utc;
use csv::{StringRecord, Trim};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// CSV PROFILES
// =============================================================================

/// Which column vocabulary a CSV uses.
///
/// `Survey` is the field-survey export shipped with the data directory.
/// `Upload` is what administrators upload; it accepts several spellings for
/// most columns and may carry its own risk and trend labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvProfile {
    Survey,
    Upload,
}

/// Header aliases for each record field, tried in order.
struct ColumnAliases {
    id: &'static [&'static str],
    name: &'static [&'static str],
    region: &'static [&'static str],
    district: &'static [&'static str],
    state: &'static [&'static str],
    aquifer: &'static [&'static str],
    tds: &'static [&'static str],
    ph: &'static [&'static str],
    conductivity: &'static [&'static str],
    risk: &'static [&'static str],
    water_level: &'static [&'static str],
    depth: &'static [&'static str],
    yield_lph: &'static [&'static str],
    trend: &'static [&'static str],
    status: &'static [&'static str],
    inspected: &'static [&'static str],
    notes: &'static [&'static str],
}

const SURVEY_COLUMNS: ColumnAliases = ColumnAliases {
    id: &["site_id"],
    name: &["name"],
    region: &["region", "district"],
    district: &["district"],
    state: &["state"],
    aquifer: &["aquifer"],
    tds: &["tds"],
    ph: &["pH"],
    conductivity: &["conductivity"],
    risk: &[],
    water_level: &["static_water_level_m", "depth_m"],
    depth: &["depth_m"],
    yield_lph: &["yield_lph"],
    trend: &[],
    status: &["status"],
    inspected: &["survey_date"],
    notes: &["notes"],
};

const UPLOAD_COLUMNS: ColumnAliases = ColumnAliases {
    id: &["site_id", "id", "ID"],
    name: &["name", "Name"],
    region: &["region", "Region", "district"],
    district: &["district", "District"],
    state: &["state", "State"],
    aquifer: &["aquifer", "Aquifer"],
    tds: &["tds", "tdsLevel", "TDS"],
    ph: &["pH", "ph"],
    conductivity: &["conductivity", "Conductivity"],
    risk: &["contaminationRisk", "Risk"],
    water_level: &["static_water_level_m", "waterLevelMeters", "depth"],
    depth: &["depth_m", "depthMeters"],
    yield_lph: &["yield_lph", "yieldLph"],
    trend: &["rechargeTrend", "Trend"],
    status: &["status", "Status"],
    inspected: &["survey_date", "lastInspection", "InspectionDate"],
    notes: &["notes"],
};

/// Descriptive columns carried through to `WellRecord::attributes`.
const DESCRIPTIVE_COLUMNS: &[&str] = &[
    "wellType",
    "usageType",
    "ownership",
    "waterSource",
    "nearbyLandUse",
    "seasonalVariation",
    "infrastructure",
];

impl CsvProfile {
    fn columns(self) -> &'static ColumnAliases {
        match self {
            Self::Survey => &SURVEY_COLUMNS,
            Self::Upload => &UPLOAD_COLUMNS,
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            Self::Survey => "SITE",
            Self::Upload => "CSV",
        }
    }

    fn fallback_name(self, row_number: usize) -> String {
        match self {
            Self::Survey => "Unknown Well".to_string(),
            Self::Upload => format!("Well {}", row_number),
        }
    }

    fn fallback_region(self, row_number: usize) -> String {
        match self {
            Self::Survey => "Unknown Region".to_string(),
            Self::Upload => format!("Region {}", row_number),
        }
    }
}

// =============================================================================
// NORMALISATION CONTEXT
// =============================================================================

/// Clock values stamped onto rows that lack an id or survey date.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    pub stamp_millis: i64,
    pub today: String,
}

impl NormalizeContext {
    /// Context for the current instant (UTC).
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            stamp_millis: now.timestamp_millis(),
            today: now.format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// CSV ROW ACCESS
// =============================================================================

/// One CSV row addressed by header name.
struct CsvRow<'a> {
    index: &'a HashMap<String, usize>,
    record: StringRecord,
}

impl CsvRow<'_> {
    /// First non-empty cell among `names`.
    fn text(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            let idx = *self.index.get(*name)?;
            self.record.get(idx).filter(|v| !v.is_empty())
        })
    }

    /// First non-empty cell among `names`, parsed as a number.
    ///
    /// A cell that does not parse counts as missing.
    fn number(&self, names: &[&str]) -> Option<f64> {
        self.text(names)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    fn flag(&self, name: &str) -> Option<bool> {
        match self.text(&[name])?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

fn normalize_row(
    row: &CsvRow<'_>,
    position: usize,
    profile: CsvProfile,
    ctx: &NormalizeContext,
) -> WellRecord {
    let cols = profile.columns();
    let row_number = position + 1;

    let id = row.text(cols.id).map(str::to_string).unwrap_or_else(|| {
        format!(
            "{}-{}-{}",
            profile.id_prefix(),
            ctx.stamp_millis,
            row_number
        )
    });

    let mut record = WellRecord::new(id);
    let district = row.text(cols.district);

    record.name = row
        .text(cols.name)
        .map(str::to_string)
        .unwrap_or_else(|| profile.fallback_name(row_number));
    record.region = row
        .text(cols.region)
        .map(str::to_string)
        .unwrap_or_else(|| profile.fallback_region(row_number));
    record.district = district.unwrap_or("Unknown").to_string();
    record.state = row.text(cols.state).unwrap_or(DEFAULT_STATE).to_string();
    record.lat = row.number(&["lat"]).unwrap_or(0.0);
    record.lon = row.number(&["lon"]).unwrap_or(0.0);
    record.aquifer = row
        .text(cols.aquifer)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} Basin", district.unwrap_or("Unknown")));

    record.tds_level = row.number(cols.tds).unwrap_or(0.0);
    record.ph = row.number(cols.ph).unwrap_or(DEFAULT_PH);
    record.conductivity = row
        .number(cols.conductivity)
        .unwrap_or(record.tds_level * CONDUCTIVITY_PER_TDS);
    record.water_level_meters = row.number(cols.water_level).unwrap_or(0.0);
    record.depth_meters = row.number(cols.depth).unwrap_or(0.0);
    record.yield_lph = row.number(cols.yield_lph).unwrap_or(0.0);

    record.contamination_risk = row.text(cols.risk).and_then(|v| v.parse::<RiskLevel>().ok());
    record.recharge_trend = row
        .text(cols.trend)
        .and_then(|v| v.parse::<RechargeTrend>().ok());

    record.status = row.text(cols.status).map(WellStatus::from).unwrap_or_default();
    record.last_inspection = row
        .text(cols.inspected)
        .unwrap_or(ctx.today.as_str())
        .to_string();
    record.notes = row.text(cols.notes).unwrap_or_default().to_string();

    record.hardness = row.number(&["hardness"]);
    record.alkalinity = row.number(&["alkalinity"]);
    record.nitrate = row.number(&["nitrate"]);
    record.fluoride = row.number(&["fluoride"]);
    record.chloride = row.number(&["chloride"]);
    record.sulfate = row.number(&["sulfate"]);
    record.iron = row.number(&["iron"]);
    record.arsenic = row.number(&["arsenic"]);
    record.water_quality_grade = row
        .text(&["waterQualityGrade"])
        .and_then(|v| v.parse::<QualityGrade>().ok());
    record.suitable_for_drinking = row.flag("suitableForDrinking");
    record.suitable_for_irrigation = row.flag("suitableForIrrigation");

    for column in DESCRIPTIVE_COLUMNS {
        if let Some(value) = row.text(&[*column]) {
            record
                .attributes
                .insert((*column).to_string(), serde_json::Value::from(value));
        }
    }

    record.with_derived_labels()
}

// =============================================================================
// CSV INGESTION
// =============================================================================

/// Parse CSV text into records using the given column profile.
///
/// Cells are trimmed and blank lines skipped. Rows with a different number of
/// cells than the header line are a parse error.
pub fn parse_csv<R: Read>(
    reader: R,
    profile: CsvProfile,
    ctx: &NormalizeContext,
) -> Result<Vec<WellRecord>, IngresError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let index: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    let mut records = Vec::new();
    for (position, row) in csv_reader.records().enumerate() {
        let row = CsvRow {
            index: &index,
            record: row?,
        };
        records.push(normalize_row(&row, position, profile, ctx));
    }

    Ok(records)
}

/// Normalise an administrator CSV upload.
pub fn normalize_upload(csv_text: &str) -> Result<Vec<WellRecord>, IngresError> {
    parse_csv(csv_text.as_bytes(), CsvProfile::Upload, &NormalizeContext::now())
}

/// Read the survey CSV from disk.
pub fn load_csv_records(path: &Path) -> Result<Vec<WellRecord>, IngresError> {
    let file = std::fs::File::open(path)
        .map_err(|e| IngresError::IoError(format!("{}: {}", path.display(), e)))?;
    parse_csv(file, CsvProfile::Survey, &NormalizeContext::now())
}

// =============================================================================
// JSON INGESTION
// =============================================================================

/// Parse a JSON array of records.
///
/// Entries that are not valid records (including ones without an `id`) are
/// skipped with a warning rather than failing the whole document.
pub fn parse_json_records(text: &str) -> Result<Vec<WellRecord>, IngresError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(IngresError::JsonError(
            "expected a top-level JSON array".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<WellRecord>(entry) {
            Ok(record) if !record.id.is_empty() => records.push(record.with_derived_labels()),
            Ok(_) => tracing::warn!(position, "Skipping record with empty id"),
            Err(e) => tracing::warn!(position, error = %e, "Skipping malformed record"),
        }
    }
    Ok(records)
}

/// Read a JSON array of records from disk.
pub fn load_json_records(path: &Path) -> Result<Vec<WellRecord>, IngresError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| IngresError::IoError(format!("{}: {}", path.display(), e)))?;
    parse_json_records(&text)
}

// =============================================================================
// MERGE BY ID
// =============================================================================

/// Ordered id → record map with JavaScript `Map` semantics: re-inserting an
/// existing id replaces the record but keeps its original position.
#[derive(Debug, Default)]
pub struct RecordMerger {
    positions: HashMap<String, usize>,
    records: Vec<WellRecord>,
}

impl RecordMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id.
    pub fn upsert(&mut self, record: WellRecord) {
        match self.positions.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.positions.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Insert only when the id is not present yet.
    pub fn insert_missing(&mut self, record: WellRecord) {
        if !self.positions.contains_key(&record.id) {
            self.upsert(record);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<WellRecord> {
        self.records
    }
}

// =============================================================================
// DATA SOURCES
// =============================================================================

/// The three files a dataset is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub primary: PathBuf,
    pub wells: PathBuf,
    pub survey_csv: PathBuf,
}

impl DataSources {
    /// Standard file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            primary: dir.join(PRIMARY_DATA_FILE),
            wells: dir.join(WELLS_DATA_FILE),
            survey_csv: dir.join(SURVEY_CSV_FILE),
        }
    }

    /// Assemble the dataset.
    ///
    /// 1. Every primary record, by id.
    /// 2. Secondary records whose id is not yet present.
    /// 3. Only if both gave nothing: the survey CSV.
    ///
    /// Unreadable sources are logged and treated as empty.
    #[must_use]
    pub fn load_merged(&self) -> Vec<WellRecord> {
        let mut merger = RecordMerger::new();

        let primary = read_or_warn(&self.primary, load_json_records);
        let primary_count = primary.len();
        primary.into_iter().for_each(|r| merger.upsert(r));
        tracing::info!(
            count = primary_count,
            path = %self.primary.display(),
            "Loaded records from primary data file"
        );

        let wells = read_or_warn(&self.wells, load_json_records);
        if !wells.is_empty() {
            tracing::info!(
                count = wells.len(),
                path = %self.wells.display(),
                "Loaded records from wells data file"
            );
        }
        wells.into_iter().for_each(|r| merger.insert_missing(r));

        if merger.is_empty() {
            let survey = read_or_warn(&self.survey_csv, load_csv_records);
            tracing::info!(
                count = survey.len(),
                path = %self.survey_csv.display(),
                "Loaded records from survey CSV"
            );
            survey.into_iter().for_each(|r| merger.upsert(r));
        }

        merger.into_records()
    }

    /// Replace the primary data file with `records` (pretty JSON).
    ///
    /// Writes a sibling temp file first and renames it over the target.
    pub fn persist(&self, records: &[WellRecord]) -> Result<(), IngresError> {
        if let Some(parent) = self.primary.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.primary.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.primary)?;

        tracing::info!(
            count = records.len(),
            path = %self.primary.display(),
            "Persisted dataset"
        );
        Ok(())
    }
}

fn read_or_warn(
    path: &Path,
    read: fn(&Path) -> Result<Vec<WellRecord>, IngresError>,
) -> Vec<WellRecord> {
    read(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Unable to load data source");
        Vec::new()
    })
}

// =============================================================================
// CSV EXPORT
// =============================================================================

/// Column order of exported CSVs (survey vocabulary plus chemistry and
/// descriptive attributes), readable back by either profile.
pub const EXPORT_COLUMNS: &[&str] = &[
    "site_id",
    "name",
    "lat",
    "lon",
    "district",
    "state",
    "region",
    "aquifer",
    "survey_date",
    "depth_m",
    "static_water_level_m",
    "yield_lph",
    "tds",
    "pH",
    "conductivity",
    "hardness",
    "alkalinity",
    "nitrate",
    "fluoride",
    "chloride",
    "sulfate",
    "iron",
    "arsenic",
    "contaminationRisk",
    "rechargeTrend",
    "status",
    "wellType",
    "usageType",
    "ownership",
    "waterSource",
    "waterQualityGrade",
    "suitableForDrinking",
    "suitableForIrrigation",
    "nearbyLandUse",
    "seasonalVariation",
    "infrastructure",
    "notes",
];

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional_flag(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn attribute_cell(record: &WellRecord, key: &str) -> String {
    match record.attributes.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn export_row(record: &WellRecord) -> Vec<String> {
    EXPORT_COLUMNS
        .iter()
        .map(|column| match *column {
            "site_id" => record.id.clone(),
            "name" => record.name.clone(),
            "lat" => record.lat.to_string(),
            "lon" => record.lon.to_string(),
            "district" => record.district.clone(),
            "state" => record.state.clone(),
            "region" => record.region.clone(),
            "aquifer" => record.aquifer.clone(),
            "survey_date" => record.last_inspection.clone(),
            "depth_m" => record.depth_meters.to_string(),
            "static_water_level_m" => record.water_level_meters.to_string(),
            "yield_lph" => record.yield_lph.to_string(),
            "tds" => record.tds_level.to_string(),
            "pH" => record.ph.to_string(),
            "conductivity" => record.conductivity.to_string(),
            "hardness" => optional_number(record.hardness),
            "alkalinity" => optional_number(record.alkalinity),
            "nitrate" => optional_number(record.nitrate),
            "fluoride" => optional_number(record.fluoride),
            "chloride" => optional_number(record.chloride),
            "sulfate" => optional_number(record.sulfate),
            "iron" => optional_number(record.iron),
            "arsenic" => optional_number(record.arsenic),
            "contaminationRisk" => record.risk().to_string(),
            "rechargeTrend" => record.trend().to_string(),
            "status" => record.status.to_string(),
            "waterQualityGrade" => record
                .water_quality_grade
                .map(|g| format!("{:?}", g))
                .unwrap_or_default(),
            "suitableForDrinking" => optional_flag(record.suitable_for_drinking),
            "suitableForIrrigation" => optional_flag(record.suitable_for_irrigation),
            "notes" => record.notes.clone(),
            other => attribute_cell(record, other),
        })
        .collect()
}

/// Write records as CSV with a header line.
pub fn export_csv<W: Write>(records: &[WellRecord], writer: W) -> Result<(), IngresError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        csv_writer.write_record(export_row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fixed_ctx() -> NormalizeContext {
        NormalizeContext {
            stamp_millis: 1_700_000_000_000,
            today: "2024-03-01".to_string(),
        }
    }

    #[test]
    fn survey_row_derives_labels() {
        let csv = "site_id,name,district,tds,yield_lph,static_water_level_m\n\
                   TN-SAL-001,Salem Well 1,Salem,640,950,12.5\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Survey, &fixed_ctx()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.contamination_risk, Some(RiskLevel::High));
        assert_eq!(r.recharge_trend, Some(RechargeTrend::Declining));
        assert_eq!(r.region, "Salem");
        assert_eq!(r.aquifer, "Salem Basin");
        assert_eq!(r.state, "Tamil Nadu");
        assert!((r.conductivity - 1152.0).abs() < 1e-9);
        assert_eq!(r.last_inspection, "2024-03-01");
    }

    #[test]
    fn survey_row_without_id_or_name() {
        let csv = "name,tds\n,300\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Survey, &fixed_ctx()).unwrap();

        assert_eq!(records[0].id, "SITE-1700000000000-1");
        assert_eq!(records[0].name, "Unknown Well");
        assert_eq!(records[0].region, "Unknown Region");
        assert_eq!(records[0].district, "Unknown");
    }

    #[test]
    fn upload_accepts_alternate_headers() {
        let csv = "ID,Name,District,TDS,yieldLph,Risk,Trend,Status,InspectionDate\n\
                   W-1,Pond Road,Erode,420,2100,High,Declining,Maintenance,2024-01-09\n\
                   ,, ,510,,,,,\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Upload, &fixed_ctx()).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.id, "W-1");
        assert_eq!(first.district, "Erode");
        // Only a lowercase `district` column stands in for the region
        assert_eq!(first.region, "Region 1");
        // Supplied labels win over derived ones
        assert_eq!(first.contamination_risk, Some(RiskLevel::High));
        assert_eq!(first.recharge_trend, Some(RechargeTrend::Declining));
        assert_eq!(first.status, WellStatus::Maintenance);

        let second = &records[1];
        assert_eq!(second.id, "CSV-1700000000000-2");
        assert_eq!(second.name, "Well 2");
        assert_eq!(second.region, "Region 2");
        assert_eq!(second.contamination_risk, Some(RiskLevel::Moderate));
        assert_eq!(second.recharge_trend, Some(RechargeTrend::Declining));
    }

    #[test]
    fn upload_region_falls_back_to_district_column() {
        let csv = "id,name,district,tds\nW-7,Canal Road,Karur,300\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Upload, &fixed_ctx()).unwrap();
        assert_eq!(records[0].region, "Karur");
        assert_eq!(records[0].district, "Karur");
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        let csv = "site_id,tds,pH\nA,abc,n/a\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Upload, &fixed_ctx()).unwrap();

        assert_eq!(records[0].tds_level, 0.0);
        assert_eq!(records[0].ph, DEFAULT_PH);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let csv = "site_id,name\nA,One,extra\n";
        assert!(parse_csv(csv.as_bytes(), CsvProfile::Upload, &fixed_ctx()).is_err());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let csv = "site_id,name\nA,One\n\nB,Two\n";
        let records = parse_csv(csv.as_bytes(), CsvProfile::Upload, &fixed_ctx()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn json_skips_bad_entries() {
        let json = r#"[{"id":"A","tdsLevel":300},{"name":"no id"},{"id":""},{"id":"B","lat":"north"}]"#;
        let records = parse_json_records(json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "A");
        assert_eq!(records[0].contamination_risk, Some(RiskLevel::Low));
    }

    #[test]
    fn json_object_is_not_a_dataset() {
        assert!(parse_json_records(r#"{"id":"A"}"#).is_err());
    }

    #[test]
    fn merger_keeps_first_position_on_replace() {
        let mut merger = RecordMerger::new();
        merger.upsert(WellRecord::new("A"));
        merger.upsert(WellRecord::new("B"));

        let mut replacement = WellRecord::new("A");
        replacement.name = "Replaced".to_string();
        merger.upsert(replacement);

        let mut ignored = WellRecord::new("B");
        ignored.name = "Ignored".to_string();
        merger.insert_missing(ignored);

        let records = merger.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Replaced");
        assert_eq!(records[1].name, "");
    }

    #[test]
    fn export_then_survey_import_preserves_readings() {
        let mut record = WellRecord::new("TN-ERO-002");
        record.name = "Erode Well 2".to_string();
        record.district = "Erode".to_string();
        record.region = "Kongu Region".to_string();
        record.tds_level = 455.0;
        record.ph = 7.3;
        record.nitrate = Some(22.0);
        record.notes = "Stable, monitored".to_string();
        record
            .attributes
            .insert("wellType".to_string(), serde_json::Value::from("Borewell"));
        let record = record.with_derived_labels();

        let mut out = Vec::new();
        export_csv(std::slice::from_ref(&record), &mut out).unwrap();
        let back = parse_csv(out.as_slice(), CsvProfile::Survey, &fixed_ctx()).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, record.id);
        assert_eq!(back[0].notes, "Stable, monitored");
        assert_eq!(back[0].nitrate, Some(22.0));
        assert_eq!(
            back[0].attributes.get("wellType"),
            Some(&serde_json::Value::from("Borewell"))
        );
    }
}
