//! # Core Type Definitions
//!
//! This module contains the data model for the INGRES groundwater network:
//! - Well records (`WellRecord`) as served by the REST API
//! - Threshold-derived labels (`RiskLevel`, `RechargeTrend`, `QualityGrade`)
//! - Operational status (`WellStatus`)
//! - Error types (`IngresError`)
//!
//! ## JSON Shape
//!
//! Records serialize in camelCase (`tdsLevel`, `yieldLph`, ...) with the one
//! exception of `pH`. Attributes the model does not know about (`wellType`,
//! `ownership`, ...) are kept in `attributes` and written back unchanged.

use crate::primitives::{
    DEFAULT_PH, DRINKING_MAX_ARSENIC, DRINKING_MAX_FLUORIDE, DRINKING_MAX_NITRATE,
    DRINKING_MAX_TDS, GRADE_A_FLUORIDE, GRADE_A_NITRATE, GRADE_A_TDS, GRADE_B_NITRATE,
    GRADE_B_TDS, GRADE_C_TDS, IRRIGATION_MAX_TDS, SHALLOW_WATER_LEVEL_M, TDS_HIGH_RISK,
    TDS_MODERATE_RISK, TDS_SAFE_LIMIT, YIELD_DECLINING_BELOW, YIELD_RISING_ABOVE,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CONTAMINATION RISK
// =============================================================================

/// Contamination risk derived from TDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a TDS reading (mg/L).
    #[must_use]
    pub fn from_tds(tds: f64) -> Self {
        if tds >= TDS_HIGH_RISK {
            Self::High
        } else if tds >= TDS_MODERATE_RISK {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = IngresError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for RiskLevel {
    type Err = IngresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(IngresError::InvalidInput(format!(
                "unknown risk level '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RECHARGE TREND
// =============================================================================

/// Recharge trend derived from well yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RechargeTrend {
    Declining,
    Stable,
    Rising,
}

impl RechargeTrend {
    /// Classify a yield reading (LPH).
    #[must_use]
    pub fn from_yield(yield_lph: f64) -> Self {
        if yield_lph < YIELD_DECLINING_BELOW {
            Self::Declining
        } else if yield_lph > YIELD_RISING_ABOVE {
            Self::Rising
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declining => "Declining",
            Self::Stable => "Stable",
            Self::Rising => "Rising",
        }
    }
}

impl TryFrom<String> for RechargeTrend {
    type Error = IngresError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for RechargeTrend {
    type Err = IngresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "declining" => Ok(Self::Declining),
            "stable" => Ok(Self::Stable),
            "rising" => Ok(Self::Rising),
            other => Err(IngresError::InvalidInput(format!(
                "unknown recharge trend '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RechargeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// QUALITY GRADE
// =============================================================================

/// Water quality letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
}

impl QualityGrade {
    /// Grade a sample from its TDS, nitrate and fluoride readings.
    #[must_use]
    pub fn classify(tds: f64, nitrate: f64, fluoride: f64) -> Self {
        if tds < GRADE_A_TDS && nitrate < GRADE_A_NITRATE && fluoride < GRADE_A_FLUORIDE {
            Self::A
        } else if tds < GRADE_B_TDS && nitrate < GRADE_B_NITRATE {
            Self::B
        } else if tds < GRADE_C_TDS {
            Self::C
        } else {
            Self::D
        }
    }
}

impl TryFrom<String> for QualityGrade {
    type Error = IngresError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for QualityGrade {
    type Err = IngresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(IngresError::InvalidInput(format!(
                "unknown quality grade '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// WELL STATUS
// =============================================================================

/// Operational status of a monitoring well.
///
/// Parsing is case-insensitive; anything other than `active` or
/// `maintenance` is treated as `inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WellStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl WellStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }
}

impl From<String> for WellStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&str> for WellStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "maintenance" => Self::Maintenance,
            _ => Self::Inactive,
        }
    }
}

impl fmt::Display for WellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WELL RECORD
// =============================================================================

/// A single monitoring well with its latest survey readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub aquifer: String,
    #[serde(default)]
    pub tds_level: f64,
    #[serde(rename = "pH", default = "default_ph")]
    pub ph: f64,
    #[serde(default)]
    pub conductivity: f64,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub contamination_risk: Option<RiskLevel>,
    #[serde(default)]
    pub water_level_meters: f64,
    #[serde(default)]
    pub depth_meters: f64,
    #[serde(default)]
    pub yield_lph: f64,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub recharge_trend: Option<RechargeTrend>,
    #[serde(default)]
    pub status: WellStatus,
    #[serde(default)]
    pub last_inspection: String,
    #[serde(default)]
    pub notes: String,

    // Optional chemistry (mg/L unless noted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alkalinity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluoride: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chloride: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sulfate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arsenic: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub water_quality_grade: Option<QualityGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitable_for_drinking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitable_for_irrigation: Option<bool>,

    /// Descriptive attributes outside the model, preserved verbatim.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

fn default_ph() -> f64 {
    DEFAULT_PH
}

/// Accept any string for a label field; unknown values become `None` so the
/// label is re-derived from the readings instead of rejecting the record.
fn lenient_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl WellRecord {
    /// Create a record with the given id and every reading at its default.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            region: String::new(),
            district: String::new(),
            state: String::new(),
            lat: 0.0,
            lon: 0.0,
            aquifer: String::new(),
            tds_level: 0.0,
            ph: DEFAULT_PH,
            conductivity: 0.0,
            contamination_risk: None,
            water_level_meters: 0.0,
            depth_meters: 0.0,
            yield_lph: 0.0,
            recharge_trend: None,
            status: WellStatus::Active,
            last_inspection: String::new(),
            notes: String::new(),
            hardness: None,
            alkalinity: None,
            nitrate: None,
            fluoride: None,
            chloride: None,
            sulfate: None,
            iron: None,
            arsenic: None,
            water_quality_grade: None,
            suitable_for_drinking: None,
            suitable_for_irrigation: None,
            attributes: serde_json::Map::new(),
        }
    }

    /// Contamination risk, falling back to the TDS classification.
    #[must_use]
    pub fn risk(&self) -> RiskLevel {
        self.contamination_risk
            .unwrap_or_else(|| RiskLevel::from_tds(self.tds_level))
    }

    /// Recharge trend, falling back to the yield classification.
    #[must_use]
    pub fn trend(&self) -> RechargeTrend {
        self.recharge_trend
            .unwrap_or_else(|| RechargeTrend::from_yield(self.yield_lph))
    }

    /// Fill missing derived labels from the readings.
    ///
    /// The quality grade is only derived when nitrate and fluoride are known.
    #[must_use]
    pub fn with_derived_labels(mut self) -> Self {
        self.contamination_risk = Some(self.risk());
        self.recharge_trend = Some(self.trend());
        if self.water_quality_grade.is_none()
            && let (Some(nitrate), Some(fluoride)) = (self.nitrate, self.fluoride)
        {
            self.water_quality_grade =
                Some(QualityGrade::classify(self.tds_level, nitrate, fluoride));
        }
        self
    }

    /// TDS strictly below the safe limit.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.tds_level < TDS_SAFE_LIMIT
    }

    /// Static water level strictly below the shallow-water threshold.
    #[must_use]
    pub fn is_shallow(&self) -> bool {
        self.water_level_meters < SHALLOW_WATER_LEVEL_M
    }

    /// Whether the sample meets every drinking-water ceiling.
    ///
    /// Returns `None` when any of the required chemistry readings is missing.
    #[must_use]
    pub fn drinkable(&self) -> Option<bool> {
        let nitrate = self.nitrate?;
        let fluoride = self.fluoride?;
        let arsenic = self.arsenic?;
        Some(
            self.tds_level < DRINKING_MAX_TDS
                && nitrate < DRINKING_MAX_NITRATE
                && fluoride < DRINKING_MAX_FLUORIDE
                && arsenic < DRINKING_MAX_ARSENIC,
        )
    }

    /// Whether the sample is usable for irrigation.
    #[must_use]
    pub fn irrigable(&self) -> bool {
        self.tds_level < IRRIGATION_MAX_TDS
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the INGRES core.
///
/// - No silent failures
/// - Use `Result<T, IngresError>` for fallible operations
#[derive(Debug, Error)]
pub enum IngresError {
    /// A record could not be turned into a `WellRecord`.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// CSV parsing or writing failed.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// JSON parsing or writing failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A looked-up entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-supplied input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<csv::Error> for IngresError {
    fn from(e: csv::Error) -> Self {
        Self::CsvError(e.to_string())
    }
}

impl From<serde_json::Error> for IngresError {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonError(e.to_string())
    }
}

impl From<std::io::Error> for IngresError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
