//! # Classification Thresholds
//!
//! Hardcoded thresholds and defaults for the INGRES data model.
//!
//! Every derived label in the system (contamination risk, recharge trend,
//! quality grade, safety and shallow-water flags) is a static comparison
//! against one of these constants.

// =============================================================================
// TDS (mg/L)
// =============================================================================

/// TDS at or above this value is `High` contamination risk.
pub const TDS_HIGH_RISK: f64 = 600.0;

/// TDS at or above this value (and below `TDS_HIGH_RISK`) is `Moderate` risk.
pub const TDS_MODERATE_RISK: f64 = 500.0;

/// Wells strictly below this TDS are counted as safe.
pub const TDS_SAFE_LIMIT: f64 = 500.0;

// =============================================================================
// YIELD (LPH)
// =============================================================================

/// Yield strictly below this value is a `Declining` recharge trend.
pub const YIELD_DECLINING_BELOW: f64 = 1000.0;

/// Yield strictly above this value is a `Rising` recharge trend.
pub const YIELD_RISING_ABOVE: f64 = 1800.0;

/// Yield at or above this value counts as a top performer in yield reports.
pub const YIELD_HIGH_PERFORMER: f64 = 1800.0;

// =============================================================================
// WATER LEVEL (m)
// =============================================================================

/// Static water level strictly below this depth raises a shallow-water alert.
pub const SHALLOW_WATER_LEVEL_M: f64 = 5.0;

// =============================================================================
// QUALITY GRADE
// =============================================================================

/// Grade A ceiling for TDS.
pub const GRADE_A_TDS: f64 = 400.0;
/// Grade A ceiling for nitrate (mg/L).
pub const GRADE_A_NITRATE: f64 = 40.0;
/// Grade A ceiling for fluoride (mg/L).
pub const GRADE_A_FLUORIDE: f64 = 0.8;
/// Grade B ceiling for TDS.
pub const GRADE_B_TDS: f64 = 500.0;
/// Grade B ceiling for nitrate (mg/L).
pub const GRADE_B_NITRATE: f64 = 50.0;
/// Grade C ceiling for TDS.
pub const GRADE_C_TDS: f64 = 600.0;

/// Drinking suitability ceilings: TDS, nitrate, fluoride, arsenic.
pub const DRINKING_MAX_TDS: f64 = 500.0;
pub const DRINKING_MAX_NITRATE: f64 = 45.0;
pub const DRINKING_MAX_FLUORIDE: f64 = 1.0;
pub const DRINKING_MAX_ARSENIC: f64 = 0.01;

/// Irrigation suitability ceiling for TDS.
pub const IRRIGATION_MAX_TDS: f64 = 900.0;

// =============================================================================
// RECORD DEFAULTS
// =============================================================================

/// pH assumed when a record does not carry one.
pub const DEFAULT_PH: f64 = 7.0;

/// Conductivity (µS/cm) estimated as `tds * CONDUCTIVITY_PER_TDS` when absent.
pub const CONDUCTIVITY_PER_TDS: f64 = 1.8;

/// State assumed when a record does not carry one.
pub const DEFAULT_STATE: &str = "Tamil Nadu";

// =============================================================================
// DATA SOURCES
// =============================================================================

/// Primary dataset file, also the target of uploads.
pub const PRIMARY_DATA_FILE: &str = "groundwaterData.json";

/// Secondary dataset file; only contributes ids missing from the primary.
pub const WELLS_DATA_FILE: &str = "sampleWells.json";

/// Survey CSV, consulted only when both JSON sources are empty.
pub const SURVEY_CSV_FILE: &str = "sample_groundwater.csv";

/// Maximum accepted CSV upload size (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

// =============================================================================
// REPORTS
// =============================================================================

/// Maximum number of wells listed in any chatbot report section.
pub const REPORT_LIST_LIMIT: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_thresholds_ordered() {
        assert!(TDS_MODERATE_RISK < TDS_HIGH_RISK);
    }

    #[test]
    fn trend_thresholds_ordered() {
        assert!(YIELD_DECLINING_BELOW < YIELD_RISING_ABOVE);
    }

    #[test]
    fn upload_limit_is_five_mebibytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 5_242_880);
    }
}
