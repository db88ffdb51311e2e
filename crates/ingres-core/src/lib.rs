//! # ingres-core
//!
//! The groundwater data engine for INGRES - THE LOGIC.
//!
//! This crate owns the well-record model and every figure derived from it:
//! threshold labels, network statistics, the support directory and the
//! keyword-routed chatbot. The HTTP service and the CLI are thin shells
//! around it.
//!
//! ## Data Flow
//!
//! ```text
//! groundwaterData.json ─┐
//! sampleWells.json ─────┼─► loader ─► Dataset ─► stats / chatbot
//! sample_groundwater.csv┘                │
//!                 upload CSV ─► loader ──┘─► persist
//! ```
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - File I/O happens only in `loader`
//! - Every label is a static threshold comparison (see `primitives`)

// =============================================================================
// MODULES
// =============================================================================

pub mod chatbot;
pub mod contacts;
pub mod dataset;
pub mod i18n;
pub mod loader;
pub mod primitives;
pub mod stats;
pub mod synth;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{IngresError, QualityGrade, RechargeTrend, RiskLevel, WellRecord, WellStatus};

// =============================================================================
// RE-EXPORTS: Data Handling
// =============================================================================

pub use dataset::Dataset;
pub use loader::{
    CsvProfile, DataSources, NormalizeContext, RecordMerger, export_csv, load_csv_records,
    load_json_records, normalize_upload, parse_csv, parse_json_records,
};
pub use stats::{DistrictSummary, MapStats, MapView, MapWell, Overview};

// =============================================================================
// RE-EXPORTS: Conversation
// =============================================================================

pub use chatbot::{ChatReply, Chatbot, Intent};
pub use contacts::{
    MunicipalityContact, Municipalities, STATE_CONTACTS, StateContacts, municipality_contact,
};
pub use i18n::Language;

// =============================================================================
// RE-EXPORTS: Generator
// =============================================================================

pub use synth::{SynthConfig, generate};
