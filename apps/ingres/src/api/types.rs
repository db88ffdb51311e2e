//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Field names are
//! camelCase on the wire.

use super::auth::SessionUser;
use ingres_core::{Language, Municipalities, MunicipalityContact, Overview, StateContacts, WellRecord};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub wells_loaded: usize,
    pub languages: Vec<String>,
}

impl HealthResponse {
    #[must_use]
    pub fn new(environment: &str, wells_loaded: usize) -> Self {
        Self {
            status: "ok".to_string(),
            service: "INGRES backend".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: environment.to_string(),
            wells_loaded,
            languages: Language::ALL.iter().map(|l| l.code().to_string()).collect(),
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Login request body. Missing fields are rejected by the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login and guest-access response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: SessionUser,
}

/// `/api/auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: SessionUser,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// DATA
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub overview: Overview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub records: Vec<WellRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellResponse {
    pub well: WellRecord,
}

/// Wells of one district, echoing the requested name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictWellsResponse {
    pub district: String,
    pub count: usize,
    pub wells: Vec<WellRecord>,
}

/// Wells whose region contains the requested fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionWellsResponse {
    pub region: String,
    pub count: usize,
    pub wells: Vec<WellRecord>,
}

// =============================================================================
// CONTACTS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactsQuery {
    pub district: Option<String>,
}

/// Contact for one district (fallback office when unknown).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictContactResponse {
    pub district: String,
    pub contact: MunicipalityContact,
    pub state_contacts: StateContacts,
}

/// The whole directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryResponse {
    pub municipalities: Municipalities,
    pub state_contacts: StateContacts,
}

// =============================================================================
// ADMIN
// =============================================================================

/// Reload and upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDataResponse {
    pub message: String,
    pub overview: Overview,
}

// =============================================================================
// CHATBOT
// =============================================================================

/// Chat request. `language` is a code (`en`, `ta`, `hi`, `te`); unknown
/// codes fall back to detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub suggestions: Vec<String>,
    pub language: Language,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}
