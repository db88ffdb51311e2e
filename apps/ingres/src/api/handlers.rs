//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    auth::{INVALID_CREDENTIALS, SessionUser, authenticate},
    error::ApiError,
    types::{
        AdminDataResponse, AuthResponse, ChatRequest, ChatResponse, ContactsQuery,
        DirectoryResponse, DistrictContactResponse, DistrictWellsResponse, HealthResponse,
        LoginRequest, MeResponse, MessageResponse, OverviewResponse, RecordsResponse,
        RegionWellsResponse, WellResponse,
    },
};
use axum::{
    Extension, Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use ingres_core::{
    Chatbot, Language, MapView, Municipalities, Overview, STATE_CONTACTS, WellRecord,
    municipality_contact, normalize_upload, primitives::MAX_UPLOAD_BYTES,
};

const UPLOAD_FIELD: &str = "file";
const CSV_CONTENT_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel"];

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let wells = state.dataset.read().await.len();
    Json(HealthResponse::new(&state.config.environment, wells))
}

// =============================================================================
// AUTH HANDLERS
// =============================================================================

pub async fn guest_handler(State(state): State<AppState>) -> impl IntoResponse {
    let user = state.sessions.issue_guest().await;
    Json(AuthResponse {
        message: "Guest access granted".to_string(),
        user,
    })
}

/// Exchange email and password for a session.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let Some(account) = authenticate(&state.config.users, &email, &password) else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_credentials",
            "Login failed"
        );
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let user = state.sessions.issue_for(account).await;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> impl IntoResponse {
    if let Some(token) = &user.token {
        state.sessions.revoke(token).await;
    }
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

pub async fn me_handler(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    Json(MeResponse { user })
}

// =============================================================================
// DATA HANDLERS
// =============================================================================

pub async fn overview_handler(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = state.dataset.read().await;
    Json(OverviewResponse {
        overview: Overview::from_records(dataset.records()),
    })
}

pub async fn groundwater_handler(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = state.dataset.read().await;
    Json(RecordsResponse {
        records: dataset.records().to_vec(),
    })
}

/// Exact, case-sensitive id lookup.
pub async fn well_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WellResponse>, ApiError> {
    let dataset = state.dataset.read().await;
    let well = dataset
        .find(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Well not found".to_string()))?;
    Ok(Json(WellResponse { well }))
}

fn owned(wells: Vec<&WellRecord>) -> Vec<WellRecord> {
    wells.into_iter().cloned().collect()
}

pub async fn district_handler(
    State(state): State<AppState>,
    Path(district): Path<String>,
) -> impl IntoResponse {
    let wells = owned(state.dataset.read().await.in_district(&district));
    Json(DistrictWellsResponse {
        district,
        count: wells.len(),
        wells,
    })
}

pub async fn region_handler(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> impl IntoResponse {
    let wells = owned(state.dataset.read().await.in_region(&region));
    Json(RegionWellsResponse {
        region,
        count: wells.len(),
        wells,
    })
}

pub async fn map_handler(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = state.dataset.read().await;
    Json(MapView::from_records(dataset.records()))
}

/// One district's contact when `?district=` is given, else the directory.
pub async fn contacts_handler(Query(query): Query<ContactsQuery>) -> Response {
    match query.district.filter(|d| !d.is_empty()) {
        Some(district) => Json(DistrictContactResponse {
            contact: municipality_contact(&district),
            district,
            state_contacts: STATE_CONTACTS,
        })
        .into_response(),
        None => Json(DirectoryResponse {
            municipalities: Municipalities,
            state_contacts: STATE_CONTACTS,
        })
        .into_response(),
    }
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// Re-read the data files into memory.
pub async fn reload_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut dataset = state.dataset.write().await;
    dataset.replace(state.sources.load_merged());
    tracing::info!(count = dataset.len(), "Dataset reloaded");

    Json(AdminDataResponse {
        message: format!("Reloaded {} records from data files", dataset.len()),
        overview: Overview::from_records(dataset.records()),
    })
}

fn multipart_error(e: &MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

fn is_csv(field: &Field<'_>) -> bool {
    let by_type = field
        .content_type()
        .is_some_and(|ct| CSV_CONTENT_TYPES.contains(&ct));
    let by_name = field
        .file_name()
        .is_some_and(|name| name.to_lowercase().ends_with(".csv"));
    by_type || by_name
}

/// Replace the dataset with an uploaded CSV and persist it.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AdminDataResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest("CSV file is required".to_string()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if !is_csv(&field) {
            return Err(ApiError::BadRequest("Only CSV files allowed".to_string()));
        }
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::PayloadTooLarge);
        }
        upload = Some(bytes);
        break;
    }

    let Some(bytes) = upload else {
        return Err(ApiError::BadRequest("CSV file is required".to_string()));
    };

    let text = String::from_utf8_lossy(&bytes);
    let records = normalize_upload(&text).map_err(|e| {
        tracing::warn!(error = %e, "CSV upload rejected");
        ApiError::BadRequest("Unable to parse CSV. Please verify the headers.".to_string())
    })?;

    // Persist under the write lock
    let mut dataset = state.dataset.write().await;
    state.sources.persist(&records)?;
    dataset.replace(records);
    tracing::info!(count = dataset.len(), "Dataset replaced from upload");

    Ok(Json(AdminDataResponse {
        message: format!("Uploaded {} records", dataset.len()),
        overview: Overview::from_records(dataset.records()),
    }))
}

// =============================================================================
// CHATBOT HANDLER
// =============================================================================

/// Answer a chat message in the requested or detected language.
pub async fn chatbot_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let message = request.message.unwrap_or_default();
    let language = request.language.as_deref().and_then(Language::from_code);

    let dataset = state.dataset.read().await;
    let answer = Chatbot::new(&dataset).respond(&message, language)?;
    tracing::debug!(
        user = %user.id,
        language = %answer.language,
        "Chatbot reply"
    );

    Ok(Json(ChatResponse {
        reply: answer.reply,
        suggestions: answer.suggestions,
        language: answer.language,
        timestamp: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
