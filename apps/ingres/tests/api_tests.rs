//! Integration tests for the INGRES HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use ingres::api::{
    AdminDataResponse, AppState, AuthResponse, ChatResponse, DistrictWellsResponse,
    ErrorResponse, HealthResponse, LoginRequest, MeResponse, OverviewResponse, RecordsResponse,
    RegionWellsResponse, SessionUser, WellResponse, create_router,
};
use ingres::config::{Config, Role};
use ingres_core::{Language, MapView, RiskLevel, primitives::MAX_UPLOAD_BYTES};
use serde_json::{Value, json};
use std::future::IntoFuture;
use std::sync::Mutex;
use tempfile::TempDir;

/// Mutex to serialize tests that modify env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

const WELLS: &str = r#"[
  {"id": "TN-SAL-001", "name": "Salem Well 1", "district": "Salem", "region": "Salem Plateau",
   "tdsLevel": 640, "pH": 7.4, "yieldLph": 950, "waterLevelMeters": 4.2,
   "status": "active", "lastInspection": "2024-05-02"},
  {"id": "TN-SAL-002", "name": "Salem Well 2", "district": "Salem", "region": "Salem Plateau",
   "tdsLevel": 430, "yieldLph": 1900, "waterLevelMeters": 11.0,
   "status": "maintenance", "lastInspection": "2024-04-11"},
  {"id": "TN-THE-001", "name": "Theni Well 1", "district": "Theni", "region": "Western Ghats",
   "tdsLevel": 310, "yieldLph": 3200, "waterLevelMeters": 4.8, "lastInspection": "2024-06-01"}
]"#;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

struct Harness {
    server: TestServer,
    state: AppState,
    dir: TempDir,
}

fn harness_with(configure: impl FnOnce(&mut Config)) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("groundwaterData.json"), WELLS).unwrap();

    let mut config = Config {
        data_dir: dir.path().to_path_buf(),
        rate_limit_per_minute: 0,
        ..Config::default()
    };
    configure(&mut config);

    let state = AppState::load(config);
    let server = TestServer::new(create_router(state.clone())).unwrap();
    Harness { server, state, dir }
}

fn harness() -> Harness {
    harness_with(|_| {})
}

fn bearer(token: &str) -> HeaderValue {
    format!("Bearer {}", token).parse::<HeaderValue>().unwrap()
}

async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let auth: AuthResponse = response.json();
    auth.user.token.unwrap()
}

async fn admin_token(server: &TestServer) -> String {
    login(server, "admin@ingres.gov", "Admin@123").await
}

fn assert_error(response: &axum_test::TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, message);
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness();

    let response = h.server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.service, "INGRES backend");
    assert_eq!(health.environment, "development");
    assert_eq!(health.wells_loaded, 3);
    assert_eq!(health.languages, vec!["en", "ta", "hi", "te"]);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_wire_format() {
    let h = harness();
    let body: Value = h.server.get("/health").await.json();
    assert_eq!(body["wellsLoaded"], 3);
}

// =============================================================================
// AUTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_guest_session() {
    let h = harness();

    let response = h.server.post("/api/auth/guest").await;
    response.assert_status_ok();
    let auth: AuthResponse = response.json();
    assert_eq!(auth.message, "Guest access granted");
    assert!(auth.user.is_guest);
    assert_eq!(auth.user.email.as_deref(), Some("guest@ingres.gov"));

    let token = auth.user.token.unwrap();
    assert!(token.starts_with("guest-"));

    let me: MeResponse = h
        .server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(me.user.role, Role::Guest);
}

#[tokio::test]
async fn test_login_success() {
    let h = harness();

    let request = LoginRequest {
        email: Some("STAFF@ingres.gov".to_string()),
        password: Some("Staff@123".to_string()),
    };
    let response = h.server.post("/api/auth/login").json(&request).await;

    response.assert_status_ok();
    let auth: AuthResponse = response.json();
    assert_eq!(auth.message, "Login successful");
    assert_eq!(auth.user.id, "staff-014");
    assert_eq!(auth.user.role, Role::Staff);
    assert_eq!(auth.user.tagline.as_deref(), Some("Monitoring & limited edits"));
    assert!(!auth.user.is_guest);
    assert!(auth.user.issued_at.is_some());
}

#[tokio::test]
async fn test_login_missing_fields() {
    let h = harness();

    let response = h
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "admin@ingres.gov" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Email and password are required");

    let response = h.server.post("/api/auth/login").text("not json").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Email and password are required");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let h = harness();

    let response = h
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "admin@ingres.gov", "password": "wrong" }))
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid credentials");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let response = h
        .server
        .post("/api/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Logged out");

    let response = h
        .server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");
}

#[tokio::test]
async fn test_me_requires_token() {
    let h = harness();
    let response = h.server.get("/api/auth/me").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");
}

#[tokio::test]
async fn test_expired_session_removed() {
    let h = harness();
    h.state
        .sessions
        .insert(SessionUser {
            token: Some("stale".to_string()),
            id: "user-101".to_string(),
            name: "Field Observer".to_string(),
            email: Some("observer@ingres.gov".to_string()),
            role: Role::Common,
            tagline: None,
            is_guest: false,
            issued_at: Some(0),
        })
        .await;

    let response = h
        .server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, bearer("stale"))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Session expired");
    assert!(h.state.sessions.is_empty().await);
}

// =============================================================================
// DATA ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_overview_anonymous_guest() {
    let h = harness();

    let response = h.server.get("/api/data/overview").await;

    response.assert_status_ok();
    let body: OverviewResponse = response.json();
    assert_eq!(body.overview.total_sites, 3);
    assert_eq!(body.overview.high_risk_sites, 1);
    assert_eq!(body.overview.latest_inspection.as_deref(), Some("2024-06-01"));
}

#[tokio::test]
async fn test_literal_guest_token_accepted() {
    let h = harness();
    let response = h
        .server
        .get("/api/data/groundwater")
        .add_header(header::AUTHORIZATION, bearer("guest"))
        .await;

    response.assert_status_ok();
    let body: RecordsResponse = response.json();
    assert_eq!(body.records.len(), 3);
    assert_eq!(body.records[0].contamination_risk, Some(RiskLevel::High));
}

#[tokio::test]
async fn test_unknown_token_rejected_on_data() {
    let h = harness();
    let response = h
        .server
        .get("/api/data/overview")
        .add_header(header::AUTHORIZATION, bearer("made-up"))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");
}

#[tokio::test]
async fn test_well_lookup() {
    let h = harness();

    let response = h.server.get("/api/data/well/TN-THE-001").await;
    response.assert_status_ok();
    let body: WellResponse = response.json();
    assert_eq!(body.well.name, "Theni Well 1");

    let response = h.server.get("/api/data/well/tn-the-001").await;
    assert_error(&response, StatusCode::NOT_FOUND, "Well not found");
}

#[tokio::test]
async fn test_district_case_insensitive() {
    let h = harness();

    let body: DistrictWellsResponse = h.server.get("/api/data/district/SALEM").await.json();

    assert_eq!(body.district, "SALEM");
    assert_eq!(body.count, 2);
    assert_eq!(body.wells.len(), 2);
}

#[tokio::test]
async fn test_region_substring() {
    let h = harness();

    let body: RegionWellsResponse = h.server.get("/api/data/region/ghats").await.json();

    assert_eq!(body.region, "ghats");
    assert_eq!(body.count, 1);
    assert_eq!(body.wells[0].id, "TN-THE-001");
}

#[tokio::test]
async fn test_map_view() {
    let h = harness();

    let map: MapView = h.server.get("/api/data/map").await.json();

    assert_eq!(map.wells.len(), 3);
    assert_eq!(map.stats.total, 3);
    assert_eq!(map.stats.by_risk.high, 1);
    assert_eq!(map.stats.by_risk.low, 2);
    assert_eq!(map.stats.by_district[0].name, "Salem");
    assert_eq!(map.stats.by_district[0].count, 2);
}

#[tokio::test]
async fn test_contacts_for_district() {
    let h = harness();

    let body: Value = h
        .server
        .get("/api/data/contacts")
        .add_query_param("district", "Madurai")
        .await
        .json();

    assert_eq!(body["district"], "Madurai");
    assert_eq!(body["contact"]["office"], "Madurai City Municipal Corporation");
    assert_eq!(body["stateContacts"]["tnWaterBoard"]["helpline"], "1916");
    assert!(body.get("municipalities").is_none());
}

#[tokio::test]
async fn test_contacts_unknown_district_falls_back() {
    let h = harness();

    let body: Value = h
        .server
        .get("/api/data/contacts")
        .add_query_param("district", "Atlantis")
        .await
        .json();

    assert_eq!(body["contact"]["office"], "District Water Supply Office");
}

#[tokio::test]
async fn test_contacts_directory() {
    let h = harness();

    let body: Value = h.server.get("/api/data/contacts").await.json();

    let municipalities = body["municipalities"].as_object().unwrap();
    assert_eq!(municipalities.len(), 38);
    assert_eq!(municipalities["Chennai"]["helpline"], "1913");
    assert_eq!(body["stateContacts"]["groundwaterAuth"]["email"], "sgwa@tn.gov.in");
}

// =============================================================================
// ADMIN ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_admin_requires_admin_role() {
    let h = harness();

    let response = h.server.post("/api/admin/reload-data").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");

    let response = h
        .server
        .post("/api/admin/reload-data")
        .add_header(header::AUTHORIZATION, bearer("guest"))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");

    let staff = login(&h.server, "staff@ingres.gov", "Staff@123").await;
    let response = h
        .server
        .post("/api/admin/reload-data")
        .add_header(header::AUTHORIZATION, bearer(&staff))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Insufficient permissions");
}

#[tokio::test]
async fn test_reload_picks_up_file_changes() {
    let h = harness();
    let token = admin_token(&h.server).await;

    std::fs::write(
        h.dir.path().join("sampleWells.json"),
        r#"[{"id": "TN-KAR-001", "name": "Karur Well 1", "district": "Karur", "tdsLevel": 520}]"#,
    )
    .unwrap();

    let response = h
        .server
        .post("/api/admin/reload-data")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_ok();
    let body: AdminDataResponse = response.json();
    assert_eq!(body.message, "Reloaded 4 records from data files");
    assert_eq!(body.overview.moderate_risk_sites, 1);
}

#[tokio::test]
async fn test_upload_csv_replaces_and_persists() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let csv = "ID,Name,District,TDS,yieldLph\nU-1,Upload One,Karur,450,700\nU-2,Upload Two,Karur,610,2000\n";
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(csv.as_bytes().to_vec())
            .file_name("wells.csv")
            .mime_type("text/csv"),
    );

    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: AdminDataResponse = response.json();
    assert_eq!(body.message, "Uploaded 2 records");
    assert_eq!(body.overview.total_sites, 2);
    assert_eq!(body.overview.high_risk_sites, 1);

    let health: HealthResponse = h.server.get("/health").await.json();
    assert_eq!(health.wells_loaded, 2);

    let saved = std::fs::read_to_string(h.dir.path().join("groundwaterData.json")).unwrap();
    assert!(saved.contains("U-2"));
    assert!(!saved.contains("TN-SAL-001"));
}

#[tokio::test]
async fn test_upload_requires_file() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "CSV file is required");

    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "CSV file is required");
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"{}".to_vec())
            .file_name("wells.json")
            .mime_type("application/json"),
    );
    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Only CSV files allowed");
}

#[tokio::test]
async fn test_upload_malformed_csv() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"id,name\nA,B,C\n".to_vec())
            .file_name("broken.csv")
            .mime_type("text/csv"),
    );
    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Unable to parse CSV. Please verify the headers.",
    );
    // The dataset is untouched
    let health: HealthResponse = h.server.get("/health").await.json();
    assert_eq!(health.wells_loaded, 3);
}

#[tokio::test]
async fn test_upload_too_large() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let big = vec![b'a'; 6 * 1024 * 1024];
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(big).file_name("big.csv").mime_type("text/csv"),
    );
    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

fn csv_part(csv: String) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(csv.into_bytes())
            .file_name("wells.csv")
            .mime_type("text/csv"),
    )
}

#[tokio::test]
async fn test_upload_file_just_under_limit() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let pad = "x".repeat(100_000);
    let mut csv = String::from("id,name,district,tds,notes\n");
    let mut rows = 0;
    loop {
        let row = format!("N-{rows},Near Limit {rows},Karur,400,{pad}\n");
        if csv.len() + row.len() > MAX_UPLOAD_BYTES - 1024 {
            break;
        }
        csv.push_str(&row);
        rows += 1;
    }

    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(csv_part(csv))
        .await;

    response.assert_status_ok();
    let body: AdminDataResponse = response.json();
    assert_eq!(body.overview.total_sites, rows);
}

#[tokio::test]
async fn test_upload_file_one_byte_over_limit() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let response = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(csv_part("a".repeat(MAX_UPLOAD_BYTES + 1)))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let health: HealthResponse = h.server.get("/health").await.json();
    assert_eq!(health.wells_loaded, 3);
}

#[tokio::test]
async fn test_concurrent_uploads_keep_file_and_memory_in_step() {
    let h = harness();
    let token = admin_token(&h.server).await;

    let one = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(csv_part("id,name,district,tds\nA-1,Alpha,Karur,300\n".to_string()));
    let two = h
        .server
        .post("/api/admin/upload-csv")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .multipart(csv_part(
            "id,name,district,tds\nB-1,Beta,Erode,300\nB-2,Gamma,Erode,320\n".to_string(),
        ));
    let (first, second) = tokio::join!(one.into_future(), two.into_future());
    first.assert_status_ok();
    second.assert_status_ok();

    let in_memory: HealthResponse = h.server.get("/health").await.json();
    let reloaded: AdminDataResponse = h
        .server
        .post("/api/admin/reload-data")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(reloaded.overview.total_sites, in_memory.wells_loaded);
}

// =============================================================================
// CHATBOT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_chatbot_reply() {
    let h = harness();

    let response = h
        .server
        .post("/api/chatbot")
        .json(&json!({ "message": "Tell me about Salem Well 2" }))
        .await;

    response.assert_status_ok();
    let chat: ChatResponse = response.json();
    assert!(chat.reply.contains("Salem Well 2"));
    assert!(!chat.suggestions.is_empty());
    assert_eq!(chat.language, Language::En);
    assert!(chat.timestamp.ends_with('Z'));
}

#[tokio::test]
async fn test_chatbot_explicit_language() {
    let h = harness();

    let chat: ChatResponse = h
        .server
        .post("/api/chatbot")
        .json(&json!({ "message": "hello", "language": "ta" }))
        .await
        .json();

    assert_eq!(chat.language, Language::Ta);
}

#[tokio::test]
async fn test_chatbot_requires_message() {
    let h = harness();

    for body in [json!({}), json!({ "message": "   " })] {
        let response = h.server.post("/api/chatbot").json(&body).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Message is required");
    }
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let h = harness_with(|c| c.rate_limit_per_minute = 2);

    h.server.get("/health").await.assert_status_ok();
    h.server.get("/health").await.assert_status_ok();
    let response = h.server.get("/health").await;

    assert_error(
        &response,
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests, please try again later.",
    );
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let h = harness();
    let response = h.server.get("/api/nope").await;
    response.assert_status_not_found();
}

// =============================================================================
// CONFIGURATION TESTS
// =============================================================================

#[test]
fn test_config_load_reads_environment() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests that touch the environment run under ENV_TEST_MUTEX.
    unsafe {
        std::env::remove_var("INGRES_CONFIG");
        std::env::set_var("INGRES_RATE_LIMIT", "15");
        std::env::set_var("ADMIN_EMAIL", "root@ingres.gov");
    }

    let config = Config::load(None);

    // SAFETY: Tests that touch the environment run under ENV_TEST_MUTEX.
    unsafe {
        std::env::remove_var("INGRES_RATE_LIMIT");
        std::env::remove_var("ADMIN_EMAIL");
    }

    let config = config.unwrap();
    assert_eq!(config.rate_limit_per_minute, 15);
    assert_eq!(config.users[0].email, "root@ingres.gov");
}

#[test]
fn test_config_load_from_file() {
    let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ingres.toml");
    std::fs::write(&path, "port = 9090\nenvironment = \"staging\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();

    assert_eq!(config.port, 9090);
    assert!(config.users.iter().any(|u| u.role == Role::Admin));
}
