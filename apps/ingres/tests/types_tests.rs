//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use ingres::api::{
    ChatRequest, ChatResponse, DirectoryResponse, DistrictContactResponse, ErrorResponse,
    HealthResponse, LoginRequest, SessionUser,
};
use ingres::config::Role;
use ingres_core::{Language, Municipalities, STATE_CONTACTS, municipality_contact};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_new() {
    let health = HealthResponse::new("production", 12);
    assert_eq!(health.status, "ok");
    assert_eq!(health.environment, "production");
    assert_eq!(health.wells_loaded, 12);
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let json = serde_json::to_string(&HealthResponse::new("development", 0)).unwrap();
    assert!(json.contains("\"service\":\"INGRES backend\""));
    assert!(json.contains("\"wellsLoaded\":0"));
    assert!(json.contains("\"languages\":[\"en\",\"ta\",\"hi\",\"te\"]"));
}

// =============================================================================
// REQUEST TESTS
// =============================================================================

#[test]
fn test_login_request_partial() {
    let request: LoginRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
    assert_eq!(request.email.as_deref(), Some("a@b.c"));
    assert!(request.password.is_none());
}

#[test]
fn test_chat_request_defaults() {
    let request: ChatRequest = serde_json::from_str("{}").unwrap();
    assert!(request.message.is_none());
    assert!(request.language.is_none());
}

// =============================================================================
// RESPONSE TESTS
// =============================================================================

#[test]
fn test_session_user_roundtrip_keeps_flags() {
    let json = r#"{"token":"t","id":"guest","name":"Guest User","role":"guest","isGuest":true,"issuedAt":5}"#;
    let user: SessionUser = serde_json::from_str(json).unwrap();
    assert_eq!(user.role, Role::Guest);
    assert!(user.is_guest);
    assert_eq!(user.issued_at, Some(5));

    let back = serde_json::to_value(&user).unwrap();
    assert!(back.get("email").is_none());
    assert_eq!(back["isGuest"], true);
}

#[test]
fn test_user_session_omits_guest_flag() {
    let user = SessionUser {
        token: Some("t".to_string()),
        id: "admin-001".to_string(),
        name: "INGRES Administrator".to_string(),
        email: Some("admin@ingres.gov".to_string()),
        role: Role::Admin,
        tagline: Some("Full system access".to_string()),
        is_guest: false,
        issued_at: Some(1),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("isGuest").is_none());
    assert_eq!(json["role"], "admin");
}

#[test]
fn test_chat_response_language_code() {
    let response = ChatResponse {
        reply: "hi".to_string(),
        suggestions: vec![],
        language: Language::Hi,
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["language"], "hi");
}

#[test]
fn test_error_response_shape() {
    let json = serde_json::to_string(&ErrorResponse {
        error: "Well not found".to_string(),
    })
    .unwrap();
    assert_eq!(json, r#"{"error":"Well not found"}"#);
}

#[test]
fn test_contact_responses_camel_case() {
    let district = DistrictContactResponse {
        district: "Salem".to_string(),
        contact: municipality_contact("Salem"),
        state_contacts: STATE_CONTACTS,
    };
    let json = serde_json::to_value(&district).unwrap();
    assert_eq!(json["contact"]["phone"], "0427-231-5566");
    assert!(json["stateContacts"]["disasterMgmt"].is_object());

    let directory = DirectoryResponse {
        municipalities: Municipalities,
        state_contacts: STATE_CONTACTS,
    };
    let json = serde_json::to_value(&directory).unwrap();
    assert!(json["municipalities"]["Theni"].is_object());
}
