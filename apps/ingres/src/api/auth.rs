//! # Authentication Module
//!
//! In-memory sessions and role checks for the INGRES HTTP API.
//!
//! ## Usage
//!
//! Obtain a token from `/api/auth/login` or `/api/auth/guest`, then send it:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! Data and chatbot routes also accept no token at all (or the literal
//! token `guest`) and treat the caller as an anonymous guest.

use super::{AppState, error::ApiError};
use crate::config::{Role, UserAccount};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

pub const AUTH_REQUIRED: &str = "Authentication required";
pub const SESSION_EXPIRED: &str = "Session expired";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const GUEST_TOKEN: &str = "guest";

// =============================================================================
// SESSION PAYLOAD
// =============================================================================

/// The caller attached to a request, also the `user` object of auth responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_guest: bool,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
}

impl SessionUser {
    /// Tokenless caller on a guest-friendly route.
    #[must_use]
    pub fn anonymous_guest() -> Self {
        Self {
            token: None,
            id: "guest".to_string(),
            name: "Guest User".to_string(),
            email: None,
            role: Role::Guest,
            tagline: None,
            is_guest: true,
            issued_at: None,
        }
    }

    fn guest_session(token: String, issued_at: i64) -> Self {
        Self {
            token: Some(token),
            email: Some("guest@ingres.gov".to_string()),
            tagline: Some("Chat-only access".to_string()),
            issued_at: Some(issued_at),
            ..Self::anonymous_guest()
        }
    }

    fn user_session(token: String, account: &UserAccount, issued_at: i64) -> Self {
        Self {
            token: Some(token),
            id: account.id.clone(),
            name: account.name.clone(),
            email: Some(account.email.clone()),
            role: account.role,
            tagline: Some(account.tagline.clone()),
            is_guest: false,
            issued_at: Some(issued_at),
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Token to session map. Lost on restart.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionUser>>>,
    expiry_ms: i64,
}

impl SessionStore {
    #[must_use]
    pub fn new(expiry_ms: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            expiry_ms,
        }
    }

    /// Store `session` under its token. Sessions without a token are ignored.
    pub async fn insert(&self, session: SessionUser) {
        if let Some(token) = session.token.clone() {
            self.sessions.write().await.insert(token, session);
        }
    }

    /// Open a guest session with a `guest-<uuid>` token.
    pub async fn issue_guest(&self) -> SessionUser {
        let token = format!("guest-{}", uuid::Uuid::new_v4());
        let session = SessionUser::guest_session(token, now_millis());
        self.insert(session.clone()).await;
        tracing::info!(event = "guest_session", "Guest session issued");
        session
    }

    /// Open a session for `account`.
    pub async fn issue_for(&self, account: &UserAccount) -> SessionUser {
        let token = uuid::Uuid::new_v4().to_string();
        let session = SessionUser::user_session(token, account, now_millis());
        self.insert(session.clone()).await;
        tracing::info!(
            event = "login",
            user = %account.id,
            role = %account.role,
            "Session issued"
        );
        session
    }

    /// Look up a live session. Expired sessions are removed.
    pub async fn resolve(&self, token: &str) -> Result<SessionUser, ApiError> {
        self.resolve_at(token, now_millis()).await
    }

    pub async fn resolve_at(&self, token: &str, now: i64) -> Result<SessionUser, ApiError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get(token) else {
            tracing::warn!(
                event = "auth_failure",
                reason = "unknown_token",
                "Authentication failed: unknown session token"
            );
            return Err(ApiError::Unauthorized(AUTH_REQUIRED));
        };

        let issued_at = session.issued_at.unwrap_or(0);
        if now.saturating_sub(issued_at) > self.expiry_ms {
            sessions.remove(token);
            tracing::warn!(
                event = "auth_failure",
                reason = "session_expired",
                "Authentication failed: session expired"
            );
            return Err(ApiError::Unauthorized(SESSION_EXPIRED));
        }

        Ok(session.clone())
    }

    /// Drop the session for `token`, if any.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Compare two secrets in constant time.
///
/// Both sides are padded to the same length so `ct_eq` always runs over the
/// same number of bytes.
fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

/// Find the account matching `email` (any case) and `password`.
#[must_use]
pub fn authenticate<'a>(
    users: &'a [UserAccount],
    email: &str,
    password: &str,
) -> Option<&'a UserAccount> {
    let email = email.trim().to_lowercase();
    users
        .iter()
        .find(|u| u.email.to_lowercase() == email && secrets_match(password, &u.password))
}

/// Token from the `Authorization` header, `Bearer` prefix removed.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    allow_guest: bool,
    roles: &[Role],
) -> Result<SessionUser, ApiError> {
    let token = bearer_token(headers);

    if allow_guest && token.as_deref().is_none_or(|t| t == GUEST_TOKEN) {
        return Ok(SessionUser::anonymous_guest());
    }

    let Some(token) = token else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            "Missing Authorization header"
        );
        return Err(ApiError::Unauthorized(AUTH_REQUIRED));
    };

    let session = state.sessions.resolve(&token).await?;
    if !roles.is_empty() && !roles.contains(&session.role) {
        tracing::warn!(
            event = "auth_failure",
            reason = "insufficient_role",
            role = %session.role,
            "Authorization failed: insufficient permissions"
        );
        return Err(ApiError::Forbidden);
    }
    Ok(session)
}

/// Any live session.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authorize(&state, request.headers(), false, &[]).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// A live session of any role, or an anonymous guest.
pub async fn allow_guest(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authorize(&state, request.headers(), true, &[]).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// A live admin session.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authorize(&state, request.headers(), false, &[Role::Admin]).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================
