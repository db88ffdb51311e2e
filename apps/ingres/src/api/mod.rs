//! # INGRES HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! Public:
//! - `GET /health` - Health check
//! - `POST /api/auth/guest` - Open a guest session
//! - `POST /api/auth/login` - Log in with email and password
//!
//! Session:
//! - `POST /api/auth/logout`, `GET /api/auth/me`
//!
//! Guest or session:
//! - `GET /api/data/{overview, groundwater, map, contacts}`
//! - `GET /api/data/well/{id}`, `/api/data/district/{district}`, `/api/data/region/{region}`
//! - `POST /api/chatbot`
//!
//! Admin:
//! - `POST /api/admin/reload-data`, `POST /api/admin/upload-csv`
//!
//! ## Security Configuration
//!
//! See [`crate::config`] for `INGRES_CORS_ORIGINS`, `INGRES_RATE_LIMIT` and
//! the account variables.

mod auth;
mod error;
mod handlers;
mod middleware;
mod types;

pub use auth::{SessionStore, SessionUser, authenticate, bearer_token};
pub use error::{ApiError, ErrorResponse};
pub use middleware::{ClientRateLimiter, client_ip, create_rate_limiter};
pub use types::{
    AdminDataResponse, AuthResponse, ChatRequest, ChatResponse, ContactsQuery, DirectoryResponse,
    DistrictContactResponse, DistrictWellsResponse, HealthResponse, LoginRequest, MeResponse,
    MessageResponse, OverviewResponse, RecordsResponse, RegionWellsResponse, WellResponse,
};

use crate::config::Config;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use ingres_core::{DataSources, Dataset, IngresError, primitives::MAX_UPLOAD_BYTES};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory well dataset.
    pub dataset: Arc<RwLock<Dataset>>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
    /// Files the dataset is loaded from and persisted to.
    pub sources: DataSources,
}

impl AppState {
    /// State over an already loaded dataset.
    #[must_use]
    pub fn new(config: Config, dataset: Dataset) -> Self {
        let sources = DataSources::in_dir(&config.data_dir);
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            sessions: SessionStore::new(config.session_expiry_ms()),
            config: Arc::new(config),
            sources,
        }
    }

    /// State with the dataset merged from `config.data_dir`.
    #[must_use]
    pub fn load(config: Config) -> Self {
        let records = DataSources::in_dir(&config.data_dir).load_merged();
        tracing::info!(count = records.len(), "Dataset loaded");
        Self::new(config, Dataset::new(records))
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `*`: all origins
/// - a comma-separated list: those origins
/// - unset or no valid entry: localhost dev servers only
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (INGRES_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Localhost origins of the usual dashboard dev servers.
fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit - a 5 MiB file plus multipart framing
/// 4. Rate limiting - per-client-IP per-minute quota (if enabled)
/// 5. Authorization - per route group
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.cors_origins.as_deref());

    let rate_limiter = create_rate_limiter(state.config.rate_limit_per_minute);
    match &rate_limiter {
        Some(_) => tracing::info!(
            "Rate limiting enabled: {} requests/minute per client",
            state.config.rate_limit_per_minute
        ),
        None => tracing::info!("Rate limiting disabled"),
    }

    let public = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/auth/guest", post(handlers::guest_handler))
        .route("/api/auth/login", post(handlers::login_handler));

    let session = Router::new()
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route("/api/auth/me", get(handlers::me_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let guest = Router::new()
        .route("/api/data/overview", get(handlers::overview_handler))
        .route("/api/data/groundwater", get(handlers::groundwater_handler))
        .route("/api/data/well/{id}", get(handlers::well_handler))
        .route("/api/data/district/{district}", get(handlers::district_handler))
        .route("/api/data/region/{region}", get(handlers::region_handler))
        .route("/api/data/map", get(handlers::map_handler))
        .route("/api/data/contacts", get(handlers::contacts_handler))
        .route("/api/chatbot", post(handlers::chatbot_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::allow_guest,
        ));

    let admin = Router::new()
        .route("/api/admin/reload-data", post(handlers::reload_handler))
        .route("/api/admin/upload-csv", post(handlers::upload_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let mut router = Router::new()
        .merge(public)
        .merge(session)
        .merge(guest)
        .merge(admin);

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Load the dataset and serve until Ctrl-C.
pub async fn run_server(config: Config) -> Result<(), IngresError> {
    let addr = config.bind_addr();
    let environment = config.environment.clone();
    let state = AppState::load(config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| IngresError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!(%environment, "INGRES backend listening on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| IngresError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
