//! # Middleware Module
//!
//! Rate limiting for the INGRES HTTP API.
//!
//! ## Configuration
//!
//! - `INGRES_RATE_LIMIT` / `rate_limit_per_minute`: requests per minute
//!   per client IP (default 60, 0 disables the limiter)
//!
//! The client IP comes from the connection (`ConnectInfo<SocketAddr>`).
//! Requests without connection info share a single bucket.

use super::error::ApiError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Per-client rate limiter type alias.
pub type ClientRateLimiter =
    Arc<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>;

/// Create a limiter allowing `requests_per_minute` per client IP, or `None`
/// when it is 0.
///
/// Each client gets the full quota as an initial burst.
#[must_use]
pub fn create_rate_limiter(requests_per_minute: u32) -> Option<ClientRateLimiter> {
    let rpm = NonZeroU32::new(requests_per_minute)?;
    Some(Arc::new(RateLimiter::keyed(Quota::per_minute(rpm))))
}

/// Peer IP of the request, or `0.0.0.0` when the server was not started
/// with connection info.
#[must_use]
pub fn client_ip(request: &Request<Body>) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        })
}

/// Reject the request with 429 once the client's quota is spent.
pub async fn rate_limit_middleware(
    State(limiter): State<ClientRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);
    match limiter.check_key(&ip) {
        Ok(()) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!(
                client = %ip,
                path = %request.uri().path(),
                "Rate limit exceeded"
            );
            Err(ApiError::RateLimited)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rate_limiter() {
        let limiter = create_rate_limiter(2);
        assert!(limiter.is_some());
        if let Some(limiter) = limiter {
            let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
            assert!(limiter.check_key(&ip).is_ok());
            assert!(limiter.check_key(&ip).is_ok());
            assert!(limiter.check_key(&ip).is_err());
        }
    }

    #[test]
    fn test_clients_have_separate_quotas() {
        let limiter = create_rate_limiter(1).unwrap();
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        // a spent its quota; b still has its own
        assert!(limiter.check_key(&b).is_ok());
        assert!(limiter.check_key(&b).is_err());
    }

    #[test]
    fn test_client_ip_from_connect_info() {
        let addr: SocketAddr = "192.168.1.20:51000".parse().unwrap();
        let request = Request::builder()
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), addr.ip());

        let bare = Request::new(Body::empty());
        assert_eq!(client_ip(&bare), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_zero_disables() {
        assert!(create_rate_limiter(0).is_none());
    }
}
