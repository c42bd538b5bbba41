//! Per-IP rate limiting for the signin endpoint.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use crate::web::error::ApiError;

/// Rate limiter keyed by client IP.
pub type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// How often stale per-IP entries are dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Signin rate limit state.
pub struct RateLimitState {
    limiter: KeyedLimiter,
}

impl RateLimitState {
    /// Allow `per_minute` signin attempts per IP. Zero is treated as one.
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Record an attempt from `ip`; false once the quota is exhausted.
    pub fn check(&self, ip: &str) -> bool {
        self.limiter.check_key(&ip.to_string()).is_ok()
    }

    /// Number of IPs currently tracked.
    pub fn tracked(&self) -> usize {
        self.limiter.len()
    }

    /// Drop entries whose quota has fully replenished.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Periodically clean up in the background.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                self.cleanup();
                tracing::trace!(tracked = self.tracked(), "Rate limiter cleaned up");
            }
        });
    }
}

/// Client IP, preferring proxy headers over the socket address.
fn client_ip(req: &Request<Body>) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    header("X-Forwarded-For")
        .or_else(|| header("X-Real-IP"))
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Reject signin attempts beyond the per-IP quota with 429.
pub async fn signin_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, "Signin rate limit exceeded");
        return ApiError::too_many_requests("Too many signin attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_per_ip() {
        let state = RateLimitState::new(3);

        assert!(state.check("127.0.0.1"));
        assert!(state.check("127.0.0.1"));
        assert!(state.check("127.0.0.1"));
        assert!(!state.check("127.0.0.1"));

        assert!(state.check("192.168.1.1"));
        assert_eq!(state.tracked(), 2);
    }

    #[test]
    fn test_zero_quota_allows_one() {
        let state = RateLimitState::new(0);
        assert!(state.check("10.0.0.1"));
        assert!(!state.check("10.0.0.1"));
    }

    #[test]
    fn test_client_ip_from_forwarded_header() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.5, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.5");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }
}
