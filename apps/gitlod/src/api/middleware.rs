//! # Middleware Module
//!
//! Rate limiting for the gitlod HTTP API.
//!
//! The limit comes from `[server] rate_limit` (or `GITLOD_RATE_LIMIT`);
//! 0 disables the limiter entirely.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use super::ApiError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Fallback when a zero quota reaches the constructor.
const DEFAULT_RPS: NonZeroU32 = match NonZeroU32::new(crate::config::DEFAULT_RATE_LIMIT) {
    Some(rps) => rps,
    None => NonZeroU32::MIN,
};

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a global limiter allowing `requests_per_second`.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(DEFAULT_RPS);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Reject with a JSON 429 once the global quota is spent.
///
/// The body says how long until the next request would be admitted.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(not_until) = limiter.check() {
        let wait = not_until.wait_time_from(DefaultClock::default().now());
        tracing::warn!(wait_ms = wait.as_millis() as u64, "Rate limit exceeded");
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            format!("Rate limit exceeded, retry in {} ms", wait.as_millis()),
        ));
    }
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================
