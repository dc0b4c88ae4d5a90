//! # gitlod HTTP API Module
//!
//! Serves the linked-data views over axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Redirect to `/users`
//! - `GET /users` - Every loaded entity
//! - `GET /repos` - Every loaded entity
//! - `GET /users/{login}` - One person, fetched
//! - `GET /users/{login}/repos/{repo}` - One project, fetched
//! - `GET /health` - Health check
//!
//! RDF endpoints answer in Turtle unless `?format=nt` or an `Accept` header
//! asks for N-Triples.
//!
//! ## Security Configuration
//!
//! - `[server] cors_origins` / `GITLOD_CORS_ORIGINS`: comma-separated list of
//!   allowed origins, or "*" for all (default: localhost only)
//! - `[server] rate_limit` / `GITLOD_RATE_LIMIT`: requests per second
//!   (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::negotiate;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{ApiError, ErrorResponse, FormatQuery, HealthResponse};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use gitlod_core::{GitlodError, SharedSource, Traversal, TypeRegistry};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// Entities are built per request from the shared source; nothing else is
/// mutable.
#[derive(Clone)]
pub struct AppState {
    pub source: SharedSource,
    pub registry: TypeRegistry,
    pub traversal: Traversal,
}

impl AppState {
    #[must_use]
    pub fn new(source: SharedSource, registry: TypeRegistry, traversal: Traversal) -> Self {
        Self {
            source,
            registry,
            traversal,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::ACCEPT])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// A CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects the upstream quota (if enabled)
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = build_cors_layer(server.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/users", get(handlers::users_handler))
        .route("/users/{login}", get(handlers::user_handler))
        .route("/users/{login}/repos/{repo}", get(handlers::repo_handler))
        .route("/repos", get(handlers::repos_handler));

    if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(server.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind `server.addr()` and serve until the process is stopped.
pub async fn run_server(state: AppState, server: &ServerConfig) -> Result<(), GitlodError> {
    let router = create_router(state, server);
    let addr = server.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GitlodError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("gitlod HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| GitlodError::IoError(format!("Server error: {}", e)))
}
