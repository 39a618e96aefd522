//! HTTP API Layer
//!
//! REST surface of the claim router, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim ingest, rule ingest, reroute, status and health
//! - **Middleware**: tracing and audit logging
//! - **DTOs**: request/response bodies
//! - **Error Handling**: consistent error responses; an unavailable engine
//!   answers 503
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(handle, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_routing::EngineHandle;

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{claims, health, rules, status};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: EngineHandle,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `engine` - Handle to the routing engine; may be unavailable
/// * `config` - API configuration
pub fn create_router(engine: EngineHandle, config: ApiConfig) -> Router {
    let state = AppState { engine, config };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let pathway_routes = Router::new()
        .route("/ingest-claim", post(claims::ingest_claim))
        .route("/reroute", post(claims::reroute_claims))
        .route("/ingest-rules", post(rules::ingest_rules))
        .route("/status", get(status::engine_status))
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/pathway", pathway_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
