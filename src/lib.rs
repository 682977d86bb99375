//! TripXplo quote pricing engine.
//!
//! Computes EMI plans, family types, swap deltas and package quotes, and
//! serves them over a small JSON API.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod pricing;

use axum::{extract::State, routing::get, Json, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::AppCache;
use crate::pricing::responses::HealthResponse;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    /// CRM database (family types)
    pub crm: PgPool,
    /// Quote generator database (packages and swap options)
    pub quotes: PgPool,
    pub cache: AppCache,
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}
