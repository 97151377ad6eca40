use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use models::{db::Storage, product};

use crate::errors::ApiError;

/// Shared request state. The storage handle is constructed once at startup
/// and injected here, so tests can substitute their own store.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// GET /api/products: every row of the products table, passed through
/// unchanged. Zero rows serialize as `[]`, never null.
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let rows = product::list_all(&state.storage)
        .await
        .map_err(|e| ApiError(e.to_string()))?;
    Ok(Json(rows))
}

/// Build the application router: product listing plus health, behind CORS
/// and request tracing.
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(list_products))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
