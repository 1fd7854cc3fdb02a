/*
 * Responsibility
 * - v1 URL layout
 * - /health plus the per-service decision endpoints
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    access::evaluate_access,
    health::health,
    release::{release_claims, requested_claims},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/services/{service_id}/access", post(evaluate_access))
        .route("/services/{service_id}/release", post(release_claims))
        .route(
            "/services/{service_id}/requested-claims",
            get(requested_claims),
        )
}
