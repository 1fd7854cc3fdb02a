/*
 * Responsibility
 * - POST /services/{service_id}/release
 * - GET  /services/{service_id}/requested-claims
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::dto::release::{ReleaseRequest, ReleaseResponse, RequestedClaimsResponse},
    error::AppError,
    state::AppState,
};

pub async fn release_claims(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> Result<Json<ReleaseResponse>, AppError> {
    let claims = state.decisions.release_claims(&service_id, &req.attributes)?;

    tracing::debug!(
        service_id = %service_id,
        released = claims.len(),
        "release decision"
    );
    Ok(Json(ReleaseResponse { claims }))
}

pub async fn requested_claims(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<RequestedClaimsResponse>, AppError> {
    let claims = state.decisions.requested_claims(&service_id)?;
    Ok(Json(RequestedClaimsResponse { claims }))
}
