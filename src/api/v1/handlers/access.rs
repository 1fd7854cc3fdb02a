/*
 * Responsibility
 * - POST /services/{service_id}/access
 * - A deny is `200 {"allowed": false}`; a failed probe is an error response
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::dto::access::{AccessDecisionRequest, AccessDecisionResponse},
    error::AppError,
    state::AppState,
};

pub async fn evaluate_access(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(req): Json<AccessDecisionRequest>,
) -> Result<Json<AccessDecisionResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_ACCESS_REQUEST", msg))?;

    let request = req.into_access_request(&service_id);
    let allowed = state
        .decisions
        .evaluate_access(&service_id, request)
        .await?;

    tracing::info!(service_id = %service_id, allowed, "access decision");
    Ok(Json(AccessDecisionResponse { allowed }))
}
