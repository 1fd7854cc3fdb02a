/*
 * Responsibility
 * - Application-wide ApiError definition
 * - IntoResponse (HTTP status / JSON error body)
 * - Map decision errors so a failed probe stays distinguishable from a deny
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::DecisionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("access evaluation failed: {0}")]
    AccessEvaluation(String),
    #[error("service registry unavailable")]
    RegistryUnavailable,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::BadRequest { code, .. } => (StatusCode::BAD_REQUEST, *code),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::AccessEvaluation(_) => (StatusCode::BAD_GATEWAY, "ACCESS_EVALUATION_FAILED"),
            AppError::RegistryUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "REGISTRY_UNAVAILABLE")
            }
        };

        let message = match &self {
            AppError::BadRequest { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DecisionError> for AppError {
    fn from(e: DecisionError) -> Self {
        match e {
            DecisionError::ServiceNotFound(id) => AppError::not_found(format!("service {id}")),
            DecisionError::Registry(err) => {
                tracing::error!(error = %err, "service registry lookup failed");
                AppError::RegistryUnavailable
            }
            DecisionError::Access(err) => {
                tracing::warn!(error = %err, "remote access evaluation failed");
                AppError::AccessEvaluation(err.to_string())
            }
        }
    }
}
