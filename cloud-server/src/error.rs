//! Error handling

use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use qc_signal_core::logic::lifecycle::LifecycleError;
use qc_signal_core::{ErrorKind, SignalError};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Auth errors
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("unauthorized")]
    Unauthorized,

    // Request errors
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    ValidationError(String),
    #[error("conflict: {0}")]
    Conflict(String),

    /// The response arrived for a request that is no longer current
    #[error("request superseded")]
    Superseded,

    /// Failure surfaced by the signal pipeline
    #[error(transparent)]
    Signal(SignalError),

    // Generic errors
    #[error("internal: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut kind: Option<ErrorKind> = None;

        let (status, error_message) = match &self {
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired".to_string()),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Superseded => (StatusCode::CONFLICT, "request superseded".to_string()),
            AppError::Signal(err) => {
                kind = Some(err.kind());
                signal_response(err)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(kind) = kind {
            body["kind"] = json!(kind);
        }

        (status, Json(body)).into_response()
    }
}

fn signal_response(err: &SignalError) -> (StatusCode, String) {
    match err {
        SignalError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        SignalError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        SignalError::OutOfOrder { .. } => (StatusCode::CONFLICT, err.to_string()),
        SignalError::Network { .. } => {
            tracing::error!("Inference service unreachable: {}", err);
            (StatusCode::BAD_GATEWAY, "Inference service unreachable".to_string())
        }
        SignalError::Service { .. } => {
            tracing::error!("External service error: {}", err);
            (StatusCode::BAD_GATEWAY, "External service error".to_string())
        }
    }
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        AppError::Signal(err)
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenInvalid,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("gateway task failed: {}", err))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::ValidationError(format!("invalid multipart body: {}", err.body_text()))
    }
}
