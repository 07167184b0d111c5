//! Signal pipeline error taxonomy

use chrono::{DateTime, Utc};
use serde::Serialize;

pub type SignalResult<T> = Result<T, SignalError>;

/// Every failure the pipeline can surface to the component that invoked it.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalError {
    /// Bad input, rejected before any network call
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transport-level failure (connect, timeout, broken body)
    #[error("network error: {message}")]
    Network { message: String },

    /// Backend reached but reported a failure or answered with garbage
    #[error("service error{}: {message}", status_suffix(.status))]
    Service { status: Option<u16>, message: String },

    /// Equipment id unknown to the prediction service
    #[error("equipment not found: {equipment_id}")]
    NotFound { equipment_id: String },

    /// Sample older than the last recorded one for this equipment
    #[error("out-of-order sample for {equipment_id}: {attempted} precedes {last}")]
    OutOfOrder {
        equipment_id: String,
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },
}

/// Discriminant of [`SignalError`], carried by failed requests and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Service,
    NotFound,
    OutOfOrder,
}

impl SignalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service { status, message: message.into() }
    }

    pub fn not_found(equipment_id: impl Into<String>) -> Self {
        Self::NotFound { equipment_id: equipment_id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::Service { .. } => ErrorKind::Service,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::OutOfOrder { .. } => ErrorKind::OutOfOrder,
        }
    }

    /// Only transport failures are safe to repeat without user involvement.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Network
    }
}

impl From<reqwest::Error> for SignalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::service(err.status().map(|s| s.as_u16()), format!("malformed response: {}", err))
        } else if let Some(status) = err.status() {
            Self::service(Some(status.as_u16()), err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}
