use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::logic::error::SignalError;

/// What happens when `submit` is called while a request is still pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// Reject the new submission (one upload per widget)
    SingleFlight,
    /// Cancel the in-flight call and start over (equipment selection changed)
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(SignalError),
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SignalError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// One submitted operation and its progress
#[derive(Debug, Clone)]
pub struct Request<I, T> {
    pub id: Uuid,
    pub generation: u64,
    pub input: I,
    pub state: RequestState<T>,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Handed out by `submit`; the only way to complete the request it names
#[derive(Debug, Clone)]
pub struct Ticket<I> {
    pub request_id: Uuid,
    pub generation: u64,
    pub input: I,
}

/// Result of handing a gateway response back to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// The response belonged to the current generation and was applied
    Applied,
    /// The request was superseded or cancelled; the response was dropped
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("request {request_id} is still pending")]
    AlreadyPending { request_id: Uuid },
}
