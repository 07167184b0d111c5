//! Request lifecycle views

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use qc_signal_core::logic::lifecycle::{RequestController, RequestState};

/// Snapshot of one controller: the latest request and where it stands
#[derive(Debug, Serialize)]
pub struct RequestView<T> {
    pub request_id: Option<Uuid>,
    pub generation: u64,
    pub status: RequestState<T>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl<T: Clone> RequestView<T> {
    pub fn of<I: Clone>(controller: &RequestController<I, T>) -> Self {
        let current = controller.current();
        Self {
            request_id: current.map(|r| r.id),
            generation: controller.generation(),
            status: controller.state().clone(),
            submitted_at: current.map(|r| r.submitted_at),
            finished_at: current.and_then(|r| r.finished_at),
        }
    }
}
