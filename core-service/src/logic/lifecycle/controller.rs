//! Request Lifecycle Controller
//!
//! Idle → Pending → Succeeded | Failed, one instance per UI surface.
//!
//! Every `submit` and `cancel` bumps a generation counter. A response is only
//! applied if its ticket carries the current generation, so a late answer to a
//! superseded or cancelled call can never overwrite newer state.

use chrono::Utc;
use uuid::Uuid;

use crate::logic::error::SignalResult;
use super::types::{Completion, LifecycleError, Request, RequestState, SubmitMode, Ticket};

pub struct RequestController<I, T> {
    name: &'static str,
    mode: SubmitMode,
    generation: u64,
    current: Option<Request<I, T>>,
    idle: RequestState<T>,
}

impl<I: Clone, T> RequestController<I, T> {
    pub fn new(name: &'static str, mode: SubmitMode) -> Self {
        Self {
            name,
            mode,
            generation: 0,
            current: None,
            idle: RequestState::Idle,
        }
    }

    pub fn single_flight(name: &'static str) -> Self {
        Self::new(name, SubmitMode::SingleFlight)
    }

    pub fn replacing(name: &'static str) -> Self {
        Self::new(name, SubmitMode::Replace)
    }

    /// Start a new request. Allowed from any state except `Pending` in
    /// single-flight mode; a terminal result from before is discarded.
    pub fn submit(&mut self, input: I) -> Result<Ticket<I>, LifecycleError> {
        if let Some(pending) = self.current.as_ref().filter(|r| r.state.is_pending()) {
            match self.mode {
                SubmitMode::SingleFlight => {
                    log::debug!("[{}] rejected submit, {} still pending", self.name, pending.id);
                    return Err(LifecycleError::AlreadyPending { request_id: pending.id });
                }
                SubmitMode::Replace => {
                    log::debug!(
                        "[{}] superseding pending request {} (generation {})",
                        self.name,
                        pending.id,
                        pending.generation
                    );
                }
            }
        }

        self.generation += 1;
        let request = Request {
            id: Uuid::new_v4(),
            generation: self.generation,
            input: input.clone(),
            state: RequestState::Pending,
            submitted_at: Utc::now(),
            finished_at: None,
        };

        let ticket = Ticket {
            request_id: request.id,
            generation: request.generation,
            input,
        };

        log::debug!("[{}] submitted {} (generation {})", self.name, request.id, request.generation);
        self.current = Some(request);
        Ok(ticket)
    }

    /// Whether a response for `ticket` would still be applied
    pub fn is_current(&self, ticket: &Ticket<I>) -> bool {
        self.current
            .as_ref()
            .map(|r| r.generation == ticket.generation && r.id == ticket.request_id && r.state.is_pending())
            .unwrap_or(false)
    }

    /// Resolve or reject the request named by `ticket`
    pub fn complete(&mut self, ticket: &Ticket<I>, result: SignalResult<T>) -> Completion {
        if !self.is_current(ticket) {
            log::debug!(
                "[{}] discarded stale response for {} (generation {}, current {})",
                self.name,
                ticket.request_id,
                ticket.generation,
                self.generation
            );
            return Completion::Discarded;
        }

        if let Some(request) = self.current.as_mut() {
            request.state = match result {
                Ok(value) => RequestState::Succeeded(value),
                Err(err) => {
                    log::info!("[{}] request {} failed: {}", self.name, request.id, err);
                    RequestState::Failed(err)
                }
            };
            request.finished_at = Some(Utc::now());
        }
        Completion::Applied
    }

    /// Abandon a pending request (owner torn down). Late responses are dropped.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        if was_pending {
            if let Some(request) = self.current.take() {
                log::debug!("[{}] cancelled {}", self.name, request.id);
            }
        }
        self.generation += 1;
        was_pending
    }

    pub fn state(&self) -> &RequestState<T> {
        self.current.as_ref().map(|r| &r.state).unwrap_or(&self.idle)
    }

    pub fn current(&self) -> Option<&Request<I, T>> {
        self.current.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }
}
