//! Lifecycle Module - per-surface request state machines

pub mod controller;
pub mod types;

pub use controller::RequestController;
pub use types::{Completion, LifecycleError, Request, RequestState, SubmitMode, Ticket};
