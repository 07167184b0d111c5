//! QC Signal Core
//!
//! The signal pipeline behind the quality-control dashboard: the defect-detection
//! request lifecycle and the predictive-maintenance risk engine.
//!
//! # Architecture
//!
//! ```text
//! UI action
//!    │
//!    ▼
//! ┌──────────────────┐  ticket   ┌───────────────────┐
//! │ RequestController│ ────────► │ InferenceGateway  │ (HTTP, external models)
//! └────────┬─────────┘ ◄──────── └───────────────────┘
//!          │ complete(ticket, result)
//!          ▼
//! ┌──────────────────┐  evaluate ┌───────────────────┐  record ┌──────────────────────┐
//! │ RiskHistoryStore │ ────────► │ ThresholdAlert    │ ──────► │ NotificationSurface  │
//! └──────────────────┘           │ Engine            │         └──────────────────────┘
//!                                └───────────────────┘
//! ```
//!
//! [`DashboardContext`] owns one of each per operator session.

pub mod constants;
pub mod logic;

pub use logic::dashboard::DashboardContext;
pub use logic::error::{ErrorKind, SignalError, SignalResult};
pub use logic::gateway::{HttpGateway, GatewayConfig, InferenceGateway, StandardsGateway};
