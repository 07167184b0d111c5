//! Notify Module - operator-facing notifications

pub mod surface;
pub mod types;

pub use surface::NotificationSurface;
pub use types::{Notification, Severity, Signal, VerdictNotice};
