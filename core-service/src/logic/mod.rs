//! Logic Module - signal pipeline
//!
//! - `gateway/` - HTTP inference and quality-standards clients
//! - `lifecycle/` - per-surface request state machines
//! - `risk/` - risk history and threshold alerts
//! - `notify/` - operator notification surface
//! - `dashboard/` - per-session context wiring the above together

pub mod error;
pub mod gateway;
pub mod quality;
pub mod lifecycle;
pub mod risk;
pub mod notify;
pub mod preferences;
pub mod dashboard;
