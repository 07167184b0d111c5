//! HTTP handlers

pub mod health;
pub mod defects;
pub mod maintenance;
pub mod notifications;
pub mod preferences;
pub mod session;
pub mod quality;
