//! Data models

pub mod request;
pub mod risk;
pub mod quality;

pub use request::*;
pub use risk::*;
pub use quality::*;
