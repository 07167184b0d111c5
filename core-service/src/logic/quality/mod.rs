//! Quality Standards - pass-through types for the external standards service

pub mod types;

pub use types::QualityStandard;
