//! Risk Module - maintenance risk history and threshold alerts
//!
//! - `history` - per-equipment, time-ordered risk samples
//! - `threshold` - user thresholds and alert evaluation

pub mod history;
pub mod threshold;
pub mod types;


pub use history::RiskHistoryStore;
pub use threshold::{AlertThreshold, ThresholdAlertEngine};
pub use types::{Alert, EquipmentRiskHistory, EquipmentRiskSample};
