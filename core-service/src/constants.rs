//! Central Configuration Constants
//!
//! Single source of truth for the signal pipeline defaults.
//! The dashboard server may override most of these from its own config.

/// Default alert threshold applied to equipment without a user setting
pub const DEFAULT_ALERT_THRESHOLD: f64 = 70.0;

/// Lowest accepted risk score / threshold
pub const MIN_RISK_SCORE: f64 = 0.0;

/// Highest accepted risk score / threshold
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Risk score at or above which an alert notification is critical
pub const CRITICAL_RISK_SCORE: f64 = 90.0;

/// Largest image accepted for defect detection (10 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field name expected by the detect endpoint
pub const IMAGE_FIELD_NAME: &str = "file";

/// Inference service routes (relative to the gateway base URL)
pub const DETECT_PATH: &str = "/defects/detect";
pub const PREDICT_PATH: &str = "/maintenance/predict";

/// Quality standards service routes
pub const QUALITY_LIST_PATH: &str = "/quality/list";
pub const QUALITY_CREATE_PATH: &str = "/quality/create";
pub const QUALITY_UPDATE_PATH: &str = "/quality/update";
pub const QUALITY_DELETE_PATH: &str = "/quality/delete";

/// Library version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check that a score or threshold lies in the accepted 0-100 range
pub fn is_valid_risk_score(value: f64) -> bool {
    value.is_finite() && (MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&value)
}
