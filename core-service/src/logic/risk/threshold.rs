//! Threshold Alert Engine
//!
//! One user-set threshold per equipment; an alert exists while the current
//! risk score is strictly above it. No hysteresis, no memory of past alerts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{is_valid_risk_score, DEFAULT_ALERT_THRESHOLD};
use crate::logic::error::{SignalError, SignalResult};
use super::history::RiskHistoryStore;
use super::types::Alert;

/// Threshold for one equipment context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub equipment_id: String,
    pub value: f64,
}

pub struct ThresholdAlertEngine {
    thresholds: HashMap<String, f64>,
    default_threshold: f64,
}

impl ThresholdAlertEngine {
    pub fn new() -> Self {
        Self {
            thresholds: HashMap::new(),
            default_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    /// Engine whose unset equipment starts at `default_threshold`
    pub fn with_default(default_threshold: f64) -> SignalResult<Self> {
        check_threshold(default_threshold)?;
        Ok(Self {
            thresholds: HashMap::new(),
            default_threshold,
        })
    }

    /// Set a threshold; out-of-range values leave the previous one untouched
    pub fn set_threshold(&mut self, equipment_id: &str, value: f64) -> SignalResult<()> {
        check_threshold(value)?;

        let previous = self.thresholds.insert(equipment_id.to_string(), value);
        log::debug!(
            "Threshold for {} set to {} (was {})",
            equipment_id,
            value,
            previous.unwrap_or(self.default_threshold)
        );
        Ok(())
    }

    pub fn threshold(&self, equipment_id: &str) -> AlertThreshold {
        AlertThreshold {
            equipment_id: equipment_id.to_string(),
            value: self.threshold_value(equipment_id),
        }
    }

    pub fn threshold_value(&self, equipment_id: &str) -> f64 {
        self.thresholds
            .get(equipment_id)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    /// Alert when the latest risk score strictly exceeds the threshold
    pub fn evaluate(&self, equipment_id: &str, store: &RiskHistoryStore) -> Option<Alert> {
        let latest = store.latest(equipment_id)?;
        let threshold = self.threshold_value(equipment_id);

        if latest.risk_score() > threshold {
            Some(Alert {
                equipment_id: equipment_id.to_string(),
                triggered_at: latest.timestamp(),
                risk_score: latest.risk_score(),
                threshold,
            })
        } else {
            None
        }
    }
}

impl Default for ThresholdAlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_threshold(value: f64) -> SignalResult<()> {
    if is_valid_risk_score(value) {
        Ok(())
    } else {
        Err(SignalError::validation(format!("threshold {} outside 0-100", value)))
    }
}
