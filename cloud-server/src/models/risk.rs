//! Equipment risk models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use qc_signal_core::logic::gateway::MaintenancePrediction;
use qc_signal_core::logic::risk::Alert;
use qc_signal_core::DashboardContext;

#[derive(Debug, Serialize)]
pub struct RiskPointView {
    pub timestamp: DateTime<Utc>,
    pub risk_score: f64,
}

/// Everything the risk panel shows for one equipment
#[derive(Debug, Serialize)]
pub struct RiskView {
    pub equipment_id: String,
    pub current_risk: Option<f64>,
    pub threshold: f64,
    pub alert: Option<Alert>,
    pub history: Vec<RiskPointView>,
}

impl RiskView {
    pub fn of(dashboard: &DashboardContext, equipment_id: &str) -> Self {
        let history = dashboard
            .history_of(equipment_id)
            .iter()
            .map(|s| RiskPointView {
                timestamp: s.timestamp(),
                risk_score: s.risk_score(),
            })
            .collect();

        Self {
            equipment_id: equipment_id.to_string(),
            current_risk: dashboard.current_risk(equipment_id),
            threshold: dashboard.threshold(equipment_id).value,
            alert: dashboard.evaluate(equipment_id),
            history,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: MaintenancePrediction,
    pub risk: RiskView,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateThreshold {
    #[validate(range(min = 0.0, max = 100.0, message = "threshold must be within 0-100"))]
    pub value: f64,
}
