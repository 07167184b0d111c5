use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::CRITICAL_RISK_SCORE;
use crate::logic::gateway::DetectionVerdict;
use crate::logic::risk::Alert;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Verdict for one uploaded image, as surfaced to the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictNotice {
    pub request_id: Uuid,
    pub file_name: Option<String>,
    pub verdict: DetectionVerdict,
}

/// Anything the notification surface accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    RiskAlert(Alert),
    DefectVerdict(VerdictNotice),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub signal: Signal,
}

impl Notification {
    pub fn new(signal: Signal) -> Self {
        let (severity, title, message) = Self::describe(&signal);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            severity,
            title,
            message,
            signal,
        }
    }

    fn describe(signal: &Signal) -> (Severity, String, String) {
        match signal {
            Signal::RiskAlert(alert) => {
                let severity = if alert.risk_score >= CRITICAL_RISK_SCORE {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                (
                    severity,
                    format!("Maintenance risk: {}", alert.equipment_id),
                    format!(
                        "Risk score {} exceeds the alert threshold of {}",
                        alert.risk_score, alert.threshold
                    ),
                )
            }
            Signal::DefectVerdict(notice) => {
                let subject = notice.file_name.as_deref().unwrap_or("Uploaded image");
                let confidence = notice.verdict.confidence
                    .map(|c| format!(" Confidence: {:.1}%", c * 100.0))
                    .unwrap_or_default();

                if notice.verdict.defect_detected {
                    (
                        Severity::Warning,
                        "Defect detected".to_string(),
                        format!("{}: defect detected.{}", subject, confidence),
                    )
                } else {
                    (
                        Severity::Info,
                        "No defect found".to_string(),
                        format!("{}: no defect found.{}", subject, confidence),
                    )
                }
            }
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        match &self.signal {
            Signal::RiskAlert(alert) => Some(alert),
            _ => None,
        }
    }
}
