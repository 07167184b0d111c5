use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::is_valid_risk_score;
use crate::logic::error::{SignalError, SignalResult};

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// Binary outcome returned by the defect-classification service for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionVerdict {
    pub defect_detected: bool,
    /// Normalized to 0.0 - 1.0, absent when the service did not report one
    pub confidence: Option<f64>,
}

/// One image selected for inspection
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    data: Arc<[u8]>,
}

impl ImageUpload {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            data: Arc::from(data.into()),
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Historical risk point reported alongside a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    pub timestamp: DateTime<Utc>,
    pub risk_score: f64,
}

/// Normalized maintenance forecast for one piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    pub equipment_id: String,
    pub next_maintenance_date: NaiveDate,
    pub risk_score: f64,
    /// Human-readable, e.g. "4 hours"
    pub downtime: Option<String>,
    pub last_maintenance_date: Option<NaiveDate>,
    /// Earlier scores, oldest first; seeds a fresh risk history
    pub history: Vec<RiskPoint>,
    /// When the response arrived; timestamp of the sample it produces
    pub observed_at: DateTime<Utc>,
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct DetectResponseWire {
    #[serde(alias = "defectDetected", alias = "defect_found")]
    pub defect_detected: bool,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl DetectResponseWire {
    pub fn into_verdict(self) -> SignalResult<DetectionVerdict> {
        Ok(DetectionVerdict {
            defect_detected: self.defect_detected,
            confidence: normalize_confidence(self.confidence)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictResponseWire {
    #[serde(default, alias = "equipment_id")]
    pub equipment_id: Option<String>,
    #[serde(alias = "next_maintenance_date")]
    pub next_maintenance_date: String,
    #[serde(alias = "risk_score")]
    pub risk_score: f64,
    #[serde(default)]
    pub downtime: Option<String>,
    #[serde(default, alias = "last_maintenance_date")]
    pub last_maintenance_date: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryPointWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryPointWire {
    #[serde(alias = "timestamp")]
    pub date: String,
    #[serde(alias = "risk_score")]
    pub risk_score: f64,
}

impl PredictResponseWire {
    pub fn into_prediction(
        self,
        requested_id: &str,
        observed_at: DateTime<Utc>,
    ) -> SignalResult<MaintenancePrediction> {
        if let Some(echoed) = self.equipment_id.as_deref() {
            if echoed != requested_id {
                return Err(SignalError::service(
                    None,
                    format!("prediction for '{}' answered with '{}'", requested_id, echoed),
                ));
            }
        }

        let risk_score = checked_score(self.risk_score)?;
        let next_maintenance_date = parse_date(&self.next_maintenance_date)?;
        let last_maintenance_date = self.last_maintenance_date
            .as_deref()
            .map(parse_date)
            .transpose()?;

        let history = self.history
            .into_iter()
            .map(|point| {
                Ok(RiskPoint {
                    timestamp: parse_timestamp(&point.date)?,
                    risk_score: checked_score(point.risk_score)?,
                })
            })
            .collect::<SignalResult<Vec<_>>>()?;

        Ok(MaintenancePrediction {
            equipment_id: requested_id.to_string(),
            next_maintenance_date,
            risk_score,
            downtime: self.downtime.filter(|d| !d.trim().is_empty()),
            last_maintenance_date,
            history,
            observed_at,
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Confidence comes back either as a probability or as a percentage.
pub(crate) fn normalize_confidence(raw: Option<f64>) -> SignalResult<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(c) if c.is_finite() && (0.0..=1.0).contains(&c) => Ok(Some(c)),
        Some(c) if c.is_finite() && c > 1.0 && c <= 100.0 => Ok(Some(c / 100.0)),
        Some(c) => Err(SignalError::service(None, format!("confidence out of range: {}", c))),
    }
}

fn checked_score(score: f64) -> SignalResult<f64> {
    if is_valid_risk_score(score) {
        Ok(score)
    } else {
        Err(SignalError::service(None, format!("risk score out of range: {}", score)))
    }
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and
/// plain ISO dates (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> SignalResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SignalError::service(None, format!("unparseable date: '{}'", raw)))
}

fn parse_date(raw: &str) -> SignalResult<NaiveDate> {
    parse_timestamp(raw).map(|ts| ts.date_naive())
}
