use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::is_valid_risk_score;
use crate::logic::error::{SignalError, SignalResult};

/// One risk observation; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskSample")]
pub struct EquipmentRiskSample {
    equipment_id: String,
    timestamp: DateTime<Utc>,
    risk_score: f64,
}

impl EquipmentRiskSample {
    pub fn new(
        equipment_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        risk_score: f64,
    ) -> SignalResult<Self> {
        if !is_valid_risk_score(risk_score) {
            return Err(SignalError::validation(format!(
                "risk score {} outside 0-100",
                risk_score
            )));
        }

        Ok(Self {
            equipment_id: equipment_id.into(),
            timestamp,
            risk_score,
        })
    }

    pub fn equipment_id(&self) -> &str {
        &self.equipment_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }
}

/// Unchecked shape on the wire; deserialization goes through `new`
#[derive(Deserialize)]
struct RawRiskSample {
    equipment_id: String,
    timestamp: DateTime<Utc>,
    risk_score: f64,
}

impl TryFrom<RawRiskSample> for EquipmentRiskSample {
    type Error = SignalError;

    fn try_from(raw: RawRiskSample) -> SignalResult<Self> {
        Self::new(raw.equipment_id, raw.timestamp, raw.risk_score)
    }
}

/// Ordered samples for one piece of equipment, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentRiskHistory {
    pub(crate) equipment_id: String,
    pub(crate) samples: Vec<EquipmentRiskSample>,
}

impl EquipmentRiskHistory {
    pub(crate) fn new(equipment_id: &str) -> Self {
        Self {
            equipment_id: equipment_id.to_string(),
            samples: Vec::new(),
        }
    }

    pub fn equipment_id(&self) -> &str {
        &self.equipment_id
    }

    /// Most recent sample ("current risk")
    pub fn latest(&self) -> Option<&EquipmentRiskSample> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[EquipmentRiskSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Raised when the current risk score strictly exceeds the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub equipment_id: String,
    /// Timestamp of the sample that produced the current risk
    pub triggered_at: DateTime<Utc>,
    pub risk_score: f64,
    pub threshold: f64,
}

impl Alert {
    /// Identity used for de-duplication on the notification surface
    pub fn dedup_key(&self) -> (&str, u64, u64) {
        (
            self.equipment_id.as_str(),
            self.risk_score.to_bits(),
            self.threshold.to_bits(),
        )
    }
}
