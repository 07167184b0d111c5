use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{SignalError, SignalResult};

/// A named set of per-metric limits managed by the standards service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityStandard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub threshold: HashMap<String, f64>,
}

impl QualityStandard {
    pub fn validate(&self) -> SignalResult<()> {
        if self.name.trim().is_empty() {
            return Err(SignalError::validation("standard name is empty"));
        }

        if let Some((metric, value)) = self.threshold.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SignalError::validation(format!(
                "threshold '{}' is not a finite number ({})",
                metric, value
            )));
        }

        Ok(())
    }
}

/// `{ "data": ... }` envelope used by the standards service
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}
