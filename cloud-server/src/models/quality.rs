//! Quality standard models

use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use qc_signal_core::logic::quality::QualityStandard;

#[derive(Debug, Deserialize, Validate)]
pub struct StandardRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub threshold: HashMap<String, f64>,
}

impl StandardRequest {
    pub fn into_standard(self, standard_id: Option<String>) -> QualityStandard {
        QualityStandard {
            standard_id,
            name: self.name.trim().to_string(),
            description: self.description,
            threshold: self.threshold,
        }
    }
}
