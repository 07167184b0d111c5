//! Risk History Store
//!
//! Append-only, per-equipment time series of risk samples.
//!
//! Flow:
//! 1. First successful prediction creates the history (optionally seeded)
//! 2. Each later prediction appends one sample
//! 3. A sample older than the tail is rejected, never reordered

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::logic::error::{SignalError, SignalResult};
use super::types::{EquipmentRiskHistory, EquipmentRiskSample};

pub struct RiskHistoryStore {
    histories: HashMap<String, EquipmentRiskHistory>,
    /// Max samples kept per equipment; `None` keeps everything
    capacity: Option<usize>,
}

impl RiskHistoryStore {
    pub fn new() -> Self {
        Self {
            histories: HashMap::new(),
            capacity: None,
        }
    }

    /// Bounded store: the oldest samples are evicted past `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: HashMap::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append one sample to its equipment's history, creating it on first use
    pub fn append(&mut self, sample: EquipmentRiskSample) -> SignalResult<()> {
        self.check_order(sample.equipment_id(), self.last_timestamp(sample.equipment_id()), &sample)?;
        self.push_unchecked(sample);
        Ok(())
    }

    /// Append a batch atomically: nothing lands unless every sample is in order
    pub fn append_all(&mut self, samples: Vec<EquipmentRiskSample>) -> SignalResult<usize> {
        {
            let mut tails: HashMap<&str, DateTime<Utc>> = HashMap::new();
            for sample in &samples {
                let id = sample.equipment_id();
                let last = tails.get(id).copied().or_else(|| self.last_timestamp(id));
                self.check_order(id, last, sample)?;
                tails.insert(id, sample.timestamp());
            }
        }

        let count = samples.len();
        for sample in samples {
            self.push_unchecked(sample);
        }
        Ok(count)
    }

    /// Score of the most recently appended sample
    pub fn current_risk(&self, equipment_id: &str) -> Option<f64> {
        self.latest(equipment_id).map(|s| s.risk_score())
    }

    pub fn latest(&self, equipment_id: &str) -> Option<&EquipmentRiskSample> {
        self.histories.get(equipment_id).and_then(|h| h.latest())
    }

    /// Snapshot of the history as of this call, oldest first
    pub fn history_of(&self, equipment_id: &str) -> Vec<EquipmentRiskSample> {
        self.histories
            .get(equipment_id)
            .map(|h| h.samples.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, equipment_id: &str) -> bool {
        self.histories.contains_key(equipment_id)
    }

    pub fn equipment_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.histories.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn last_timestamp(&self, equipment_id: &str) -> Option<DateTime<Utc>> {
        self.latest(equipment_id).map(|s| s.timestamp())
    }

    fn check_order(
        &self,
        equipment_id: &str,
        last: Option<DateTime<Utc>>,
        sample: &EquipmentRiskSample,
    ) -> SignalResult<()> {
        match last {
            Some(last) if sample.timestamp() < last => {
                log::warn!(
                    "Rejected out-of-order risk sample for {}: {} < {}",
                    equipment_id,
                    sample.timestamp(),
                    last
                );
                Err(SignalError::OutOfOrder {
                    equipment_id: equipment_id.to_string(),
                    last,
                    attempted: sample.timestamp(),
                })
            }
            _ => Ok(()),
        }
    }

    fn push_unchecked(&mut self, sample: EquipmentRiskSample) {
        let history = self.histories
            .entry(sample.equipment_id().to_string())
            .or_insert_with(|| {
                log::debug!("Created risk history for {}", sample.equipment_id());
                EquipmentRiskHistory::new(sample.equipment_id())
            });

        history.samples.push(sample);

        if let Some(max) = self.capacity {
            if history.samples.len() > max {
                let excess = history.samples.len() - max;
                history.samples.drain(..excess);
            }
        }
    }
}

impl Default for RiskHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
