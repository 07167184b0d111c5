//! Dashboard Context - one operator session's signal pipeline
//!
//! Owns the two request controllers, the risk store, the alert engine, the
//! notification surface and the display preferences, and wires the data flow:
//!
//! ```text
//! begin_* ──► gateway call (caller) ──► finish_*
//!                                         ├─ detection:   verdict ─────────────► notifications
//!                                         └─ maintenance: append ─► evaluate ──► notifications
//! ```
//!
//! `begin_*` / `finish_*` let a multi-threaded host release its lock while the
//! gateway call is in flight. `detect` / `predict` are the single-owner shortcuts.

use uuid::Uuid;

use crate::logic::error::SignalResult;
use crate::logic::gateway::{DetectionVerdict, ImageUpload, InferenceGateway, MaintenancePrediction};
use crate::logic::lifecycle::{Completion, LifecycleError, Request, RequestController, RequestState, Ticket};
use crate::logic::notify::{Notification, NotificationSurface, Signal, VerdictNotice};
use crate::logic::preferences::{Preferences, PreferencesUpdate};
use crate::logic::risk::{Alert, AlertThreshold, EquipmentRiskSample, RiskHistoryStore, ThresholdAlertEngine};
use crate::constants::DEFAULT_ALERT_THRESHOLD;

#[cfg(test)]
mod tests;

pub type DetectionRequest = Request<ImageUpload, DetectionVerdict>;
pub type MaintenanceRequest = Request<String, MaintenancePrediction>;

/// Per-session tunables
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub default_threshold: f64,
    pub history_capacity: Option<usize>,
    pub preferences: Preferences,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_ALERT_THRESHOLD,
            history_capacity: None,
            preferences: Preferences::default(),
        }
    }
}

pub struct DashboardContext {
    detection: RequestController<ImageUpload, DetectionVerdict>,
    maintenance: RequestController<String, MaintenancePrediction>,
    risk: RiskHistoryStore,
    alerts: ThresholdAlertEngine,
    notifications: NotificationSurface,
    preferences: Preferences,
}

impl DashboardContext {
    pub fn new() -> Self {
        Self {
            detection: RequestController::single_flight("defect-detection"),
            maintenance: RequestController::replacing("maintenance"),
            risk: RiskHistoryStore::new(),
            alerts: ThresholdAlertEngine::new(),
            notifications: NotificationSurface::new(),
            preferences: Preferences::default(),
        }
    }

    pub fn with_settings(settings: DashboardSettings) -> SignalResult<Self> {
        let risk = match settings.history_capacity {
            Some(capacity) => RiskHistoryStore::with_capacity(capacity),
            None => RiskHistoryStore::new(),
        };

        Ok(Self {
            risk,
            alerts: ThresholdAlertEngine::with_default(settings.default_threshold)?,
            preferences: settings.preferences,
            ..Self::new()
        })
    }

    // ------------------------------------------------------------------------
    // Defect detection
    // ------------------------------------------------------------------------

    /// Register a new upload; rejected while the previous one is pending
    pub fn begin_detection(&mut self, image: ImageUpload) -> Result<Ticket<ImageUpload>, LifecycleError> {
        self.detection.submit(image)
    }

    /// Apply the gateway's answer; a verdict for the current request is surfaced
    pub fn finish_detection(
        &mut self,
        ticket: &Ticket<ImageUpload>,
        result: SignalResult<DetectionVerdict>,
    ) -> Completion {
        let verdict = result.as_ref().ok().cloned();
        let completion = self.detection.complete(ticket, result);

        if let (Completion::Applied, Some(verdict)) = (completion, verdict) {
            self.notifications.record(Signal::DefectVerdict(VerdictNotice {
                request_id: ticket.request_id,
                file_name: ticket.input.file_name.clone(),
                verdict,
            }));
        }
        completion
    }

    /// Submit, await and apply in one step
    pub async fn detect<G>(
        &mut self,
        gateway: &G,
        image: ImageUpload,
    ) -> Result<&RequestState<DetectionVerdict>, LifecycleError>
    where
        G: InferenceGateway + ?Sized,
    {
        let ticket = self.begin_detection(image)?;
        let result = gateway.detect_defect(&ticket.input).await;
        self.finish_detection(&ticket, result);
        Ok(self.detection.state())
    }

    // ------------------------------------------------------------------------
    // Maintenance prediction
    // ------------------------------------------------------------------------

    /// Start a fetch; a fetch still in flight is superseded
    pub fn begin_maintenance(&mut self, equipment_id: &str) -> Result<Ticket<String>, LifecycleError> {
        self.maintenance.submit(equipment_id.trim().to_string())
    }

    /// Apply a prediction: append to the risk history, re-evaluate, notify.
    /// A history violation turns the request into `Failed(OutOfOrder)`.
    pub fn finish_maintenance(
        &mut self,
        ticket: &Ticket<String>,
        result: SignalResult<MaintenancePrediction>,
    ) -> Completion {
        if !self.maintenance.is_current(ticket) {
            return self.maintenance.complete(ticket, result);
        }

        let result = result.and_then(|prediction| {
            self.apply_prediction(&ticket.input, &prediction)?;
            Ok(prediction)
        });
        self.maintenance.complete(ticket, result)
    }

    pub async fn predict<G>(
        &mut self,
        gateway: &G,
        equipment_id: &str,
    ) -> Result<&RequestState<MaintenancePrediction>, LifecycleError>
    where
        G: InferenceGateway + ?Sized,
    {
        let ticket = self.begin_maintenance(equipment_id)?;
        let result = gateway.predict_maintenance(&ticket.input).await;
        self.finish_maintenance(&ticket, result);
        Ok(self.maintenance.state())
    }

    fn apply_prediction(
        &mut self,
        equipment_id: &str,
        prediction: &MaintenancePrediction,
    ) -> SignalResult<Option<Alert>> {
        let mut batch = Vec::with_capacity(prediction.history.len() + 1);

        // the reported history only seeds a fresh timeline
        if !self.risk.contains(equipment_id) {
            for point in &prediction.history {
                batch.push(EquipmentRiskSample::new(equipment_id, point.timestamp, point.risk_score)?);
            }
        }
        batch.push(EquipmentRiskSample::new(
            equipment_id,
            prediction.observed_at,
            prediction.risk_score,
        )?);

        let appended = self.risk.append_all(batch)?;
        log::debug!(
            "Recorded {} risk sample(s) for {}, current risk {}",
            appended,
            equipment_id,
            prediction.risk_score
        );

        Ok(self.reevaluate(equipment_id))
    }

    // ------------------------------------------------------------------------
    // Risk & thresholds
    // ------------------------------------------------------------------------

    /// Append a sample from another source and re-evaluate
    pub fn ingest_sample(&mut self, sample: EquipmentRiskSample) -> SignalResult<Option<Alert>> {
        let equipment_id = sample.equipment_id().to_string();
        self.risk.append(sample)?;
        Ok(self.reevaluate(&equipment_id))
    }

    /// Change the threshold and re-evaluate
    pub fn set_threshold(&mut self, equipment_id: &str, value: f64) -> SignalResult<Option<Alert>> {
        self.alerts.set_threshold(equipment_id, value)?;
        Ok(self.reevaluate(equipment_id))
    }

    pub fn evaluate(&self, equipment_id: &str) -> Option<Alert> {
        self.alerts.evaluate(equipment_id, &self.risk)
    }

    fn reevaluate(&mut self, equipment_id: &str) -> Option<Alert> {
        let alert = self.evaluate(equipment_id);
        if let Some(alert) = &alert {
            self.notifications.record(Signal::RiskAlert(alert.clone()));
        }
        alert
    }

    pub fn current_risk(&self, equipment_id: &str) -> Option<f64> {
        self.risk.current_risk(equipment_id)
    }

    pub fn history_of(&self, equipment_id: &str) -> Vec<EquipmentRiskSample> {
        self.risk.history_of(equipment_id)
    }

    pub fn threshold(&self, equipment_id: &str) -> AlertThreshold {
        self.alerts.threshold(equipment_id)
    }

    pub fn equipment_ids(&self) -> Vec<String> {
        self.risk.equipment_ids()
    }

    // ------------------------------------------------------------------------
    // Notifications & preferences
    // ------------------------------------------------------------------------

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.list()
    }

    pub fn dismiss_notification(&mut self, id: Uuid) -> bool {
        self.notifications.dismiss(id)
    }

    pub fn clear_notifications(&mut self) -> usize {
        self.notifications.clear_all()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> &Preferences {
        self.preferences.apply(update);
        &self.preferences
    }

    // ------------------------------------------------------------------------
    // Surfaces
    // ------------------------------------------------------------------------

    pub fn detection(&self) -> &RequestController<ImageUpload, DetectionVerdict> {
        &self.detection
    }

    pub fn maintenance(&self) -> &RequestController<String, MaintenancePrediction> {
        &self.maintenance
    }

    /// Owner is going away: nothing still in flight may land afterwards
    pub fn teardown(&mut self) {
        let detection = self.detection.cancel();
        let maintenance = self.maintenance.cancel();
        if detection || maintenance {
            log::info!(
                "Dashboard torn down with work in flight (detection: {}, maintenance: {})",
                detection,
                maintenance
            );
        }
    }
}

impl Default for DashboardContext {
    fn default() -> Self {
        Self::new()
    }
}
