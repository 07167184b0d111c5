//! Notification Surface
//!
//! Insertion-ordered list of operator notifications. Repeated alerts with the
//! same (equipment, score, threshold) collapse onto the one already shown.

use uuid::Uuid;

use super::types::{Notification, Signal};

#[derive(Default)]
pub struct NotificationSurface {
    items: Vec<Notification>,
}

impl NotificationSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification; `None` when an equal alert is already displayed
    pub fn record(&mut self, signal: Signal) -> Option<Uuid> {
        if let Signal::RiskAlert(alert) = &signal {
            let key = alert.dedup_key();
            if self.items.iter().filter_map(|n| n.alert()).any(|a| a.dedup_key() == key) {
                log::debug!("Alert for {} already on surface, skipped", alert.equipment_id);
                return None;
            }
        }

        let notification = Notification::new(signal);
        let id = notification.id;
        log::info!("Notification [{:?}] {}", notification.severity, notification.title);
        self.items.push(notification);
        Some(id)
    }

    /// Remove one notification; unknown ids are ignored
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() < before
    }

    pub fn clear_all(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::logic::gateway::DetectionVerdict;
    use crate::logic::notify::types::{Severity, VerdictNotice};
    use crate::logic::risk::Alert;

    fn alert(score: f64, threshold: f64) -> Signal {
        Signal::RiskAlert(Alert {
            equipment_id: "E1".into(),
            triggered_at: Utc::now(),
            risk_score: score,
            threshold,
        })
    }

    fn verdict(defect: bool) -> Signal {
        Signal::DefectVerdict(VerdictNotice {
            request_id: Uuid::new_v4(),
            file_name: Some("panel.jpg".into()),
            verdict: DetectionVerdict { defect_detected: defect, confidence: Some(0.957) },
        })
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut surface = NotificationSurface::new();
        surface.record(verdict(true));
        surface.record(alert(80.0, 70.0));
        surface.record(verdict(false));

        let titles: Vec<&str> = surface.list().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Defect detected", "Maintenance risk: E1", "No defect found"]);
    }

    #[test]
    fn test_equal_alerts_are_deduplicated() {
        let mut surface = NotificationSurface::new();
        assert!(surface.record(alert(80.0, 70.0)).is_some());
        assert!(surface.record(alert(80.0, 70.0)).is_none());
        assert!(surface.record(alert(80.0, 75.0)).is_some());
        assert_eq!(surface.len(), 2);
    }

    #[test]
    fn test_dismissed_alert_can_surface_again() {
        let mut surface = NotificationSurface::new();
        let id = surface.record(alert(80.0, 70.0)).unwrap();
        assert!(surface.dismiss(id));
        assert!(surface.record(alert(80.0, 70.0)).is_some());
    }

    #[test]
    fn test_verdicts_are_never_deduplicated() {
        let mut surface = NotificationSurface::new();
        surface.record(verdict(true));
        surface.record(verdict(true));
        assert_eq!(surface.len(), 2);
    }

    #[test]
    fn test_dismiss_and_clear_are_total() {
        let mut surface = NotificationSurface::new();
        assert!(!surface.dismiss(Uuid::new_v4()));
        assert_eq!(surface.clear_all(), 0);

        surface.record(verdict(false));
        surface.record(verdict(true));
        assert_eq!(surface.clear_all(), 2);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_severity_mapping() {
        let mut surface = NotificationSurface::new();
        let warn = surface.record(alert(80.0, 70.0)).unwrap();
        let crit = surface.record(alert(95.0, 70.0)).unwrap();
        let info = surface.record(verdict(false)).unwrap();

        assert_eq!(surface.get(warn).unwrap().severity, Severity::Warning);
        assert_eq!(surface.get(crit).unwrap().severity, Severity::Critical);
        assert_eq!(surface.get(info).unwrap().severity, Severity::Info);
        assert!(surface.get(info).unwrap().message.contains("95.7%"));
    }
}
