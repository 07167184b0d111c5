use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::logic::error::{SignalError, SignalResult};
use crate::logic::gateway::{
    DetectionVerdict, GatewayConfig, HttpGateway, ImageUpload, InferenceGateway, MaintenancePrediction, RiskPoint,
};
use crate::logic::lifecycle::{Completion, LifecycleError, RequestState};
use crate::logic::notify::{Severity, Signal};
use crate::logic::preferences::{Language, PreferencesUpdate};
use crate::logic::risk::EquipmentRiskSample;
use super::{DashboardContext, DashboardSettings};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn prediction(equipment_id: &str, score: f64, at: DateTime<Utc>) -> MaintenancePrediction {
    MaintenancePrediction {
        equipment_id: equipment_id.to_string(),
        next_maintenance_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        risk_score: score,
        downtime: Some("4 hours".to_string()),
        last_maintenance_date: None,
        history: Vec::new(),
        observed_at: at,
    }
}

fn image(name: &str) -> ImageUpload {
    ImageUpload::new(PNG_HEADER.to_vec()).with_file_name(name)
}

/// Scripted gateway: pops one canned answer per call
#[derive(Default)]
struct FakeGateway {
    verdicts: Mutex<VecDeque<SignalResult<DetectionVerdict>>>,
    predictions: Mutex<VecDeque<SignalResult<MaintenancePrediction>>>,
}

impl FakeGateway {
    fn with_verdict(self, verdict: SignalResult<DetectionVerdict>) -> Self {
        self.verdicts.lock().unwrap().push_back(verdict);
        self
    }

    fn with_prediction(self, prediction: SignalResult<MaintenancePrediction>) -> Self {
        self.predictions.lock().unwrap().push_back(prediction);
        self
    }
}

#[async_trait]
impl InferenceGateway for FakeGateway {
    async fn detect_defect(&self, _image: &ImageUpload) -> SignalResult<DetectionVerdict> {
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SignalError::service(None, "no scripted verdict")))
    }

    async fn predict_maintenance(&self, _equipment_id: &str) -> SignalResult<MaintenancePrediction> {
        self.predictions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SignalError::service(None, "no scripted prediction")))
    }
}

// ============================================================================
// Defect detection
// ============================================================================

#[tokio::test]
async fn test_detection_success_surfaces_verdict() {
    init_logging();
    let gateway = FakeGateway::default()
        .with_verdict(Ok(DetectionVerdict { defect_detected: true, confidence: Some(0.91) }));
    let mut ctx = DashboardContext::new();

    let state = ctx.detect(&gateway, image("weld_03.png")).await.unwrap();
    let verdict = state.result().expect("verdict");
    assert!(verdict.defect_detected);
    assert!(state.error().is_none());

    let notes = ctx.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Defect detected");
    assert!(notes[0].message.starts_with("weld_03.png"));
}

#[tokio::test]
async fn test_detection_failure_yields_no_verdict() {
    init_logging();
    let gateway = FakeGateway::default().with_verdict(Err(SignalError::service(Some(500), "model crashed")));
    let mut ctx = DashboardContext::new();

    let state = ctx.detect(&gateway, image("a.png")).await.unwrap();
    assert!(state.result().is_none());
    assert_eq!(state.error().map(|e| e.kind()), Some(crate::logic::error::ErrorKind::Service));
    assert!(ctx.notifications().is_empty());
}

#[tokio::test]
async fn test_empty_upload_fails_validation_before_network() {
    init_logging();
    // nothing listens on port 9; a network attempt would surface as Network
    let gateway = HttpGateway::new(GatewayConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..GatewayConfig::default()
    })
    .unwrap();
    let mut ctx = DashboardContext::new();

    let state = ctx.detect(&gateway, ImageUpload::new(Vec::new())).await.unwrap();
    assert!(matches!(state, RequestState::Failed(SignalError::Validation { .. })));
    assert!(ctx.notifications().is_empty());
}

#[test]
fn test_second_upload_rejected_while_pending() {
    let mut ctx = DashboardContext::new();
    let first = ctx.begin_detection(image("a.png")).unwrap();

    let err = ctx.begin_detection(image("b.png")).unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyPending { request_id: first.request_id });

    let completion = ctx.finish_detection(&first, Ok(DetectionVerdict { defect_detected: false, confidence: None }));
    assert_eq!(completion, Completion::Applied);
    assert!(ctx.begin_detection(image("b.png")).is_ok());
}

// ============================================================================
// Maintenance & alerts
// ============================================================================

#[tokio::test]
async fn test_first_fetch_seeds_history_then_alerts() {
    init_logging();
    let mut first = prediction("PRESS-7", 82.0, t(60));
    first.history = vec![
        RiskPoint { timestamp: t(0), risk_score: 40.0 },
        RiskPoint { timestamp: t(30), risk_score: 55.0 },
    ];
    let gateway = FakeGateway::default()
        .with_prediction(Ok(first))
        .with_prediction(Ok({
            let mut next = prediction("PRESS-7", 84.0, t(90));
            next.history = vec![RiskPoint { timestamp: t(0), risk_score: 1.0 }];
            next
        }));
    let mut ctx = DashboardContext::new();

    ctx.predict(&gateway, "PRESS-7").await.unwrap();
    let scores: Vec<f64> = ctx.history_of("PRESS-7").iter().map(|s| s.risk_score()).collect();
    assert_eq!(scores, vec![40.0, 55.0, 82.0]);
    assert_eq!(ctx.current_risk("PRESS-7"), Some(82.0));

    // later fetches only add the current sample
    ctx.predict(&gateway, "PRESS-7").await.unwrap();
    assert_eq!(ctx.history_of("PRESS-7").len(), 4);

    let alerts: Vec<_> = ctx.notifications().iter().filter_map(|n| n.alert()).collect();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[1].risk_score, 84.0);
    assert_eq!(alerts[1].triggered_at, t(90));
}

#[test]
fn test_raising_threshold_clears_alert_without_touching_history() {
    let mut ctx = DashboardContext::new();
    let ticket = ctx.begin_maintenance("E1").unwrap();
    ctx.finish_maintenance(&ticket, Ok(prediction("E1", 85.0, t(0))));

    let alert = ctx.evaluate("E1").expect("alert at default threshold");
    assert_eq!(alert.threshold, 70.0);

    assert!(ctx.set_threshold("E1", 90.0).unwrap().is_none());
    assert!(ctx.evaluate("E1").is_none());
    assert_eq!(ctx.history_of("E1").len(), 1);
}

#[test]
fn test_threshold_boundary_is_strict() {
    let mut ctx = DashboardContext::new();
    ctx.ingest_sample(EquipmentRiskSample::new("E1", t(0), 70.0).unwrap()).unwrap();
    assert!(ctx.evaluate("E1").is_none());

    let alert = ctx.ingest_sample(EquipmentRiskSample::new("E1", t(1), 70.5).unwrap()).unwrap();
    assert!(alert.is_some());
}

#[test]
fn test_superseded_prediction_is_discarded() {
    let mut ctx = DashboardContext::new();
    let first = ctx.begin_maintenance("E1").unwrap();
    let second = ctx.begin_maintenance("E2").unwrap();

    assert_eq!(ctx.finish_maintenance(&second, Ok(prediction("E2", 20.0, t(5)))), Completion::Applied);
    assert_eq!(ctx.finish_maintenance(&first, Ok(prediction("E1", 99.0, t(6)))), Completion::Discarded);

    assert_eq!(ctx.current_risk("E1"), None);
    assert_eq!(ctx.current_risk("E2"), Some(20.0));
    assert!(ctx.notifications().is_empty());
}

#[test]
fn test_out_of_order_prediction_fails_request() {
    let mut ctx = DashboardContext::new();
    ctx.ingest_sample(EquipmentRiskSample::new("E1", t(30), 10.0).unwrap()).unwrap();

    let ticket = ctx.begin_maintenance("E1").unwrap();
    let completion = ctx.finish_maintenance(&ticket, Ok(prediction("E1", 95.0, t(10))));

    assert_eq!(completion, Completion::Applied);
    assert!(matches!(ctx.maintenance().state(), RequestState::Failed(SignalError::OutOfOrder { .. })));
    assert_eq!(ctx.current_risk("E1"), Some(10.0));
    assert!(ctx.notifications().is_empty());
}

#[test]
fn test_repeated_alerts_are_shown_once() {
    let mut ctx = DashboardContext::new();
    ctx.ingest_sample(EquipmentRiskSample::new("E1", t(0), 95.0).unwrap()).unwrap();
    // re-applying the same threshold re-evaluates to an equal alert
    ctx.set_threshold("E1", 70.0).unwrap();

    assert_eq!(ctx.notifications().len(), 1);
    assert_eq!(ctx.notifications()[0].severity, Severity::Critical);
}

// ============================================================================
// Teardown, notifications, preferences
// ============================================================================

#[test]
fn test_teardown_discards_late_responses() {
    let mut ctx = DashboardContext::new();
    let detection = ctx.begin_detection(image("a.png")).unwrap();
    let maintenance = ctx.begin_maintenance("E1").unwrap();

    ctx.teardown();

    let verdict = DetectionVerdict { defect_detected: true, confidence: None };
    assert_eq!(ctx.finish_detection(&detection, Ok(verdict)), Completion::Discarded);
    assert_eq!(ctx.finish_maintenance(&maintenance, Ok(prediction("E1", 99.0, t(0)))), Completion::Discarded);

    assert!(ctx.notifications().is_empty());
    assert_eq!(ctx.current_risk("E1"), None);
    assert!(!ctx.detection().is_pending());
}

#[test]
fn test_dismiss_and_clear_notifications() {
    let mut ctx = DashboardContext::new();
    ctx.ingest_sample(EquipmentRiskSample::new("E1", t(0), 80.0).unwrap()).unwrap();
    ctx.ingest_sample(EquipmentRiskSample::new("E2", t(0), 88.0).unwrap()).unwrap();

    let first = ctx.notifications()[0].id;
    assert!(ctx.dismiss_notification(first));
    assert!(!ctx.dismiss_notification(first));
    assert_eq!(ctx.clear_notifications(), 1);
    assert!(ctx.notifications().is_empty());
}

#[test]
fn test_settings_apply_to_new_context() {
    let ctx = DashboardContext::with_settings(DashboardSettings {
        default_threshold: 50.0,
        history_capacity: Some(2),
        ..DashboardSettings::default()
    })
    .unwrap();
    assert_eq!(ctx.threshold("E9").value, 50.0);

    let bad = DashboardContext::with_settings(DashboardSettings {
        default_threshold: 120.0,
        ..DashboardSettings::default()
    });
    assert!(bad.is_err());
}

#[test]
fn test_preferences_are_per_context() {
    let mut a = DashboardContext::new();
    let b = DashboardContext::new();

    let prefs = a.update_preferences(PreferencesUpdate { language: Some(Language::Hindi), dark_mode: None });
    assert_eq!(prefs.language, Language::Hindi);
    assert_eq!(b.preferences().language, Language::English);
}

#[test]
fn test_verdict_notice_carries_request_id() {
    let mut ctx = DashboardContext::new();
    let ticket = ctx.begin_detection(image("a.png")).unwrap();
    ctx.finish_detection(&ticket, Ok(DetectionVerdict { defect_detected: false, confidence: Some(0.5) }));

    match &ctx.notifications()[0].signal {
        Signal::DefectVerdict(notice) => assert_eq!(notice.request_id, ticket.request_id),
        other => panic!("Expected verdict, got {:?}", other),
    }
}
