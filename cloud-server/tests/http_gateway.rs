//! HttpGateway against an in-process stand-in for the inference backend

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::extract::{Multipart, Query};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use qc_dashboard_server::config::Config;
use qc_dashboard_server::middleware::auth::Claims;
use qc_dashboard_server::{create_router, AppState};
use qc_signal_core::logic::gateway::ImageUpload;
use qc_signal_core::logic::quality::QualityStandard;
use qc_signal_core::{GatewayConfig, HttpGateway, InferenceGateway, SignalError, StandardsGateway};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 9, 9];

async fn detect(mut multipart: Multipart) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.contains("reject") {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "unreadable image" })));
        }
        return (StatusCode::OK, Json(json!({ "defect_detected": true, "confidence": 93.5 })));
    }
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": "file part missing" })))
}

async fn predict(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let equipment_id = params.get("equipment_id").cloned().unwrap_or_default();
    match equipment_id.as_str() {
        "GHOST" => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Equipment data not found" }))),
        "BROKEN" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "An unexpected error occurred." }))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "equipment_id": equipment_id,
                "next_maintenance_date": "2025-07-01",
                "last_maintenance_date": "2025-05-15",
                "risk_score": 72.5,
                "downtime": "3 hours",
                "history": [
                    { "date": "2025-06-01", "risk_score": 40 },
                    { "date": "2025-06-15", "risk_score": 61 }
                ]
            })),
        ),
    }
}

async fn list_standards() -> Json<Value> {
    Json(json!({
        "data": [{ "standard_id": "s1", "name": "Paint finish", "threshold": { "gloss": 80 } }]
    }))
}

async fn create_standard(Json(mut body): Json<Value>) -> Json<Value> {
    body["standard_id"] = json!("s2");
    Json(json!({ "message": "Quality standard created successfully", "data": body }))
}

async fn spawn_upstream() -> SocketAddr {
    let upstream = Router::new()
        .route("/defects/detect", post(detect))
        .route("/maintenance/predict", get(predict))
        .route("/quality/list", get(list_standards))
        .route("/quality/create", post(create_standard));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    addr
}

fn gateway_for(addr: SocketAddr) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        base_url: format!("http://{}", addr),
        timeout_seconds: Some(5),
        ..GatewayConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_detect_normalizes_percentage_confidence() {
    let gateway = gateway_for(spawn_upstream().await);

    let verdict = gateway
        .detect_defect(&ImageUpload::new(PNG.to_vec()).with_file_name("panel.png"))
        .await
        .unwrap();
    assert!(verdict.defect_detected);
    assert_eq!(verdict.confidence, Some(0.935));
}

#[tokio::test]
async fn test_rejected_image_is_validation_error() {
    let gateway = gateway_for(spawn_upstream().await);

    let err = gateway
        .detect_defect(&ImageUpload::new(PNG.to_vec()).with_file_name("reject.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::Validation { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_prediction_accepts_snake_case_body() {
    let gateway = gateway_for(spawn_upstream().await);

    let prediction = gateway.predict_maintenance("PRESS-7").await.unwrap();
    assert_eq!(prediction.equipment_id, "PRESS-7");
    assert_eq!(prediction.risk_score, 72.5);
    assert_eq!(prediction.next_maintenance_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    assert_eq!(prediction.downtime.as_deref(), Some("3 hours"));
    assert_eq!(prediction.history.len(), 2);
    assert!(prediction.observed_at <= Utc::now());
}

#[tokio::test]
async fn test_prediction_status_mapping() {
    let gateway = gateway_for(spawn_upstream().await);

    let err = gateway.predict_maintenance("GHOST").await.unwrap_err();
    assert_eq!(err, SignalError::not_found("GHOST"));

    let err = gateway.predict_maintenance("BROKEN").await.unwrap_err();
    assert_eq!(err, SignalError::service(Some(500), "An unexpected error occurred."));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway_for(addr).predict_maintenance("PRESS-7").await.unwrap_err();
    assert!(matches!(err, SignalError::Network { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_standards_envelope() {
    let gateway = gateway_for(spawn_upstream().await);

    let standards = gateway.list_standards().await.unwrap();
    assert_eq!(standards.len(), 1);
    assert_eq!(standards[0].threshold.get("gloss"), Some(&80.0));

    let created = gateway
        .create_standard(&QualityStandard {
            standard_id: None,
            name: "Weld seam".into(),
            description: Some("porosity limits".into()),
            threshold: HashMap::from([("porosity".to_string(), 0.2)]),
        })
        .await
        .unwrap();
    assert_eq!(created.standard_id.as_deref(), Some("s2"));
}

#[tokio::test]
async fn test_dashboard_server_end_to_end() {
    let addr = spawn_upstream().await;
    let config = Config {
        inference_base_url: format!("http://{}", addr),
        ..Config::default()
    };
    let app = create_router(AppState::new(config.clone()).unwrap());

    let claims = Claims {
        sub: "line-operator-1".into(),
        exp: (Utc::now().timestamp() + 600) as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.as_bytes())).unwrap();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/equipment/PRESS-7/predict")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    // two seeded points plus the current sample
    assert_eq!(body["risk"]["history"].as_array().unwrap().len(), 3);
    assert_eq!(body["risk"]["alert"]["risk_score"], 72.5);
}
