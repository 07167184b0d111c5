//! Inference Gateway HTTP Client
//!
//! reqwest implementation of [`InferenceGateway`] and [`StandardsGateway`].
//! Single-shot: every method issues at most one request and never retries.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart;
use serde::Deserialize;

use crate::constants;
use crate::logic::error::{SignalError, SignalResult};
use crate::logic::quality::types::{DataEnvelope, QualityStandard};
use super::types::{DetectResponseWire, DetectionVerdict, ImageUpload, MaintenancePrediction, PredictResponseWire};
use super::validate::{validate_equipment_id, validate_image};
use super::{InferenceGateway, StandardsGateway};

const MAX_ERROR_DETAIL: usize = 200;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the defect / maintenance inference backend
    pub base_url: String,
    /// Base URL of the quality standards service, defaults to `base_url`
    pub standards_base_url: Option<String>,
    /// Per-request timeout; `None` leaves calls unbounded
    pub timeout_seconds: Option<u64>,
    /// Upper bound for uploaded images
    pub max_image_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            standards_base_url: None,
            timeout_seconds: None,
            max_image_bytes: constants::DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// HTTP gateway to the inference and standards services
pub struct HttpGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl HttpGateway {
    /// Create new gateway client
    pub fn new(config: GatewayConfig) -> SignalResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| SignalError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn inference_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn standards_url(&self, path: &str) -> String {
        let base = self.config.standards_base_url
            .as_deref()
            .unwrap_or(&self.config.base_url);
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> SignalResult<T> {
        response.json::<T>().await.map_err(SignalError::from)
    }
}

#[async_trait]
impl InferenceGateway for HttpGateway {
    async fn detect_defect(&self, image: &ImageUpload) -> SignalResult<DetectionVerdict> {
        let format = validate_image(image, self.config.max_image_bytes)?;

        let file_name = image.file_name
            .clone()
            .unwrap_or_else(|| format!("upload.{}", format.extension()));

        let part = multipart::Part::bytes(image.data().to_vec())
            .file_name(file_name.clone())
            .mime_str(format.mime())
            .map_err(|e| SignalError::validation(e.to_string()))?;
        let form = multipart::Form::new().part(constants::IMAGE_FIELD_NAME, part);

        log::debug!("Submitting {} ({} bytes) for defect detection", file_name, image.len());

        let response = self.http_client
            .post(self.inference_url(constants::DETECT_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let wire: DetectResponseWire = Self::read_json(response).await?;
            wire.into_verdict()
        } else {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Defect detection failed ({}): {}", status, error_detail(&body));
            Err(detect_status_error(status.as_u16(), &body))
        }
    }

    async fn predict_maintenance(&self, equipment_id: &str) -> SignalResult<MaintenancePrediction> {
        let equipment_id = validate_equipment_id(equipment_id)?;

        log::debug!("Requesting maintenance prediction for {}", equipment_id);

        let response = self.http_client
            .get(self.inference_url(constants::PREDICT_PATH))
            .query(&[("equipment_id", equipment_id)])
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let wire: PredictResponseWire = Self::read_json(response).await?;
            wire.into_prediction(equipment_id, Utc::now())
        } else {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "Maintenance prediction for {} failed ({}): {}",
                equipment_id,
                status,
                error_detail(&body)
            );
            Err(predict_status_error(status.as_u16(), &body, equipment_id))
        }
    }
}

#[derive(Debug, Deserialize)]
struct StandardEnvelope {
    data: QualityStandard,
}

#[async_trait]
impl StandardsGateway for HttpGateway {
    async fn list_standards(&self) -> SignalResult<Vec<QualityStandard>> {
        let response = self.http_client
            .get(self.standards_url(constants::QUALITY_LIST_PATH))
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let envelope: DataEnvelope<Vec<QualityStandard>> = ensure_success(response).await?;
        Ok(envelope.data)
    }

    async fn create_standard(&self, standard: &QualityStandard) -> SignalResult<QualityStandard> {
        standard.validate()?;

        let response = self.http_client
            .post(self.standards_url(constants::QUALITY_CREATE_PATH))
            .json(standard)
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let envelope: StandardEnvelope = ensure_success(response).await?;
        log::info!("Quality standard created: {}", envelope.data.name);
        Ok(envelope.data)
    }

    async fn update_standard(&self, standard_id: &str, standard: &QualityStandard) -> SignalResult<QualityStandard> {
        standard.validate()?;
        let standard_id = validate_path_segment(standard_id)?;

        let url = format!("{}/{}", self.standards_url(constants::QUALITY_UPDATE_PATH), standard_id);
        let response = self.http_client
            .put(url)
            .json(standard)
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let envelope: StandardEnvelope = ensure_success(response).await?;
        Ok(envelope.data)
    }

    async fn delete_standard(&self, standard_id: &str) -> SignalResult<()> {
        let standard_id = validate_path_segment(standard_id)?;

        let url = format!("{}/{}", self.standards_url(constants::QUALITY_DELETE_PATH), standard_id);
        let response = self.http_client
            .delete(url)
            .send()
            .await
            .map_err(|e| SignalError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!("Quality standard deleted: {}", standard_id);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SignalError::service(Some(status.as_u16()), error_detail(&body)))
        }
    }
}

// ============================================================================
// RESPONSE NORMALIZATION
// ============================================================================

async fn ensure_success<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> SignalResult<T> {
    let status = response.status();
    if status.is_success() {
        HttpGateway::read_json(response).await
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(SignalError::service(Some(status.as_u16()), error_detail(&body)))
    }
}

/// The detect route signals a rejected upload with a client-error status.
pub(crate) fn detect_status_error(status: u16, body: &str) -> SignalError {
    match status {
        400 | 413 | 415 | 422 => SignalError::validation(format!(
            "detect service rejected the image: {}",
            error_detail(body)
        )),
        _ => SignalError::service(Some(status), error_detail(body)),
    }
}

pub(crate) fn predict_status_error(status: u16, body: &str, equipment_id: &str) -> SignalError {
    match status {
        404 => SignalError::not_found(equipment_id),
        _ => SignalError::service(Some(status), error_detail(body)),
    }
}

/// Pull a readable message out of an error body (`detail` / `error` / raw text)
pub(crate) fn error_detail(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        });

    let detail = from_json.unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        return "no detail".to_string();
    }
    detail.chars().take(MAX_ERROR_DETAIL).collect()
}

fn validate_path_segment(raw: &str) -> SignalResult<&str> {
    let id = raw.trim();
    if id.is_empty() || id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(SignalError::validation(format!("invalid standard id '{}'", raw)));
    }
    Ok(id)
}
