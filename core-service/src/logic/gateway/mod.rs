//! Inference Gateway - calls into the external models
//!
//! This module handles:
//! - Defect detection uploads (multipart image → verdict)
//! - Maintenance prediction fetches (equipment id → forecast + risk)
//! - Quality standards pass-through
//!
//! Errors are normalized into `SignalError`; nothing here retries.

pub mod client;
pub mod types;
pub mod validate;

pub use client::{GatewayConfig, HttpGateway};
pub use types::{DetectionVerdict, ImageUpload, MaintenancePrediction, RiskPoint};
pub use validate::ImageFormat;

use async_trait::async_trait;

use crate::logic::error::SignalResult;
use crate::logic::quality::QualityStandard;

/// Defect and maintenance inference services
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Classify one image. Invalid images fail with `SignalError::Validation`
    /// before any request is issued.
    async fn detect_defect(&self, image: &ImageUpload) -> SignalResult<DetectionVerdict>;

    /// Forecast maintenance for one piece of equipment.
    async fn predict_maintenance(&self, equipment_id: &str) -> SignalResult<MaintenancePrediction>;
}

/// External quality standards service
#[async_trait]
pub trait StandardsGateway: Send + Sync {
    async fn list_standards(&self) -> SignalResult<Vec<QualityStandard>>;
    async fn create_standard(&self, standard: &QualityStandard) -> SignalResult<QualityStandard>;
    async fn update_standard(&self, standard_id: &str, standard: &QualityStandard) -> SignalResult<QualityStandard>;
    async fn delete_standard(&self, standard_id: &str) -> SignalResult<()>;
}
