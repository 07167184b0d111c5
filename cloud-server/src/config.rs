//! Configuration module

use std::env;

use qc_signal_core::constants::{DEFAULT_ALERT_THRESHOLD, DEFAULT_MAX_IMAGE_BYTES};
use qc_signal_core::logic::dashboard::DashboardSettings;
use qc_signal_core::GatewayConfig;

const DEV_JWT_SECRET: &str = "qc-dashboard-dev-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Defect detection + maintenance prediction backend
    pub inference_base_url: String,

    /// Quality standards service, defaults to the inference backend
    pub quality_base_url: Option<String>,

    /// Per-request gateway timeout, 0 disables it
    pub gateway_timeout_secs: u64,

    /// Largest accepted image upload
    pub max_image_bytes: usize,

    /// Initial alert threshold for every equipment
    pub default_alert_threshold: f64,

    /// Per-equipment risk history capacity (unbounded when unset)
    pub risk_history_limit: Option<usize>,

    /// JWT secret key
    pub jwt_secret: String,

    /// Environment (development, production)
    pub environment: String,

    /// `text` or `json`
    pub log_format: String,

    /// Variables that were set but could not be parsed (defaults used instead)
    pub ignored_vars: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            inference_base_url: "http://localhost:8000".to_string(),
            quality_base_url: None,
            gateway_timeout_secs: 30,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            default_alert_threshold: DEFAULT_ALERT_THRESHOLD,
            risk_history_limit: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            environment: "development".to_string(),
            log_format: "text".to_string(),
            ignored_vars: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut ignored = Vec::new();

        let port = env_var("PORT", &mut ignored).unwrap_or(defaults.port);
        let gateway_timeout_secs = env_var("GATEWAY_TIMEOUT_SECS", &mut ignored)
            .unwrap_or(defaults.gateway_timeout_secs);
        let max_image_bytes = env_var("MAX_IMAGE_BYTES", &mut ignored)
            .unwrap_or(defaults.max_image_bytes);
        let default_alert_threshold = env_var("DEFAULT_ALERT_THRESHOLD", &mut ignored)
            .unwrap_or(defaults.default_alert_threshold);
        let risk_history_limit = env_var("RISK_HISTORY_LIMIT", &mut ignored);

        Self {
            port,

            inference_base_url: env::var("INFERENCE_BASE_URL")
                .unwrap_or(defaults.inference_base_url),

            quality_base_url: env::var("QUALITY_BASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            gateway_timeout_secs,
            max_image_bytes,
            default_alert_threshold,
            risk_history_limit,

            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),

            ignored_vars: ignored,
        }
    }

    /// Structured JSON log output requested
    pub fn json_logs(&self) -> bool {
        self.log_format.trim().eq_ignore_ascii_case("json")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Refuse settings that must not reach production
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        if !(0.0..=100.0).contains(&self.default_alert_threshold) {
            anyhow::bail!(
                "DEFAULT_ALERT_THRESHOLD must be within 0-100, got {}",
                self.default_alert_threshold
            );
        }
        if self.risk_history_limit == Some(0) {
            anyhow::bail!("RISK_HISTORY_LIMIT must be at least 1");
        }
        Ok(())
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.inference_base_url.clone(),
            standards_base_url: self.quality_base_url.clone(),
            timeout_seconds: Some(self.gateway_timeout_secs).filter(|secs| *secs > 0),
            max_image_bytes: self.max_image_bytes,
        }
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            default_threshold: self.default_alert_threshold,
            history_capacity: self.risk_history_limit,
            ..DashboardSettings::default()
        }
    }
}

fn env_var<T: std::str::FromStr>(name: &str, ignored: &mut Vec<String>) -> Option<T> {
    parse_var(name, env::var(name).ok(), ignored)
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, ignored: &mut Vec<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            ignored.push(format!("{}={:?}", name, raw));
            None
        }
    }
}
