//! QC Dashboard Server
//!
//! HTTP host for the quality-control signal pipeline. Every authenticated
//! operator gets their own `DashboardContext`; handlers drive it through the
//! inference gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    QC DASHBOARD SERVER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐  │
//! │  │  Router   │  │  Auth     │  │  Session Registry       │  │
//! │  │  (Axum)   │  │  (JWT)    │  │  (DashboardContext/op)  │  │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘  │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │          ┌──────────────────────────┐                       │
//! │          │ Inference / Standards    │  (HTTP, external)     │
//! │          └──────────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

use qc_signal_core::{HttpGateway, InferenceGateway, StandardsGateway};

pub use error::{AppError, AppResult};
use config::Config;
use session::SessionRegistry;

/// Multipart framing on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn InferenceGateway>,
    pub standards: Arc<dyn StandardsGateway>,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// State backed by the HTTP gateway described in `config`
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = Arc::new(HttpGateway::new(config.gateway_config())?);
        Ok(Self::with_gateways(config, http.clone(), http))
    }

    pub fn with_gateways(
        config: Config,
        gateway: Arc<dyn InferenceGateway>,
        standards: Arc<dyn StandardsGateway>,
    ) -> Self {
        let sessions = SessionRegistry::new(config.dashboard_settings());
        Self { config, gateway, standards, sessions }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check));

    // Operator routes (user JWT auth)
    let operator_routes = Router::new()
        // Defect detection
        .route(
            "/api/v1/defects/detect",
            post(handlers::defects::detect)
                .layer(DefaultBodyLimit::max(state.config.max_image_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/api/v1/defects/current", get(handlers::defects::current))

        // Maintenance & risk
        .route("/api/v1/equipment/:id/predict", post(handlers::maintenance::predict))
        .route("/api/v1/equipment/:id/risk", get(handlers::maintenance::risk))
        .route("/api/v1/equipment/:id/threshold", put(handlers::maintenance::set_threshold))
        .route("/api/v1/maintenance/current", get(handlers::maintenance::current))

        // Notifications
        .route(
            "/api/v1/notifications",
            get(handlers::notifications::list).delete(handlers::notifications::clear),
        )
        .route("/api/v1/notifications/:id", delete(handlers::notifications::dismiss))

        // Preferences & session
        .route(
            "/api/v1/preferences",
            get(handlers::preferences::get).put(handlers::preferences::update),
        )
        .route("/api/v1/session", delete(handlers::session::end))

        // Quality standards
        .route(
            "/api/v1/quality/standards",
            get(handlers::quality::list).post(handlers::quality::create),
        )
        .route(
            "/api/v1/quality/standards/:id",
            put(handlers::quality::update).delete(handlers::quality::delete),
        )

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
