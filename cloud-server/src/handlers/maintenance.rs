//! Maintenance prediction and equipment risk handlers

use axum::{extract::{Path, State}, Json};
use validator::Validate;

use qc_signal_core::logic::gateway::MaintenancePrediction;
use qc_signal_core::logic::lifecycle::{Completion, RequestState};

use crate::{AppState, AppResult, AppError};
use crate::middleware::auth::SessionContext;
use crate::models::{PredictionResponse, RequestView, RiskView, UpdateThreshold};

/// Fetch a prediction; a fetch still in flight for this session is superseded
pub async fn predict(
    State(state): State<AppState>,
    session: SessionContext,
    Path(equipment_id): Path<String>,
) -> AppResult<Json<PredictionResponse>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;

    let ticket = dashboard.lock().begin_maintenance(&equipment_id)?;
    tracing::debug!(
        session = %session.session_id,
        equipment = %ticket.input,
        generation = ticket.generation,
        "Maintenance prediction submitted"
    );

    let gateway = state.gateway.clone();
    let completion = tokio::spawn(async move {
        let result = gateway.predict_maintenance(&ticket.input).await;

        let mut ctx = dashboard.lock();
        if ctx.finish_maintenance(&ticket, result) == Completion::Discarded {
            tracing::debug!(equipment = %ticket.input, "Superseded prediction dropped");
            return Err(AppError::Superseded);
        }

        match ctx.maintenance().state() {
            RequestState::Succeeded(prediction) => Ok(PredictionResponse {
                prediction: prediction.clone(),
                risk: RiskView::of(&ctx, &ticket.input),
            }),
            RequestState::Failed(err) => Err(err.clone().into()),
            other => Err(AppError::InternalError(format!(
                "maintenance request left in state '{}'",
                other.label()
            ))),
        }
    });

    Ok(Json(completion.await??))
}

/// Latest maintenance request of this session
pub async fn current(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<RequestView<MaintenancePrediction>>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let ctx = dashboard.lock();
    Ok(Json(RequestView::of(ctx.maintenance())))
}

/// Current risk, threshold, alert and history for one equipment
pub async fn risk(
    State(state): State<AppState>,
    session: SessionContext,
    Path(equipment_id): Path<String>,
) -> AppResult<Json<RiskView>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let ctx = dashboard.lock();
    Ok(Json(RiskView::of(&ctx, equipment_id.trim())))
}

/// Change the alert threshold and re-evaluate
pub async fn set_threshold(
    State(state): State<AppState>,
    session: SessionContext,
    Path(equipment_id): Path<String>,
    Json(req): Json<UpdateThreshold>,
) -> AppResult<Json<RiskView>> {
    req.validate()?;
    let equipment_id = equipment_id.trim();

    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let mut ctx = dashboard.lock();
    if ctx.set_threshold(equipment_id, req.value)?.is_some() {
        tracing::info!(equipment = %equipment_id, threshold = req.value, "Threshold change raised an alert");
    }
    Ok(Json(RiskView::of(&ctx, equipment_id)))
}
