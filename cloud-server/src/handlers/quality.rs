//! Quality standards handlers (pass-through to the standards service)

use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use qc_signal_core::logic::quality::QualityStandard;

use crate::{AppState, AppResult};
use crate::middleware::auth::SessionContext;
use crate::models::StandardRequest;

pub async fn list(
    State(state): State<AppState>,
    _session: SessionContext,
) -> AppResult<Json<Vec<QualityStandard>>> {
    let standards = state.standards.list_standards().await?;
    Ok(Json(standards))
}

pub async fn create(
    State(state): State<AppState>,
    session: SessionContext,
    Json(req): Json<StandardRequest>,
) -> AppResult<(StatusCode, Json<QualityStandard>)> {
    req.validate()?;

    let created = state.standards.create_standard(&req.into_standard(None)).await?;
    tracing::info!(session = %session.session_id, name = %created.name, "Quality standard created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(id): Path<String>,
    Json(req): Json<StandardRequest>,
) -> AppResult<Json<QualityStandard>> {
    req.validate()?;

    let updated = state.standards
        .update_standard(&id, &req.into_standard(Some(id.clone())))
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.standards.delete_standard(&id).await?;
    tracing::info!(session = %session.session_id, standard = %id, "Quality standard deleted");
    Ok(Json(json!({ "deleted": id })))
}
