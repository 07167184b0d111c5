//! Notification handlers

use axum::{extract::{Path, State}, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use qc_signal_core::logic::notify::Notification;

use crate::{AppState, AppResult};
use crate::middleware::auth::SessionContext;

pub async fn list(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<Vec<Notification>>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let ctx = dashboard.lock();
    Ok(Json(ctx.notifications().to_vec()))
}

/// Dismiss one notification; unknown ids are not an error
pub async fn dismiss(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let dismissed = dashboard.lock().dismiss_notification(id);
    Ok(Json(json!({ "dismissed": dismissed })))
}

pub async fn clear(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<Value>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let cleared = dashboard.lock().clear_notifications();
    Ok(Json(json!({ "cleared": cleared })))
}
