//! Display preference handlers

use axum::{extract::State, Json};

use qc_signal_core::logic::preferences::{Preferences, PreferencesUpdate};

use crate::{AppState, AppResult};
use crate::middleware::auth::SessionContext;

pub async fn get(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<Preferences>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let prefs = dashboard.lock().preferences().clone();
    Ok(Json(prefs))
}

pub async fn update(
    State(state): State<AppState>,
    session: SessionContext,
    Json(req): Json<PreferencesUpdate>,
) -> AppResult<Json<Preferences>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let prefs = dashboard.lock().update_preferences(req).clone();
    Ok(Json(prefs))
}
