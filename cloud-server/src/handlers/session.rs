//! Session handlers

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;
use crate::middleware::auth::SessionContext;

/// Drop this operator's dashboard; in-flight requests are discarded
pub async fn end(
    State(state): State<AppState>,
    session: SessionContext,
) -> Json<Value> {
    let ended = state.sessions.end(&session.session_id);
    Json(json!({ "ended": ended }))
}
