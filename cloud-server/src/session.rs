//! Operator sessions
//!
//! One `DashboardContext` per authenticated operator. Handlers lock a context
//! only to begin or finish a request, never across a gateway call.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use qc_signal_core::logic::dashboard::DashboardSettings;
use qc_signal_core::DashboardContext;

use crate::{AppError, AppResult};

pub type SharedDashboard = Arc<Mutex<DashboardContext>>;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SharedDashboard>>>,
    settings: DashboardSettings,
}

impl SessionRegistry {
    pub fn new(settings: DashboardSettings) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            settings,
        }
    }

    /// The operator's context, created on first use
    pub fn get_or_create(&self, session_id: &str) -> AppResult<SharedDashboard> {
        let mut sessions = self.sessions.lock();
        if let Some(dashboard) = sessions.get(session_id) {
            return Ok(dashboard.clone());
        }

        let dashboard = DashboardContext::with_settings(self.settings.clone())
            .map_err(|e| AppError::InternalError(format!("invalid dashboard settings: {}", e)))?;
        let dashboard = Arc::new(Mutex::new(dashboard));
        sessions.insert(session_id.to_string(), dashboard.clone());

        tracing::info!(session = %session_id, active = sessions.len(), "Dashboard session opened");
        Ok(dashboard)
    }

    /// Tear the context down; responses still in flight for it are dropped
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().remove(session_id);
        match removed {
            Some(dashboard) => {
                dashboard.lock().teardown();
                tracing::info!(session = %session_id, "Dashboard session closed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
