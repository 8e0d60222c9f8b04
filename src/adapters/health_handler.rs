use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::form_handler::FormStore;
use crate::config::Settings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub forms: usize,
    pub active_sessions: usize,
}

pub struct HealthHandler {
    settings: Arc<Settings>,
    store: FormStore,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(settings: Arc<Settings>, store: FormStore) -> Self {
        Self {
            settings,
            store,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            forms: self.settings.forms.len(),
            active_sessions: self.store.len().await,
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - ready once at least one form is configured
    pub async fn ready(&self) -> impl IntoResponse {
        if !self.settings.forms.is_empty() {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Server is ready to accept requests"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "No forms configured"
            })))
        }
    }
}
