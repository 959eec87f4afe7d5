use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize, Debug, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
    pub provider: &'static str,
    pub configured: bool,
}

// GET /api/health - no upstream call, only reports whether a key is set
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        provider: "gemini",
        configured: state.is_configured(),
    })
}
