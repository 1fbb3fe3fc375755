use axum::{extract::State, response::Json};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

/// Health check handler
/// Returns a simple JSON response indicating the server is running
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "message": "Hello from tutorvox"
    }))
}

fn availability(configured: bool) -> &'static str {
    if configured { "Available" } else { "Not Available" }
}

/// Reports which upstream providers have credentials
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "data": "This is data from the backend!",
        "env_var_status": state.config.sample_env_var.as_deref().unwrap_or("Not Set"),
        "openai_status": availability(state.config.has_openai()),
        "elevenlabs_status": availability(state.config.has_elevenlabs()),
    }))
}
