use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": "UniClubs API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Campus club directory, membership and events",
        "status": "operational",
        "features": {
            "demoLogin": state.settings.auth.demo_login_enabled,
            "assistant": state.service_context.assistant.is_configured()
        },
        "endpoints": {
            "health": "/health",
            "api": "/api",
            "auth": "/auth/login",
            "public": "/public",
            "admin": "/admin"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
