use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};

use crate::AppState;

use super::model::HealthResponse;

/// 服务自述，列出可用端点
#[axum::debug_handler]
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "price-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "single": "/price/{id}",
            "bulk": "/prices/{id1,id2,...}",
            "health": "/health"
        }
    }))
}

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: now,
        cache_size: state.cache.size(),
        uptime: (now - state.started_at).num_seconds(),
    })
}
