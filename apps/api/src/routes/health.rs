use axum::Json;
use chrono::Local;
use serde_json::{json, Value};

/// GET /health
/// Returns a liveness status with the server's current local time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().to_rfc3339()
    }))
}
