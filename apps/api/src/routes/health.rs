use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "Active",
        "message": "Server is running smoothly",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
