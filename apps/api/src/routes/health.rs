use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns service status plus the host platform the backend is running on.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "interview-api",
        "version": env!("CARGO_PKG_VERSION"),
        "os": std::env::consts::OS,
        "family": std::env::consts::FAMILY,
        "arch": std::env::consts::ARCH
    }))
}
