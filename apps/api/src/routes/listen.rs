use axum::{body::Bytes, Json};
use serde_json::{json, Value};

/// POST /listen
/// Placeholder for the desktop shell: echoes the JSON body back. A missing or
/// unparseable body echoes as `{}`.
pub async fn listen_handler(body: Bytes) -> Json<Value> {
    let received = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Null) | Err(_) => json!({}),
        Ok(value) => value,
    };

    Json(json!({
        "status": "listening",
        "received": received
    }))
}
