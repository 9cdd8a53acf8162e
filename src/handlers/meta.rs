use axum::Json;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Todo API Server",
        "status": "running",
        "timestamp": now(),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": now() }))
}
