use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

/// Liveness probe.
pub async fn ping() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "API is alive",
        "utc_time": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    }))
}
