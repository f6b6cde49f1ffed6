use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{metadata, parser};

pub async fn submit_survey(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let raw = parser::parse_body(&body).map_err(AppError::InvalidJson)?;

    let caller = metadata::extract(&headers, Some(addr.ip()), &state.config.trusted_proxies);

    state.intake.submit(&raw, caller).await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "ok" }))))
}
