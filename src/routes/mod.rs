pub mod health;
pub mod ingest;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn ingest_routes() -> Router<SharedState> {
    Router::new().route("/v1/survey", post(ingest::submit_survey))
}

pub fn health_routes() -> Router<SharedState> {
    Router::new().route("/ping", get(health::ping))
}
