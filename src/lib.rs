pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;
pub mod submission;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, CorsOrigins};
use crate::state::{AppState, SharedState};
use crate::storage::RecordLog;
use crate::submission::Intake;
use crate::submission::schema::SchemaValidator;

/// Set on every response, overriding anything a handler wrote.
const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

pub fn build_app(config: Config, log: Arc<dyn RecordLog>) -> Router {
    let intake = Intake::new(SchemaValidator::default(), log, config.require_consent);

    let cors = cors_layer(&config.cors_origins);
    let body_limit = RequestBodyLimitLayer::new(config.max_body_size);

    let state: SharedState = Arc::new(AppState { config, intake });

    let router = Router::new()
        .merge(routes::ingest_routes().layer(cors))
        .merge(routes::health_routes())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http());

    SECURITY_HEADERS
        .iter()
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let allowed = list.iter().filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring CORS origin '{origin}': {e}");
                    None
                }
            });
            layer.allow_origin(AllowOrigin::list(allowed))
        }
    }
}
