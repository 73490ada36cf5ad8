use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers::{
        collect::collect_handler,
        health::{health_handler, ping_handler},
        pages::{index_handler, scanner_handler},
    },
    infra::app_state::AppState,
};

pub mod paths {
    pub const INDEX: &str = "/";
    pub const SCANNER: &str = "/scanner";
    pub const COLLECT: &str = "/collect";
    pub const HEALTH: &str = "/health";
    pub const PING: &str = "/ping";
}

/// Build the full application router with middleware attached.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(&state);

    Router::new()
        .route(paths::INDEX, get(index_handler))
        .route(paths::SCANNER, get(scanner_handler))
        .route(paths::COLLECT, get(collect_handler))
        .route(paths::HEALTH, get(health_handler))
        .route(paths::PING, get(ping_handler))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Permissive in dev, allow-list otherwise.
fn cors_layer(state: &AppState) -> CorsLayer {
    let config = state.config();
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let allow_origin = if config.cors.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
