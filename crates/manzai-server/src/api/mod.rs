//! HTTP routes

mod health;
mod manzai;
mod scripts;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use manzai_core::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::state::AppState;

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let manzai_routes = Router::new()
        .route("/concat", post(manzai::concat))
        .route("/synthesis", post(manzai::synthesis));

    let script_routes = Router::new()
        .route("/save_manzai_script", post(scripts::save))
        .route("/get_manzai_scripts", get(scripts::list));

    let mut router = Router::new()
        .route("/health", get(health::health))
        .nest("/manzai", manzai_routes)
        .nest("/scripts", script_routes)
        .layer(TraceLayer::new_for_http());

    if server.cors_enabled {
        router = router.layer(cors_layer(&server.cors_origins));
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
