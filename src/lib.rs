// Gateway that keeps the Gemini key off the frontend

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub mod client_ip;
pub mod config;
pub mod cors;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod rate_limit;
pub mod state;
pub mod validation;

use cors::{HEALTH_METHODS, SCAN_METHODS, with_cors};
use handlers::{health_handler, method_not_allowed, metrics_handler, scan_handler};
use state::AppState;

pub const HEALTH_PATH: &str = "/api/health";
pub const SCAN_PATH: &str = "/api/scan";

pub fn build_router(state: Arc<AppState>) -> Router {
    let health = with_cors(
        Router::<Arc<AppState>>::new()
            // GET alone would also answer HEAD
            .route(
                HEALTH_PATH,
                get(health_handler)
                    .head(method_not_allowed)
                    .fallback(method_not_allowed),
            ),
        state.allowed_origin.clone(),
        HEALTH_METHODS,
    );

    let scan = with_cors(
        Router::<Arc<AppState>>::new()
            .route(SCAN_PATH, post(scan_handler).fallback(method_not_allowed))
            .layer(DefaultBodyLimit::max(state.max_body_bytes)),
        state.allowed_origin.clone(),
        SCAN_METHODS,
    );

    Router::new()
        .merge(health)
        .merge(scan)
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
