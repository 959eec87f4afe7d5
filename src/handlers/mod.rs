mod health;
mod metrics;
mod scan;

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use scan::scan_handler;

// Fallback for methods a route does not serve
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
