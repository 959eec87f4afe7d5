use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client_ip::ClientId;
use crate::error::ScanError;
use crate::metrics::{RATE_LIMITED, SCAN_REQUESTS, VALIDATION_FAILURES};
use crate::models::{ScanRequest, ScanResult};
use crate::normalize::scan_result_from_reply;
use crate::rate_limit::RateDecision;
use crate::state::AppState;
use crate::validation::IMAGE_TOO_LARGE_ERROR;

// POST /api/scan
pub async fn scan_handler(
    State(state): State<Arc<AppState>>,
    ClientId(client): ClientId,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ScanResult>, ScanError> {
    SCAN_REQUESTS.inc();

    // fail closed before touching the limiter or the network
    let gemini = state.gemini.as_ref().ok_or(ScanError::Configuration)?;

    if let RateDecision::Limited { retry_after } = state.rate_limiter.check(&client) {
        RATE_LIMITED.inc();
        warn!(%client, "Rate limit exceeded");
        return Err(ScanError::RateLimited { retry_after });
    }

    // the body cap sits above the largest accepted image
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            VALIDATION_FAILURES.inc();
            info!(%client, "Rejected oversized scan body");
            return Err(ScanError::Validation(vec![IMAGE_TOO_LARGE_ERROR.to_string()]));
        }
        Err(rejection) => {
            debug!(error = %rejection, "Failed to read scan body");
            Bytes::new()
        }
    };

    let request: ScanRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!(error = %e, "Scan body is not a JSON object");
        ScanRequest::default()
    });

    let image = request.validate().inspect_err(|e| {
        VALIDATION_FAILURES.inc();
        info!(%client, error = %e, "Rejected scan request");
    })?;

    let reply = gemini.generate(&image).await?;
    let result = scan_result_from_reply(&reply);

    info!(
        %client,
        detected = result.detected,
        items = result.items.len(),
        fallback = result.parse_error.is_some(),
        "Scan completed"
    );
    Ok(Json(result))
}
