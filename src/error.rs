use std::time::Duration;

use axum::{
    Json,
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::metrics::UPSTREAM_ERRORS;

// Longest slice of an upstream error body we pass on to the client
pub const EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("GEMINI_API_KEY is not configured")]
    Configuration,

    #[error("Rate limit exceeded. Try again in {} seconds.", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Gemini API error {status}: {excerpt}")]
    Upstream { status: u16, excerpt: String },

    // the wrapped error never carries the request URL, it holds the API key
    #[error("Failed to reach Gemini API")]
    Network(#[source] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    pub fn upstream(status: u16, body: &str) -> Self {
        ScanError::Upstream {
            status,
            excerpt: body.chars().take(EXCERPT_CHARS).collect(),
        }
    }

    // Classify a reqwest failure, dropping the URL before keeping it around
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_builder() {
            ScanError::Internal(err.to_string())
        } else {
            ScanError::Network(err)
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        match self {
            ScanError::Configuration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Server configuration error",
                    "message": self.to_string(),
                })),
            )
                .into_response(),
            ScanError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after.as_secs().to_string())],
                Json(json!({
                    "error": "Too many requests",
                    "message": self.to_string(),
                })),
            )
                .into_response(),
            ScanError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid request",
                    "details": details,
                })),
            )
                .into_response(),
            ScanError::Upstream { status, .. } => {
                UPSTREAM_ERRORS.with_label_values(&["status"]).inc();
                error!(upstream_status = status, "Gemini returned an error");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "error": "External API error",
                        "message": self.to_string(),
                    })),
                )
                    .into_response()
            }
            ScanError::Network(ref err) => {
                UPSTREAM_ERRORS.with_label_values(&["network"]).inc();
                error!(error = %err, "Gemini request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Network error",
                        "message": "Unable to reach the vision API",
                    })),
                )
                    .into_response()
            }
            ScanError::Internal(ref message) => {
                error!(%message, "scan failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
