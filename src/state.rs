use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use secrecy::Secret;

use crate::config::Args;
use crate::gemini::GeminiClient;
use crate::rate_limit::{InMemoryRateLimiter, RateLimiter};

// app's shared state
pub struct AppState {
    pub gemini: Option<GeminiClient>, // None when no credential is configured
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub allowed_origin: HeaderValue,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let rate_limiter = Arc::new(InMemoryRateLimiter::new(
            args.rate_limit,
            Duration::from_secs(args.rate_window),
        ));
        Self::with_rate_limiter(args, rate_limiter)
    }

    // Same as from_args but with a caller supplied limiter, e.g. a shared store
    pub fn with_rate_limiter(
        args: &Args,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> anyhow::Result<Self> {
        let allowed_origin = HeaderValue::from_str(&args.allowed_origin)
            .with_context(|| format!("invalid allowed origin {:?}", args.allowed_origin))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = args.upstream_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;

        let gemini = args.api_key().map(|key| {
            GeminiClient::new(
                client,
                &args.gemini_base_url,
                &args.gemini_model,
                Secret::new(key.to_string()),
            )
        });

        Ok(Self {
            gemini,
            rate_limiter,
            allowed_origin,
            max_body_bytes: args.max_body_bytes,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.gemini.is_some()
    }
}
