#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use food_scan_gateway::{build_router, config::Args, state::AppState};
use serde_json::{Value, json};

pub const ORIGIN: &str = "https://scanner.example.com";
pub const API_KEY: &str = "test-key";
pub const MODEL: &str = "gemini-1.5-flash";
pub const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

// Built field by field so GEMINI_API_KEY in the test environment cannot leak in
pub fn args(base_url: &str, api_key: Option<&str>) -> Args {
    Args {
        host: "127.0.0.1".to_string(),
        port: 0,
        gemini_api_key: api_key.map(str::to_string),
        gemini_model: MODEL.to_string(),
        gemini_base_url: base_url.to_string(),
        allowed_origin: ORIGIN.to_string(),
        rate_limit: 10,
        rate_window: 60,
        max_body_bytes: 16 * 1024 * 1024,
        upstream_timeout: Some(5),
    }
}

pub fn app(args: &Args) -> Router {
    let state = AppState::from_args(args).expect("valid test configuration");
    build_router(Arc::new(state))
}

pub fn scan_request(body: &Value, client: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scan")
        .header("content-type", "application/json")
        .header("origin", ORIGIN)
        .header("x-forwarded-for", client)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn valid_image() -> Value {
    json!({
        "imageBase64": "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD",
        "mimeType": "image/jpeg"
    })
}

// Gemini reply whose single candidate says `text`
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn assert_cors(response: &Response<Body>, methods: &str) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-methods"], methods);
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert_eq!(headers["vary"], "origin");
}
