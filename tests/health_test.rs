mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::util::ServiceExt;

use common::{ORIGIN, app, args, assert_cors, body_bytes, body_json};

const NO_UPSTREAM: &str = "http://127.0.0.1:9";

fn health(method: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/health")
        .header("origin", ORIGIN)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn reports_configured_when_key_is_set() {
    let app = app(&args(NO_UPSTREAM, Some("secret")));

    let response = app.oneshot(health("GET")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response, "GET, OPTIONS");
    let body = body_bytes(response).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        r#"{"ok":true,"provider":"gemini","configured":true}"#
    );
}

#[tokio::test]
async fn reports_unconfigured_without_key() {
    for key in [None, Some(""), Some("   ")] {
        let app = app(&args(NO_UPSTREAM, key));

        let response = app.oneshot(health("GET")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "ok": true, "provider": "gemini", "configured": false })
        );
    }
}

#[tokio::test]
async fn preflight_is_empty_ok_with_cors_headers() {
    for key in [None, Some("secret")] {
        let app = app(&args(NO_UPSTREAM, key));

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/health")
            .header("origin", ORIGIN)
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response, "GET, OPTIONS");
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let app = app(&args(NO_UPSTREAM, Some("secret")));

    for method in ["POST", "PUT", "DELETE"] {
        let response = app.clone().oneshot(health(method)).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&response, "GET, OPTIONS");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Method not allowed" })
        );
    }
}

#[tokio::test]
async fn head_is_rejected() {
    let app = app(&args(NO_UPSTREAM, Some("secret")));

    let response = app.oneshot(health("HEAD")).await.unwrap();

    // HEAD responses carry no body, so only status and headers are checked
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response, "GET, OPTIONS");
}

#[tokio::test]
async fn cors_origin_is_fixed_whatever_the_caller_sends() {
    let app = app(&args(NO_UPSTREAM, None));

    let request = Request::builder()
        .uri("/api/health")
        .header("origin", "https://evil.example.net")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], ORIGIN);
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = app(&args(NO_UPSTREAM, None));

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
