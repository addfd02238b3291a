#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use centra_players::routes::{AppState, build_router};

fn app() -> axum::Router {
    build_router(AppState::default())
}

/// Send a request to the app and return (status, parsed JSON body).
async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get_count(app: &axum::Router) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri("/api/players")
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn post_raw(app: &axum::Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/players")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, req).await
}

#[tokio::test]
async fn count_starts_at_zero() {
    let (status, body) = get_count(&app()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 0}));
}

#[tokio::test]
async fn post_then_get_returns_latest_count() {
    let app = app();
    for n in [0u64, 1, 57, 1000, u64::from(u32::MAX)] {
        let (status, body) = post_raw(&app, &json!({"count": n}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "count": n}));

        let (_, body) = get_count(&app).await;
        assert_eq!(body, json!({"count": n}));
    }
}

#[tokio::test]
async fn invalid_payloads_are_rejected_and_keep_count() {
    let app = app();
    post_raw(&app, r#"{"count": 12}"#).await;

    for bad in [
        r#"{"count": -1}"#,
        r#"{"count": "15"}"#,
        r#"{"count": 3.5}"#,
        r#"{"count": null}"#,
        r#"{"count": 18446744073709551616}"#,
        r#"{"count": 1e300}"#,
        r#"{"players": 4}"#,
        "not json",
        "",
    ] {
        let (status, body) = post_raw(&app, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {bad}");
        assert_eq!(body, json!({"error": "Invalid player count"}));
    }

    let (_, body) = get_count(&app).await;
    assert_eq!(body, json!({"count": 12}));
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let app = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/players")
        .body(Body::from(r#"{"count": 5}"#))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid player count");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let req = Request::builder()
        .uri("/api/players")
        .header(header::ORIGIN, "https://example.org")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_preflight_succeeds() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/players")
        .header(header::ORIGIN, "https://example.org")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let req = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
