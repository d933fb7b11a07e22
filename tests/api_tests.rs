mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use ter_system::{
    build_app,
    utils::jwt::{generate_token, JwtConfig},
};

fn app(rate_limit_requests: u32) -> Router {
    build_app(common::test_state(rate_limit_requests))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = app(10)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    for path in [
        "/api/solicitudes",
        "/api/users",
        "/api/dashboard/stats",
        "/api/admin/chatbot/users",
        "/api/auth/me",
    ] {
        let response = app(10)
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "ruta {}", path);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let foreign = JwtConfig {
        secret: "otro-secreto".to_string(),
        session_hours: 1,
    };
    let issued = generate_token(1, "admin", "admin", &foreign, Utc::now()).unwrap();

    let response = app(10)
        .oneshot(
            Request::get("/api/solicitudes")
                .header(header::AUTHORIZATION, format!("Bearer {}", issued.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_rejected() {
    let response = app(10)
        .oneshot(
            Request::get("/api/notifications")
                .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rate_limit_rejects_before_touching_database() {
    let response = app(0)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "10.0.0.9")
                .body(Body::from(
                    json!({"username": "admin", "password": "x"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app(10)
        .oneshot(Request::get("/api/no-existe").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let response = app(10)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/solicitudes")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}
