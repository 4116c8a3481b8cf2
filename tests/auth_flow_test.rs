use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use jsonplaceholder_api::auth::JwtService;

mod common;
use common::{test_app, test_pool, user_payload, TEST_JWT_SECRET};

async fn create_user(app: &Router) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users/")
        .header("Content-Type", "application/json")
        .body(Body::from(
            user_payload("testuser", "test@example.com").to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn post_token(app: &Router, username: &str, password: &str) -> (StatusCode, Value, bool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/token")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let has_www_authenticate = response.headers().contains_key(header::WWW_AUTHENTICATE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json, has_www_authenticate)
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = test_app(test_pool().await);
    create_user(&app).await;

    let (status, body, _) = post_token(&app, "testuser", "password123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    // The token decodes back to the username that logged in.
    let token = body["access_token"].as_str().unwrap();
    let jwt_service = JwtService::new(TEST_JWT_SECRET, Duration::minutes(30));
    assert_eq!(jwt_service.decode_subject(token).unwrap(), "testuser");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app(test_pool().await);
    create_user(&app).await;

    let (status, body, has_www_authenticate) =
        post_token(&app, "testuser", "wrong-password").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect username or password");
    assert!(has_www_authenticate);
}

#[tokio::test]
async fn test_login_unknown_username_is_undifferentiated() {
    let app = test_app(test_pool().await);
    create_user(&app).await;

    let (wrong_user_status, wrong_user_body, _) = post_token(&app, "nobody", "password123").await;
    let (wrong_pass_status, wrong_pass_body, _) =
        post_token(&app, "testuser", "wrong-password").await;

    // Unknown username and wrong password are indistinguishable to a client.
    assert_eq!(wrong_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_user_status, wrong_pass_status);
    assert_eq!(wrong_user_body, wrong_pass_body);
}
