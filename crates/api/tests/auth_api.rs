//! Integration tests for login and the Bearer token guard.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{body_json, empty_store, get, get_auth, send, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;
use voyage_api::auth::jwt::validate_token;

fn app() -> axum::Router {
    common::build_test_app(Arc::new(empty_store()))
}

async fn login(body: serde_json::Value) -> axum::http::Response<axum::body::Body> {
    send(app(), Method::POST, "/api/auth/login", None, Some(body)).await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_admin_credentials_issues_token() {
    let response = login(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["user"], json!({ "email": ADMIN_EMAIL, "role": "admin" }));

    let claims = validate_token(
        json["token"].as_str().unwrap(),
        &common::test_config().jwt,
    )
    .unwrap();
    assert_eq!(claims.email, ADMIN_EMAIL);
    assert_eq!(claims.role, "admin");
    assert_eq!(claims.exp - claims.iat, 8 * 3600);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let response = login(json!({ "email": ADMIN_EMAIL, "password": "nope" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_email_is_401() {
    let response = login(json!({ "email": "guest@travel.com", "password": ADMIN_PASSWORD })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_password_is_400() {
    let response = login(json!({ "email": ADMIN_EMAIL })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Email and password are required");
}

// ---------------------------------------------------------------------------
// Token guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_returns_the_token_identity() {
    let response = get_auth(app(), "/api/auth/me").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert_eq!(json["user"]["role"], "admin");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let response = get(app(), "/api/locations").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_401() {
    let response = send(app(), Method::GET, "/api/dashboard/stats", Some("not-a-jwt"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_401() {
    let foreign = voyage_api::auth::jwt::generate_token(
        ADMIN_EMAIL,
        "admin",
        &voyage_api::auth::jwt::JwtConfig {
            secret: "someone-else".into(),
            expiry_hours: 8,
        },
    )
    .unwrap();
    let response = send(app(), Method::GET, "/api/auth/me", Some(&foreign), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_acknowledges() {
    let response = send(
        app(),
        Method::POST,
        "/api/auth/logout",
        Some(&common::admin_token()),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Logged out successfully");
}
