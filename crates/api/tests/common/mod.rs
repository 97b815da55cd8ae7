#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use voyage_api::auth::jwt::{generate_token, JwtConfig};
use voyage_api::auth::password::{hash_password, AdminCredentials};
use voyage_api::config::ServerConfig;
use voyage_api::router::build_app_router;
use voyage_api::state::AppState;
use voyage_store::config::tables;
use voyage_store::memory::{identity_tables, MemoryTransport};
use voyage_store::retry::RetryPolicy;
use voyage_store::{RecordClient, StoreConfig};

pub const ADMIN_EMAIL: &str = "admin@travel.com";
pub const ADMIN_PASSWORD: &str = "correct horse";
pub const SALT: &str = "test-salt";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. Table ids equal their logical names.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 8,
        },
        admin: AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD, SALT),
            salt: SALT.to_string(),
        },
        store: StoreConfig::new("http://store.invalid", "token", identity_tables()),
    }
}

/// A memory store with every table present and empty.
pub fn empty_store() -> MemoryTransport {
    [
        tables::ACCOUNTS,
        tables::LOCATIONS,
        tables::FESTIVALS,
        tables::ITEMS,
        tables::OBJECTS,
        tables::TRANSACTIONS,
    ]
    .into_iter()
    .fold(MemoryTransport::new(), |store, table| {
        store.with_table(table, Vec::new())
    })
}

/// Build the full application router over an in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack. Store calls are not retried.
pub fn build_test_app(store: Arc<MemoryTransport>) -> Router {
    let config = test_config();
    let client = RecordClient::with_transport(identity_tables(), RetryPolicy::none(), store);
    let state = AppState {
        store: Arc::new(client),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid admin Bearer token for [`test_config`].
pub fn admin_token() -> String {
    generate_token(ADMIN_EMAIL, "admin", &test_config().jwt).unwrap()
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// GET with the admin token.
pub async fn get_auth(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&admin_token()), None).await
}

/// Request with a JSON body and the admin token.
pub async fn json_auth(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    send(app, method, uri, Some(&admin_token()), Some(body)).await
}

/// DELETE with the admin token.
pub async fn delete_auth(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&admin_token()), None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
