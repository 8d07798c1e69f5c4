#![allow(dead_code)]

/// Common test utilities for API tests
///
/// Builds the real router over an in-memory store, so these tests need no
/// database. Seeding goes straight into the store; tokens are minted with
/// the same secret the router verifies with.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pawsit_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, JwtConfig, RateLimitConfig},
};
use pawsit_shared::{
    auth::jwt::{create_token, Claims},
    db::pool::DatabaseConfig,
    models::user::Role,
    repository::memory::InMemoryStore,
    services::Services,
};
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

pub struct TestContext {
    pub store: InMemoryStore,
    pub app: Router,
}

impl TestContext {
    /// Rate limit high enough to stay out of the way
    pub fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig {
            burst: 10_000,
            ..Default::default()
        })
    }

    pub fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let store = InMemoryStore::new();
        let services = Services::in_memory(store.clone(), JWT_SECRET);
        let app = build_router(AppState::new(services, test_config(rate_limit), None));

        Self { store, app }
    }

    pub fn token(&self, user_id: i64, role: Role) -> String {
        create_token(&Claims::new(user_id, role), JWT_SECRET).unwrap()
    }

    /// Sends a request and decodes the JSON body (`Value::Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, Some(token), Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, Some(token), None)).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn test_config(rate_limit: RateLimitConfig) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
            shutdown_grace_secs: 1,
        },
        database: DatabaseConfig {
            url: "postgresql://unused/test".to_string(),
            ..Default::default()
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        rate_limit,
        sweep_interval_secs: 3600,
        run_migrations: false,
    }
}
