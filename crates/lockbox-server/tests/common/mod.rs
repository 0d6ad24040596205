//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Request, StatusCode,
    },
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use lockbox_core::{Argon2Hasher, HashParams};
use lockbox_server::{create_router, AppState, ManualClock, MemoryStore, ServerConfig};

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = ServerConfig {
            token_ttl: Duration::seconds(3600),
            hash_params: HashParams::new(8, 1, 1),
            ..ServerConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let hasher = Arc::new(Argon2Hasher::new(config.hash_params).unwrap());
        let state = AppState::new(&config, store.clone(), hasher, clock.clone()).unwrap();

        Self {
            router: create_router(Arc::new(state)),
            clock,
            store,
        }
    }

    /// Send a request with an optional bearer token and raw body
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let auth = token.map(|t| format!("Bearer {}", t));
        let body = body.map(|b| b.to_string());
        self.send_raw(method, uri, auth.as_deref(), body.as_deref())
            .await
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/register",
            None,
            Some(registration(username, &format!("{}@example.com", username), password)),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/token",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register a user and return a fresh access token
    pub async fn user_with_token(&self, username: &str) -> String {
        let (status, _) = self.register(username, "correct-horse").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(username, "correct-horse").await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }
}

pub fn registration(username: &str, email: &str, password: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": password,
        "full_name": "Test User",
        "age": 30,
        "gender": "other",
    })
}

pub fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}
