//! Test helpers for weight-service integration tests.
//!
//! Drives the full router against the in-memory backend double.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use service_core::config as core_config;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;
use weight_service::{
    AppState, build_router,
    config::{DatabaseConfig, Environment, RateLimitConfig, SecurityConfig, WeightConfig},
    db::MemoryBackend,
    models::Role,
};

pub fn test_config() -> WeightConfig {
    WeightConfig {
        common: core_config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "weight-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        database: DatabaseConfig {
            // Never contacted: tests inject the memory backend
            url: "http://localhost:9999".to_string(),
            auth_token: None,
        },
        roles: [Role::new("A"), Role::new("B")],
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<MemoryBackend>,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let state = AppState::new(test_config(), backend.clone());
        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");
        Self {
            router,
            backend,
            state,
        }
    }

    /// One request through the full middleware stack. Returns status and the
    /// decoded JSON body (Null when empty or not JSON).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        session_id: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .extension(axum::extract::ConnectInfo(SocketAddr::from((
                [127, 0, 0, 1],
                8080,
            ))));
        if let Some(session_id) = session_id {
            builder = builder.header("x-session-id", session_id.to_string());
        }

        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// POST /auth/session, returning (session_id, device_id, state).
    pub async fn start_session(&self, device_id: Option<&str>) -> (Uuid, String, String) {
        let body = match device_id {
            Some(id) => json!({ "device_id": id }),
            None => json!({}),
        };
        let (status, value) = self.request("POST", "/auth/session", None, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);

        let session_id = Uuid::parse_str(value["session_id"].as_str().unwrap()).unwrap();
        let device_id = value["device_id"].as_str().unwrap().to_string();
        let state = value["state"].as_str().unwrap().to_string();
        (session_id, device_id, state)
    }

    /// Register a fresh device under `role` and return its logged-in session.
    pub async fn register_logged_in(&self, device_id: &str, role: &str, password: &str) -> Uuid {
        let (session_id, _, state) = self.start_session(Some(device_id)).await;
        assert_eq!(state, "awaiting_registration");

        let (status, value) = self
            .request(
                "POST",
                "/auth/register",
                Some(session_id),
                Some(json!({ "role": role, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", value);
        assert_eq!(value["state"], "logged_in");
        session_id
    }

    /// Add a record for the given session, returning its id.
    pub async fn add_record(&self, session_id: Uuid, timestamp: &str, weight: f64) -> Uuid {
        let (status, value) = self
            .request(
                "POST",
                "/records",
                Some(session_id),
                Some(json!({ "timestamp": timestamp, "weight": weight })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add_record failed: {}", value);
        Uuid::parse_str(value["id"].as_str().unwrap()).unwrap()
    }
}

/// RFC 3339 timestamp on day `d` of a fixed test month.
pub fn day(d: u32) -> String {
    format!("2024-03-{:02}T08:00:00Z", d)
}
