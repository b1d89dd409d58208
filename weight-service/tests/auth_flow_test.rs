mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let app = TestApp::new().await;

    // First contact: unknown device, registration expected
    let session_id = app.register_logged_in("D1", "A", "p1").await;

    // Logged-in session can reach protected routes
    let (status, _) = app.request("GET", "/records", Some(session_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("POST", "/auth/logout", Some(session_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Same device, new session: known device goes straight to the password
    let (session_id, device_id, state) = app.start_session(Some("D1")).await;
    assert_eq!(device_id, "D1");
    assert_eq!(state, "awaiting_password");

    // Wrong password rejected, session stays usable
    let (status, value) = app
        .request(
            "POST",
            "/auth/login",
            Some(session_id),
            Some(json!({ "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // User-visible text must not reveal whether the device is registered
    assert_eq!(value["error"], "Invalid credentials");

    let (status, value) = app
        .request(
            "POST",
            "/auth/login",
            Some(session_id),
            Some(json!({ "password": "p1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["state"], "logged_in");
    assert_eq!(value["role"], "A");
}

#[tokio::test]
async fn test_fresh_device_id_generated_when_none_provided() {
    let app = TestApp::new().await;
    let (_, device_id, state) = app.start_session(None).await;

    assert!(!device_id.is_empty());
    assert_eq!(state, "awaiting_registration");

    // A second anonymous visit gets a different identity
    let (_, other_device_id, _) = app.start_session(None).await;
    assert_ne!(device_id, other_device_id);
}

#[tokio::test]
async fn test_duplicate_role_rejected_for_second_device() {
    let app = TestApp::new().await;
    app.register_logged_in("D1", "A", "p1").await;

    let (session_id, _, state) = app.start_session(Some("D2")).await;
    assert_eq!(state, "awaiting_registration");

    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "A", "password": "p2" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The session survives the failed attempt and can take the free role
    let (status, value) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "B", "password": "p2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["role"], "B");
}

#[tokio::test]
async fn test_unknown_role_rejected() {
    let app = TestApp::new().await;
    let (session_id, _, _) = app.start_session(Some("D1")).await;

    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "C", "password": "p1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_password_rejected() {
    let app = TestApp::new().await;
    let (session_id, _, _) = app.start_session(Some("D1")).await;

    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "A", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_session_header_is_unauthorized() {
    let app = TestApp::new().await;

    for (method, uri) in [
        ("POST", "/auth/login"),
        ("POST", "/auth/register"),
        ("GET", "/records"),
        ("GET", "/chart"),
    ] {
        let body = match method {
            "POST" => Some(json!({ "role": "A", "password": "p" })),
            _ => None,
        };
        let (status, _) = app.request(method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_logged_out_session_cannot_access_records() {
    let app = TestApp::new().await;
    let session_id = app.register_logged_in("D1", "A", "p1").await;

    app.request("POST", "/auth/logout", Some(session_id), None)
        .await;

    let (status, _) = app.request("GET", "/records", Some(session_id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_backend_outage_surfaces_as_bad_gateway() {
    let app = TestApp::new().await;
    let (session_id, _, _) = app.start_session(Some("D1")).await;

    app.backend.set_failing(true);
    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "A", "password": "p1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // The outage is not fatal: service recovers once the backend is back
    app.backend.set_failing(false);
    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            Some(session_id),
            Some(json!({ "role": "A", "password": "p1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_reports_backend() {
    let app = TestApp::new().await;

    let (status, value) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "healthy");

    app.backend.set_failing(true);
    let (status, _) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
