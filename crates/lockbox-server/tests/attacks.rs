//! Attack Scenario Tests
//!
//! Each test plays a hostile client against the router and checks that the
//! attempt is blocked without leaking anything useful.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use common::{error_code, TestApp};

// =============================================================================
// ATTACK: Username enumeration via login
// =============================================================================

/// Unknown usernames and wrong passwords must produce byte-identical errors.
#[tokio::test]
async fn attack_username_enumeration_prevented() {
    let app = TestApp::new();
    app.register("alice", "correct-horse").await;

    let (wrong_status, wrong_body) = app.login("alice", "guess-one").await;
    let (unknown_status, unknown_body) = app.login("nobody", "guess-one").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(error_code(&wrong_body), "INVALID_CREDENTIALS");
}

// =============================================================================
// ATTACK: Cross-user data access
// =============================================================================

/// Mallory knows Alice's key name but cannot read, change or delete it.
/// Every attempt looks exactly like the key does not exist.
#[tokio::test]
async fn attack_cross_user_access_prevented() {
    let app = TestApp::new();
    let alice = app.user_with_token("alice").await;
    let mallory = app.user_with_token("mallory").await;

    app.send(
        "POST",
        "/data",
        Some(&alice),
        Some(json!({ "key": "diary", "value": "dear diary" })),
    )
    .await;

    let (absent_status, absent_body) = app.send("GET", "/data/nothing", Some(&mallory), None).await;
    let (status, body) = app.send("GET", "/data/diary", Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(status, absent_status);
    assert_eq!(body, absent_body);

    let (status, body) = app
        .send("PUT", "/data/diary", Some(&mallory), Some(json!({ "value": "defaced" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "KEY_NOT_FOUND");

    let (status, body) = app.send("DELETE", "/data/diary", Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "KEY_NOT_FOUND");

    // Alice's entry is untouched
    let (status, body) = app.send("GET", "/data/diary", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "dear diary");
}

/// Keys are global: claiming a taken key is a conflict, never an overwrite.
#[tokio::test]
async fn attack_key_squatting_does_not_overwrite() {
    let app = TestApp::new();
    let alice = app.user_with_token("alice").await;
    let mallory = app.user_with_token("mallory").await;

    app.send(
        "POST",
        "/data",
        Some(&alice),
        Some(json!({ "key": "config", "value": "alice's" })),
    )
    .await;

    let (status, body) = app
        .send(
            "POST",
            "/data",
            Some(&mallory),
            Some(json!({ "key": "config", "value": "mallory's" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "KEY_EXISTS");

    let (_, body) = app.send("GET", "/data/config", Some(&alice), None).await;
    assert_eq!(body["data"]["value"], "alice's");
}

// =============================================================================
// ATTACK: Replay of superseded or expired tokens
// =============================================================================

/// Logging in again kills the previous token immediately.
#[tokio::test]
async fn attack_superseded_token_rejected() {
    let app = TestApp::new();
    app.register("alice", "correct-horse").await;

    let (_, first) = app.login("alice", "correct-horse").await;
    let (_, second) = app.login("alice", "correct-horse").await;
    let first = first["data"]["access_token"].as_str().unwrap();
    let second = second["data"]["access_token"].as_str().unwrap();
    assert_ne!(first, second);

    let (status, body) = app.send("GET", "/data/k", Some(first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");

    let (status, _) = app.send("GET", "/data/k", Some(second), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// A token is dead the instant its lifetime ends.
#[tokio::test]
async fn attack_expired_token_rejected() {
    let app = TestApp::new();
    let token = app.user_with_token("alice").await;
    app.send(
        "POST",
        "/data",
        Some(&token),
        Some(json!({ "key": "k", "value": "v" })),
    )
    .await;

    app.clock.advance(Duration::seconds(3599));
    let (status, _) = app.send("GET", "/data/k", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::seconds(1));
    let (status, body) = app.send("GET", "/data/k", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");

    // Data survives expiry and is reachable with a new token
    let (_, fresh) = app.login("alice", "correct-horse").await;
    let fresh = fresh["data"]["access_token"].as_str().unwrap();
    let (status, body) = app.send("GET", "/data/k", Some(fresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "v");
}

/// Made-up tokens resolve to nobody.
#[tokio::test]
async fn attack_forged_token_rejected() {
    let app = TestApp::new();
    app.user_with_token("alice").await;

    for forged in ["", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "alice", "null"] {
        let (status, body) = app.send("GET", "/data/k", Some(forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "forged token {:?}", forged);
        assert_eq!(error_code(&body), "INVALID_TOKEN");
    }
}

// =============================================================================
// ATTACK: Secret leakage through responses
// =============================================================================

/// No response ever echoes a password or its digest.
#[tokio::test]
async fn attack_password_never_echoed() {
    let app = TestApp::new();

    let (_, body) = app.register("alice", "correct-horse").await;
    let (_, dup) = app.register("alice", "correct-horse").await;
    let (_, login) = app.login("alice", "wrong-horse").await;

    for response in [body, dup, login] {
        let text = response.to_string();
        assert!(!text.contains("correct-horse"));
        assert!(!text.contains("wrong-horse"));
        assert!(!text.contains("$argon2"));
    }
}
