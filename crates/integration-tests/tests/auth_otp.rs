//! Integration tests for the OTP login flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running against it (cargo run -p revupage-api)
//!
//! Run with: cargo test -p revupage-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::json;

use revupage_integration_tests::{
    api_base_url, db_pool, outstanding_codes, register, seed_login_code, unique_email,
};

// ============================================================================
// Code Consumption
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_code_verifies_once_then_never_again() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("consume-once");

    seed_login_code(&pool, &email, "123456").await;

    let verify = |email: String| {
        let client = client.clone();
        async move {
            client
                .post(format!("{}/auth/verify-otp", api_base_url()))
                .json(&json!({ "email": email, "otp": "123456" }))
                .send()
                .await
                .expect("Failed to call /auth/verify-otp")
        }
    };

    // First presentation consumes the code.
    let first = verify(email.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Second presentation of the same pair must fail.
    let second = verify(email.clone()).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    assert_eq!(outstanding_codes(&pool, &email).await, 0);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_code_rejected_and_not_consumed() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("wrong-code");

    seed_login_code(&pool, &email, "123456").await;

    let resp = client
        .post(format!("{}/auth/verify-otp", api_base_url()))
        .json(&json!({ "email": email, "otp": "000000" }))
        .send()
        .await
        .expect("Failed to call /auth/verify-otp");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The real code is still outstanding.
    assert_eq!(outstanding_codes(&pool, &email).await, 1);
}

// ============================================================================
// Send Supersedes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server, database, and SMTP relay"]
async fn test_second_send_invalidates_first_code() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("supersede");

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/auth/send-otp", api_base_url()))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("Failed to call /auth/send-otp");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Only the latest code survives a re-send.
    assert_eq!(outstanding_codes(&pool, &email).await, 1);
}

// ============================================================================
// Login Credential Branches
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_with_neither_credential_is_rejected() {
    let client = Client::new();
    let email = unique_email("no-credential");
    register(&client, &email).await;

    let resp = client
        .post(format!("{}/auth/login", api_base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to call /auth/login");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_otp_login_works_for_passwordless_account() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("otp-login");

    // Registered without a password: the OTP branch must not touch the
    // (absent) hash.
    register(&client, &email).await;
    seed_login_code(&pool, &email, "654321").await;

    let resp = client
        .post(format!("{}/auth/login", api_base_url()))
        .json(&json!({ "email": email, "otp": "654321" }))
        .send()
        .await
        .expect("Failed to call /auth/login");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    assert!(body["token"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_otp_branch_wins_when_both_credentials_sent() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("otp-precedence");

    register(&client, &email).await;
    seed_login_code(&pool, &email, "111222").await;

    // A bogus password alongside a valid code: exactly one branch runs, and
    // it is the code branch, so the login succeeds.
    let resp = client
        .post(format!("{}/auth/login", api_base_url()))
        .json(&json!({ "email": email, "otp": "111222", "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to call /auth/login");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_otp_login_for_unknown_account_is_unauthorized() {
    let client = Client::new();
    let pool = db_pool().await;
    let email = unique_email("no-account");

    // A valid code for an email with no account: the code is consumed but
    // there is no user to log in.
    seed_login_code(&pool, &email, "999000").await;

    let resp = client
        .post(format!("{}/auth/login", api_base_url()))
        .json(&json!({ "email": email, "otp": "999000" }))
        .send()
        .await
        .expect("Failed to call /auth/login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
