//! Integration test support for RevuPage.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the API server
//! export REVUPAGE_DATABASE_URL=postgres://localhost/revupage
//! cargo run -p revupage-api &
//!
//! # Run integration tests (ignored by default)
//! API_BASE_URL=http://localhost:3000 \
//!     cargo test -p revupage-integration-tests -- --ignored
//! ```
//!
//! Tests talk to the API over HTTP and to the same `PostgreSQL` database
//! directly, because the OTP flow's only out-of-band channel is email: the
//! tests seed and inspect `one_time_passcodes` rows instead of reading an
//! inbox.

use rand::Rng;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the database the server under test is using.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails; these
/// tests cannot run without one.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("REVUPAGE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("REVUPAGE_DATABASE_URL or DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// A fresh email address per test run, so tests never collide with earlier
/// runs against the same database.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nonce: u64 = rand::rng().random();
    format!("{prefix}-{nonce:016x}@integration.revupage.test")
}

/// A fresh slug per test run.
#[must_use]
pub fn unique_slug(prefix: &str) -> String {
    let nonce: u32 = rand::rng().random();
    format!("{prefix}-{nonce:08x}")
}

/// Register an account through the API and return the response body
/// (`id`, `name`, `email`, `token`).
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn register(client: &reqwest::Client, email: &str) -> serde_json::Value {
    let resp = client
        .post(format!("{}/auth/register", api_base_url()))
        .json(&serde_json::json!({ "email": email, "name": "Test Owner" }))
        .send()
        .await
        .expect("Failed to call /auth/register");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse register response")
}

/// Seed a login code for an email directly in the database, valid for five
/// minutes. Mirrors what a send does, minus the SMTP dispatch.
///
/// # Panics
///
/// Panics if the insert fails.
pub async fn seed_login_code(pool: &PgPool, email: &str, code: &str) {
    sqlx::query(
        "INSERT INTO one_time_passcodes (email, code, expires_at)
         VALUES ($1, $2, now() + interval '5 minutes')",
    )
    .bind(email)
    .bind(code)
    .execute(pool)
    .await
    .expect("Failed to seed login code");
}

/// Count outstanding (unexpired) codes for an email.
///
/// # Panics
///
/// Panics if the query fails.
pub async fn outstanding_codes(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT count(*) FROM one_time_passcodes WHERE email = $1 AND expires_at > now()",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("Failed to count login codes")
}

/// Create a business through the API for the given bearer token and return
/// the response body.
///
/// # Panics
///
/// Panics if the request fails or creation is rejected.
pub async fn create_business(
    client: &reqwest::Client,
    token: &str,
    slug: &str,
    business_code: &str,
) -> serde_json::Value {
    let resp = client
        .post(format!("{}/business/create", api_base_url()))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "businessId": business_code,
            "slug": slug,
            "businessName": "Integration Coffee",
            "googleReviewLink": "https://g.page/r/integration/review",
        }))
        .send()
        .await
        .expect("Failed to call /business/create");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse business response")
}
