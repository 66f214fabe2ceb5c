//! Integration tests for the business registry.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running against it (cargo run -p revupage-api)
//!
//! Run with: cargo test -p revupage-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::json;

use revupage_integration_tests::{
    api_base_url, create_business, register, unique_email, unique_slug,
};

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_non_owner_update_is_unauthorized() {
    let client = Client::new();

    let owner = register(&client, &unique_email("owner")).await;
    let other = register(&client, &unique_email("intruder")).await;

    let slug = unique_slug("owned");
    let business = create_business(
        &client,
        owner["token"].as_str().expect("token"),
        &slug,
        &unique_slug("code"),
    )
    .await;

    // A different authenticated user must not be able to touch it.
    let resp = client
        .put(format!(
            "{}/business/{}",
            api_base_url(),
            business["id"].as_i64().expect("id")
        ))
        .bearer_auth(other["token"].as_str().expect("token"))
        .json(&json!({ "businessName": "Hijacked" }))
        .send()
        .await
        .expect("Failed to call PUT /business/{id}");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_slug_change_is_rejected() {
    let client = Client::new();

    let owner = register(&client, &unique_email("slug-owner")).await;
    let token = owner["token"].as_str().expect("token");

    let slug = unique_slug("fixed");
    let business = create_business(&client, token, &slug, &unique_slug("code")).await;
    let id = business["id"].as_i64().expect("id");

    // Changing the slug is an explicit client error, not a silent no-op.
    let resp = client
        .put(format!("{}/business/{id}", api_base_url()))
        .bearer_auth(token)
        .json(&json!({ "slug": unique_slug("other") }))
        .send()
        .await
        .expect("Failed to call PUT /business/{id}");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Echoing the stored slug back unchanged stays fine.
    let resp = client
        .put(format!("{}/business/{id}", api_base_url()))
        .bearer_auth(token)
        .json(&json!({ "slug": slug, "businessName": "Renamed Coffee" }))
        .send()
        .await
        .expect("Failed to call PUT /business/{id}");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Identifier Lookup
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_lookup_matches_slug_and_business_code() {
    let client = Client::new();

    let owner = register(&client, &unique_email("lookup")).await;
    let slug = unique_slug("findme");
    let code = unique_slug("fc");

    create_business(&client, owner["token"].as_str().expect("token"), &slug, &code).await;

    for identifier in [&slug, &code] {
        let resp = client
            .get(format!("{}/business/{identifier}", api_base_url()))
            .send()
            .await
            .expect("Failed to call GET /business/{identifier}");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = resp.json().await.expect("Failed to parse body");
        assert_eq!(body["slug"].as_str(), Some(slug.as_str()));
        assert_eq!(body["businessId"].as_str(), Some(code.as_str()));
    }

    let resp = client
        .get(format!("{}/business/{}", api_base_url(), unique_slug("nope")))
        .send()
        .await
        .expect("Failed to call GET /business/{identifier}");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Uniqueness
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_second_business_for_same_owner_conflicts() {
    let client = Client::new();

    let owner = register(&client, &unique_email("one-biz")).await;
    let token = owner["token"].as_str().expect("token");

    create_business(&client, token, &unique_slug("first"), &unique_slug("c1")).await;

    let resp = client
        .post(format!("{}/business/create", api_base_url()))
        .bearer_auth(token)
        .json(&json!({
            "businessId": unique_slug("c2"),
            "slug": unique_slug("second"),
            "businessName": "Second Shop",
            "googleReviewLink": "https://g.page/r/second/review",
        }))
        .send()
        .await
        .expect("Failed to call /business/create");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_taken_slug_conflicts() {
    let client = Client::new();

    let first = register(&client, &unique_email("slug-first")).await;
    let second = register(&client, &unique_email("slug-second")).await;

    let slug = unique_slug("contested");
    create_business(
        &client,
        first["token"].as_str().expect("token"),
        &slug,
        &unique_slug("ca"),
    )
    .await;

    let resp = client
        .post(format!("{}/business/create", api_base_url()))
        .bearer_auth(second["token"].as_str().expect("token"))
        .json(&json!({
            "businessId": unique_slug("cb"),
            "slug": slug,
            "businessName": "Copycat",
            "googleReviewLink": "https://g.page/r/copycat/review",
        }))
        .send()
        .await
        .expect("Failed to call /business/create");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
