//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/send-otp          - Send a login code to an email
//! POST /auth/verify-otp        - Verify (and consume) a login code
//! POST /auth/register          - Register an account, returns a token
//! POST /auth/login             - Log in with password or code
//! GET  /auth/me                - Current user profile (bearer)
//! PUT  /auth/profile           - Update profile (bearer)
//!
//! # Business
//! POST /business/create        - Claim a slug and code (bearer)
//! GET  /business/me            - Caller's business (bearer)
//! PUT  /business/{id}          - Update a business (bearer, owner only)
//! GET  /business/{identifier}  - Public lookup by slug or code
//!
//! # Reviews
//! POST /reviews/generate/{slug} - Draft a review for a business's customer
//! POST /reviews/{slug}          - Record a collected review
//! ```

pub mod auth;
pub mod business;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(auth::send_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
}

/// Create the business routes router.
///
/// Static segments win over the parameterized lookup, so `/business/me` is
/// never swallowed by `/business/{identifier}`.
pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(business::create))
        .route("/me", get(business::me))
        .route("/{identifier}", get(business::get).put(business::update))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/generate/{slug}", post(reviews::generate))
        .route("/{slug}", post(reviews::submit))
}

/// Assemble all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/business", business_routes())
        .nest("/reviews", review_routes())
}
