//! Public review route handlers.
//!
//! Both endpoints sit on a customer's phone mid-flow after scanning a QR
//! code, so they are unauthenticated and keyed by the business's public
//! identifier.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::models::ReviewItem;
use crate::routes::business::BusinessResponse;
use crate::services::business::BusinessService;
use crate::state::AppState;

/// Request body for submitting a collected review.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub text: String,
    pub author: Option<String>,
    pub rating: Option<u8>,
}

/// Response body carrying a drafted review.
#[derive(Debug, Serialize)]
pub struct GenerateReviewResponse {
    pub review: String,
}

/// POST /reviews/generate/{slug}
///
/// Drafting never fails for AI faults; only an unknown business is an error.
pub async fn generate(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GenerateReviewResponse>> {
    let service = BusinessService::new(state.pool());
    let business = service.get_by_identifier(&slug).await?;

    let review = state.reviews().draft(&business).await;

    Ok(Json(GenerateReviewResponse { review }))
}

/// POST /reviews/{slug}
///
/// Records a collected review on the business's public page, newest first.
pub async fn submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<Json<BusinessResponse>> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("review text required".to_owned()));
    }

    if let Some(rating) = req.rating
        && !(1..=5).contains(&rating)
    {
        return Err(ApiError::BadRequest("rating must be 1-5".to_owned()));
    }

    let service = BusinessService::new(state.pool());
    let business = service.get_by_identifier(&slug).await?;

    let review = ReviewItem {
        text: text.to_owned(),
        author: req.author.filter(|a| !a.trim().is_empty()),
        rating: req.rating,
    };

    let business = service.add_review(business.id, review).await?;

    Ok(Json(business.into()))
}
