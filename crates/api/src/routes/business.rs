//! Business registry route handlers.
//!
//! Creation and updates are owner-authenticated; lookup by slug or business
//! code is public. The wire field `businessId` is the printed business code,
//! not the database id; the frontend stores and displays it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use revupage_core::{BusinessCode, BusinessId, Slug};

use crate::db::businesses::{BusinessPatch, NewBusiness};
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::{Business, LinkItem, ReviewItem};
use crate::services::business::BusinessService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Request body for creating a business.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    /// The printed public code, `businessId` on the wire.
    #[serde(rename = "businessId")]
    pub business_code: String,
    pub slug: String,
    #[serde(rename = "businessName")]
    pub name: String,
    pub description: Option<String>,
    pub services: Option<String>,
    pub google_review_link: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub theme_id: Option<String>,
    pub custom_config: Option<serde_json::Value>,
}

/// Request body for updating a business. All fields optional; the slug is
/// immutable once claimed, and is accepted here only so that a change
/// attempt can be rejected with an explicit error instead of being dropped
/// as an unknown field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    pub slug: Option<String>,
    #[serde(rename = "businessId")]
    pub business_code: Option<String>,
    #[serde(rename = "businessName")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub services: Option<String>,
    pub google_review_link: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub theme_id: Option<String>,
    pub custom_config: Option<serde_json::Value>,
    pub links: Option<Vec<LinkItem>>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Full business profile as the frontend consumes it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub id: BusinessId,
    #[serde(rename = "businessId")]
    pub business_code: BusinessCode,
    pub slug: Slug,
    #[serde(rename = "businessName")]
    pub name: String,
    pub description: Option<String>,
    pub services: Option<String>,
    pub google_review_link: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub theme_id: Option<String>,
    pub custom_config: Option<serde_json::Value>,
    pub links: Vec<LinkItem>,
    pub reviews: Vec<ReviewItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Business> for BusinessResponse {
    fn from(business: Business) -> Self {
        Self {
            id: business.id,
            business_code: business.business_code,
            slug: business.slug,
            name: business.name,
            description: business.description,
            services: business.services,
            google_review_link: business.google_review_link,
            logo_url: business.logo_url,
            primary_color: business.primary_color,
            secondary_color: business.secondary_color,
            theme_id: business.theme_id,
            custom_config: business.custom_config,
            links: business.links,
            reviews: business.reviews,
            created_at: business.created_at,
            updated_at: business.updated_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /business/create
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(req): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<BusinessResponse>)> {
    let slug = Slug::parse(&req.slug).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let business_code =
        BusinessCode::parse(&req.business_code).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let new = NewBusiness {
        business_code,
        slug,
        name: req.name,
        description: req.description,
        services: req.services,
        google_review_link: req.google_review_link,
        logo_url: req.logo_url,
        primary_color: req.primary_color,
        secondary_color: req.secondary_color,
        theme_id: req.theme_id,
        custom_config: req.custom_config,
    };

    let service = BusinessService::new(state.pool());
    let business = service.create(user_id, new).await?;

    Ok((StatusCode::CREATED, Json(business.into())))
}

/// PUT /business/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdateBusinessRequest>,
) -> Result<Json<BusinessResponse>> {
    let business_code = req
        .business_code
        .as_deref()
        .map(BusinessCode::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let patch = BusinessPatch {
        business_code,
        name: req.name,
        description: req.description,
        services: req.services,
        google_review_link: req.google_review_link,
        logo_url: req.logo_url,
        primary_color: req.primary_color,
        secondary_color: req.secondary_color,
        theme_id: req.theme_id,
        custom_config: req.custom_config,
        links: req.links,
    };

    let service = BusinessService::new(state.pool());
    let business = service
        .update(BusinessId::new(id), user_id, patch, req.slug.as_deref())
        .await?;

    Ok(Json(business.into()))
}

/// GET /business/me
pub async fn me(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<BusinessResponse>> {
    let service = BusinessService::new(state.pool());
    let business = service.get_by_owner(user_id).await?;

    Ok(Json(business.into()))
}

/// GET /business/{identifier}
///
/// Public profile lookup; the identifier matches a slug or a business code.
pub async fn get(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<BusinessResponse>> {
    let service = BusinessService::new(state.pool());
    let business = service.get_by_identifier(&identifier).await?;

    Ok(Json(business.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_captures_slug() {
        // A slug in the update body must reach the handler so a change
        // attempt can be rejected, not vanish as an unknown field.
        let req: UpdateBusinessRequest = serde_json::from_str(
            r#"{"slug": "new-slug", "businessName": "Acme Coffee"}"#,
        )
        .unwrap();

        assert_eq!(req.slug.as_deref(), Some("new-slug"));
        assert_eq!(req.name.as_deref(), Some("Acme Coffee"));
    }

    #[test]
    fn test_update_request_wire_names() {
        let req: UpdateBusinessRequest = serde_json::from_str(
            r#"{"businessId": "acme1", "googleReviewLink": "https://g.page/r/acme/review"}"#,
        )
        .unwrap();

        assert_eq!(req.business_code.as_deref(), Some("acme1"));
        assert_eq!(
            req.google_review_link.as_deref(),
            Some("https://g.page/r/acme/review")
        );
        assert!(req.slug.is_none());
    }
}
