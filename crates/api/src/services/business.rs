//! Slug / business registry.
//!
//! Enforces uniqueness of the two public identifiers (slug and business
//! code) and the one-business-per-owner rule, and guards updates behind an
//! ownership check. Application-level existence checks produce the friendly
//! error messages; the storage-layer unique indexes remain the authoritative
//! uniqueness signal under concurrency, and their violations surface as the
//! same conflict class.

use sqlx::PgPool;
use thiserror::Error;

use revupage_core::{BusinessId, UserId};

use crate::db::businesses::{BusinessPatch, NewBusiness};
use crate::db::{BusinessRepository, RepositoryError};
use crate::models::{Business, ReviewItem};

/// Errors from business registry operations.
#[derive(Debug, Error)]
pub enum BusinessError {
    /// The slug is already claimed by another business.
    #[error("slug already taken")]
    SlugTaken,

    /// The business code is already claimed by another business.
    #[error("business code already taken")]
    CodeTaken,

    /// The owner already has a business (one per owner).
    #[error("user already has a business")]
    OwnerHasBusiness,

    /// No business matches the identifier.
    #[error("business not found")]
    NotFound,

    /// The caller is not the stored owner.
    #[error("not the business owner")]
    NotOwner,

    /// An update tried to change the slug, which is fixed once claimed.
    #[error("slug cannot be changed")]
    SlugImmutable,

    /// The Google review link is not a valid URL.
    #[error("invalid Google review link")]
    InvalidReviewLink,

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Business registry service.
pub struct BusinessService<'a> {
    businesses: BusinessRepository<'a>,
}

impl<'a> BusinessService<'a> {
    /// Create a new business service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            businesses: BusinessRepository::new(pool),
        }
    }

    /// Create a business for `owner_id`, claiming its slug and code.
    ///
    /// Links and reviews start empty. The existence pre-checks give precise
    /// errors in the common case; a concurrent claim that slips past them is
    /// still caught by the unique index and reported as the same conflict.
    ///
    /// # Errors
    ///
    /// Returns `BusinessError::SlugTaken`, `CodeTaken`, or
    /// `OwnerHasBusiness` on a uniqueness conflict, and
    /// `InvalidReviewLink` if the review link doesn't parse as a URL.
    pub async fn create(
        &self,
        owner_id: UserId,
        new: NewBusiness,
    ) -> Result<Business, BusinessError> {
        validate_review_link(&new.google_review_link)?;

        if self.businesses.slug_taken(&new.slug).await? {
            return Err(BusinessError::SlugTaken);
        }

        if self.businesses.code_taken(&new.business_code, None).await? {
            return Err(BusinessError::CodeTaken);
        }

        let business = self
            .businesses
            .create(owner_id, &new)
            .await
            .map_err(map_conflict)?;

        tracing::info!(business_id = %business.id, slug = %business.slug, "Business created");
        Ok(business)
    }

    /// Apply an owner-authenticated partial update.
    ///
    /// The slug is immutable once claimed (it is the printed public URL).
    /// A request may echo the stored slug back unchanged; any other value is
    /// rejected rather than silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `BusinessError::NotFound` if the business doesn't exist,
    /// `NotOwner` if the caller doesn't own it, `SlugImmutable` if the
    /// request tries to change the slug, and `CodeTaken` if a changed
    /// business code collides with another business.
    pub async fn update(
        &self,
        id: BusinessId,
        caller: UserId,
        patch: BusinessPatch,
        requested_slug: Option<&str>,
    ) -> Result<Business, BusinessError> {
        let existing = self
            .businesses
            .get_by_id(id)
            .await?
            .ok_or(BusinessError::NotFound)?;

        if existing.owner_id != caller {
            return Err(BusinessError::NotOwner);
        }

        if let Some(slug) = requested_slug
            && slug != existing.slug.as_str()
        {
            return Err(BusinessError::SlugImmutable);
        }

        if let Some(link) = &patch.google_review_link {
            validate_review_link(link)?;
        }

        if let Some(code) = &patch.business_code
            && *code != existing.business_code
            && self.businesses.code_taken(code, Some(id)).await?
        {
            return Err(BusinessError::CodeTaken);
        }

        let business = self
            .businesses
            .update(id, &patch)
            .await
            .map_err(map_conflict)?;

        Ok(business)
    }

    /// Public lookup by slug or business code.
    ///
    /// # Errors
    ///
    /// Returns `BusinessError::NotFound` if neither identifier matches.
    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Business, BusinessError> {
        self.businesses
            .get_by_identifier(identifier)
            .await?
            .ok_or(BusinessError::NotFound)
    }

    /// Get the caller's own business.
    ///
    /// `NotFound` here is the frontend's onboarding probe: an account with no
    /// business is a valid state, not an error condition worth logging.
    ///
    /// # Errors
    ///
    /// Returns `BusinessError::NotFound` if the owner has no business yet.
    pub async fn get_by_owner(&self, owner_id: UserId) -> Result<Business, BusinessError> {
        self.businesses
            .get_by_owner(owner_id)
            .await?
            .ok_or(BusinessError::NotFound)
    }

    /// Record a collected review on a business's public page, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BusinessError::NotFound` if the business doesn't exist.
    pub async fn add_review(
        &self,
        id: BusinessId,
        review: ReviewItem,
    ) -> Result<Business, BusinessError> {
        self.businesses
            .prepend_review(id, &review)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => BusinessError::NotFound,
                other => BusinessError::Repository(other),
            })
    }
}

/// Map repository conflicts (unique-index violations) to the specific
/// registry error, keyed on the message chosen from the constraint name.
fn map_conflict(e: RepositoryError) -> BusinessError {
    match e {
        RepositoryError::Conflict(msg) if msg.contains("slug") => BusinessError::SlugTaken,
        RepositoryError::Conflict(msg) if msg.contains("code") => BusinessError::CodeTaken,
        RepositoryError::Conflict(_) => BusinessError::OwnerHasBusiness,
        RepositoryError::NotFound => BusinessError::NotFound,
        other => BusinessError::Repository(other),
    }
}

/// The review link must at least parse as an absolute URL; everything else
/// about it is the business owner's responsibility.
fn validate_review_link(link: &str) -> Result<(), BusinessError> {
    url::Url::parse(link).map_err(|_| BusinessError::InvalidReviewLink)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_review_link() {
        assert!(validate_review_link("https://g.page/r/abc/review").is_ok());
        assert!(validate_review_link("not a url").is_err());
        assert!(validate_review_link("").is_err());
    }

    #[test]
    fn test_map_conflict_distinguishes_constraints() {
        let slug = map_conflict(RepositoryError::Conflict("slug already taken".to_owned()));
        assert!(matches!(slug, BusinessError::SlugTaken));

        let code = map_conflict(RepositoryError::Conflict(
            "business code already taken".to_owned(),
        ));
        assert!(matches!(code, BusinessError::CodeTaken));

        let owner = map_conflict(RepositoryError::Conflict(
            "user already has a business".to_owned(),
        ));
        assert!(matches!(owner, BusinessError::OwnerHasBusiness));
    }
}
