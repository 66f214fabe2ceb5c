//! Business repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use revupage_core::{BusinessCode, BusinessId, Slug, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Business, LinkItem, ReviewItem};

const BUSINESS_COLUMNS: &str = "id, owner_id, business_code, slug, name, description, services, \
     google_review_link, logo_url, primary_color, secondary_color, theme_id, custom_config, \
     links, reviews, created_at, updated_at";

/// Fields for creating a new business.
///
/// Links and reviews are always initialized empty; they are populated through
/// later updates and collected reviews respectively.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub business_code: BusinessCode,
    pub slug: Slug,
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

/// Partial update of a business profile.
///
/// Every field is optional; `None` leaves the stored value untouched. The
/// slug is immutable once claimed (it is the printed public URL), and the
/// owner and collected reviews are never writable through a patch.
#[derive(Debug, Clone, Default)]
pub struct BusinessPatch {
    pub business_code: Option<BusinessCode>,
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

/// Repository for business database operations.
pub struct BusinessRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BusinessRepository<'a> {
    /// Create a new business repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a business owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or business code is
    /// already taken, or if the owner already has a business (one per owner).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner_id: UserId,
        new: &NewBusiness,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO businesses
                 (owner_id, business_code, slug, name, description, services,
                  google_review_link, logo_url, primary_color, secondary_color,
                  theme_id, custom_config)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {BUSINESS_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(&new.business_code)
        .bind(&new.slug)
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.services.as_deref())
        .bind(&new.google_review_link)
        .bind(new.logo_url.as_deref())
        .bind(new.primary_color.as_deref())
        .bind(new.secondary_color.as_deref())
        .bind(new.theme_id.as_deref())
        .bind(new.custom_config.as_ref().map(Json))
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, describe_business_conflict))?;

        business_from_row(&row)
    }

    /// Look up a business by public identifier: slug or business code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE slug = $1 OR business_code = $1"
        ))
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(business_from_row).transpose()
    }

    /// Look up a business by its database ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(business_from_row).transpose()
    }

    /// Look up the business owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(business_from_row).transpose()
    }

    /// Check whether a slug is already claimed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_taken(&self, slug: &Slug) -> Result<bool, RepositoryError> {
        let taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM businesses WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool)
                .await?;
        Ok(taken)
    }

    /// Check whether a business code is claimed by any business other than
    /// `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn code_taken(
        &self,
        code: &BusinessCode,
        exclude: Option<BusinessId>,
    ) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM businesses WHERE business_code = $1 AND id <> COALESCE($2, -1))",
        )
        .bind(code)
        .bind(exclude)
        .fetch_one(self.pool)
        .await?;
        Ok(taken)
    }

    /// Apply a partial update to a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business doesn't exist.
    /// Returns `RepositoryError::Conflict` if a changed business code is
    /// already taken. Returns `RepositoryError::Database` for other errors.
    pub async fn update(
        &self,
        id: BusinessId,
        patch: &BusinessPatch,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE businesses
             SET business_code = COALESCE($2, business_code),
                 name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 services = COALESCE($5, services),
                 google_review_link = COALESCE($6, google_review_link),
                 logo_url = COALESCE($7, logo_url),
                 primary_color = COALESCE($8, primary_color),
                 secondary_color = COALESCE($9, secondary_color),
                 theme_id = COALESCE($10, theme_id),
                 custom_config = COALESCE($11, custom_config),
                 links = COALESCE($12, links),
                 updated_at = now()
             WHERE id = $1
             RETURNING {BUSINESS_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.business_code.as_ref())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.services.as_deref())
        .bind(patch.google_review_link.as_deref())
        .bind(patch.logo_url.as_deref())
        .bind(patch.primary_color.as_deref())
        .bind(patch.secondary_color.as_deref())
        .bind(patch.theme_id.as_deref())
        .bind(patch.custom_config.as_ref().map(Json))
        .bind(patch.links.as_ref().map(Json))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, describe_business_conflict))?
        .ok_or(RepositoryError::NotFound)?;

        business_from_row(&row)
    }

    /// Prepend a collected review to a business's review list (newest first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn prepend_review(
        &self,
        id: BusinessId,
        review: &ReviewItem,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE businesses
             SET reviews = $2 || reviews, updated_at = now()
             WHERE id = $1
             RETURNING {BUSINESS_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(std::slice::from_ref(review)))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        business_from_row(&row)
    }
}

/// Map a unique-constraint name to a client-facing conflict message.
fn describe_business_conflict(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.contains("slug") => "slug already taken".to_owned(),
        Some(name) if name.contains("business_code") => "business code already taken".to_owned(),
        Some(name) if name.contains("owner") => "user already has a business".to_owned(),
        _ => "business already exists".to_owned(),
    }
}

/// Map a `businesses` row to the domain model.
fn business_from_row(row: &PgRow) -> Result<Business, RepositoryError> {
    let links: Json<Vec<LinkItem>> = row.try_get("links")?;
    let reviews: Json<Vec<ReviewItem>> = row.try_get("reviews")?;
    let custom_config: Option<Json<serde_json::Value>> = row.try_get("custom_config")?;

    Ok(Business {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        business_code: row.try_get("business_code")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        services: row.try_get("services")?,
        google_review_link: row.try_get("google_review_link")?,
        logo_url: row.try_get("logo_url")?,
        primary_color: row.try_get("primary_color")?,
        secondary_color: row.try_get("secondary_color")?,
        theme_id: row.try_get("theme_id")?,
        custom_config: custom_config.map(|c| c.0),
        links: links.0,
        reviews: reviews.0,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
