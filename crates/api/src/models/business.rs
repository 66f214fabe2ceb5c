//! Business profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use revupage_core::{BusinessCode, BusinessId, Slug, UserId};

/// A business's public profile page.
///
/// Reachable by either of two independently-unique identifiers: the URL
/// [`Slug`] and the printed [`BusinessCode`]. Owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Business {
    /// Database identifier.
    pub id: BusinessId,
    /// Owning user. One business per owner, enforced by a unique index.
    pub owner_id: UserId,
    /// Public short identifier (QR codes, printed material).
    pub business_code: BusinessCode,
    /// Public URL path segment.
    pub slug: Slug,
    /// Display name.
    pub name: String,
    /// Free-text description shown on the public page.
    pub description: Option<String>,
    /// Free-text list of offered services, used to prompt review drafts.
    pub services: Option<String>,
    /// Where customers are sent to leave a Google review.
    pub google_review_link: String,
    /// Hosted logo image URL.
    pub logo_url: Option<String>,
    /// Theme primary color (CSS value).
    pub primary_color: Option<String>,
    /// Theme secondary color (CSS value).
    pub secondary_color: Option<String>,
    /// Preset theme identifier.
    pub theme_id: Option<String>,
    /// Free-form theme overrides merged client-side.
    pub custom_config: Option<serde_json::Value>,
    /// Ordered list of profile links.
    pub links: Vec<LinkItem>,
    /// Collected reviews, newest first.
    pub reviews: Vec<ReviewItem>,
    /// When the business was created.
    pub created_at: DateTime<Utc>,
    /// When the business was last modified.
    pub updated_at: DateTime<Utc>,
}

/// A single entry in a business's ordered link list.
///
/// Stored as JSONB in the shape the frontend renders, so the serde names
/// here are the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    /// Link kind (e.g. "website", "instagram", "custom").
    #[serde(rename = "type")]
    pub kind: String,
    /// Destination URL.
    pub url: String,
    /// Display label.
    pub label: String,
    /// Whether the link is currently shown on the public page.
    pub is_active: bool,
}

/// A collected customer review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Review body text.
    pub text: String,
    /// Reviewer name, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Star rating 1-5, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_link_item_wire_format() {
        let link = LinkItem {
            kind: "instagram".to_string(),
            url: "https://instagram.com/acme".to_string(),
            label: "Follow us".to_string(),
            is_active: true,
        };

        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "instagram");
        assert_eq!(json["isActive"], true);

        let back: LinkItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_review_item_optional_fields_omitted() {
        let review = ReviewItem {
            text: "Great service".to_string(),
            author: None,
            rating: None,
        };

        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("author").is_none());
        assert!(json.get("rating").is_none());
    }
}
