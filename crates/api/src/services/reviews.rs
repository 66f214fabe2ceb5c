//! AI-assisted review drafting.
//!
//! Thin client for the text-generation collaborator (Anthropic Messages
//! API). The public review-draft endpoint must never fail because of this
//! service: any fault - unconfigured key, timeout, HTTP error, malformed
//! body - degrades to a static fallback draft so the customer flow is
//! uninterrupted.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReviewAiConfig;
use crate::models::Business;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 300;

/// Outbound request timeout. A slow collaborator is treated the same as a
/// failed one.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the draft collaborator. Internal only; callers of
/// [`ReviewWriter::draft`] always get a usable string back.
#[derive(Debug, Error)]
enum DraftError {
    /// No API key configured.
    #[error("review drafting not configured")]
    Unconfigured,

    /// HTTP transport error or timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    /// Response body had no usable text.
    #[error("empty response")]
    Empty,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Drafts review text for a business's customers.
#[derive(Clone)]
pub struct ReviewWriter {
    client: reqwest::Client,
    model: String,
    configured: bool,
}

impl ReviewWriter {
    /// Create a new review writer.
    ///
    /// With no API key configured the writer still constructs; every draft
    /// request then takes the fallback path.
    #[must_use]
    pub fn new(config: &ReviewAiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        let configured = match &config.api_key {
            Some(key) => match HeaderValue::from_str(key.expose_secret()) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert("x-api-key", value);
                    true
                }
                Err(_) => {
                    tracing::warn!("review AI key contains invalid header characters; disabled");
                    false
                }
            },
            None => false,
        };

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            model: config.model.clone(),
            configured,
        }
    }

    /// Draft a review for a business.
    ///
    /// Never fails: faults are logged and replaced by [`fallback_review`].
    pub async fn draft(&self, business: &Business) -> String {
        match self.request_draft(business).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(slug = %business.slug, error = %e, "Review draft failed, using fallback");
                fallback_review(&business.name)
            }
        }
    }

    async fn request_draft(&self, business: &Business) -> Result<String, DraftError> {
        if !self.configured {
            return Err(DraftError::Unconfigured);
        }

        let prompt = draft_prompt(business);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![RequestMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self.client.post(API_URL).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(DraftError::Status(response.status()));
        }

        let body: MessagesResponse = response.json().await?;
        let text: String = body
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim().to_owned();
        if text.is_empty() {
            return Err(DraftError::Empty);
        }

        Ok(text)
    }
}

/// Build the drafting prompt from the business profile.
fn draft_prompt(business: &Business) -> String {
    let mut prompt = format!(
        "Write a short, natural-sounding customer review for the business \"{}\".",
        business.name
    );

    if let Some(description) = &business.description {
        prompt.push_str(&format!(" About the business: {description}."));
    }

    if let Some(services) = &business.services {
        prompt.push_str(&format!(" Services offered: {services}."));
    }

    prompt.push_str(
        " Keep it to two or three sentences, first person, positive but specific. \
         Reply with the review text only.",
    );

    prompt
}

/// Static fallback returned when drafting fails for any reason.
#[must_use]
pub fn fallback_review(business_name: &str) -> String {
    format!(
        "Had a great experience with {business_name}! Friendly, professional service \
         from start to finish. Would happily recommend them to anyone."
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use revupage_core::{BusinessCode, BusinessId, Slug, UserId};

    fn sample_business() -> Business {
        Business {
            id: BusinessId::new(1),
            owner_id: UserId::new(1),
            business_code: BusinessCode::parse("acme1").unwrap(),
            slug: Slug::parse("acme").unwrap(),
            name: "Acme Coffee".to_string(),
            description: Some("Neighborhood espresso bar".to_string()),
            services: Some("coffee, pastries".to_string()),
            google_review_link: "https://g.page/r/acme/review".to_string(),
            logo_url: None,
            primary_color: None,
            secondary_color: None,
            theme_id: None,
            custom_config: None,
            links: vec![],
            reviews: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_includes_profile_fields() {
        let prompt = draft_prompt(&sample_business());
        assert!(prompt.contains("Acme Coffee"));
        assert!(prompt.contains("Neighborhood espresso bar"));
        assert!(prompt.contains("coffee, pastries"));
    }

    #[test]
    fn test_fallback_mentions_business() {
        let fallback = fallback_review("Acme Coffee");
        assert!(fallback.contains("Acme Coffee"));
    }

    #[tokio::test]
    async fn test_unconfigured_writer_falls_back() {
        let writer = ReviewWriter::new(&ReviewAiConfig {
            api_key: None,
            model: "claude-3-5-haiku-latest".to_string(),
        });

        let draft = writer.draft(&sample_business()).await;
        assert_eq!(draft, fallback_review("Acme Coffee"));
    }
}
