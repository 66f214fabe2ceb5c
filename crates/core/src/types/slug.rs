//! URL slug type for public business pages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SlugError {
    /// The input is shorter than the minimum length.
    #[error("slug must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen, or contains a double hyphen.
    #[error("slug may not start or end with a hyphen or contain '--'")]
    BadHyphenPlacement,
}

/// A unique, human-readable path segment identifying a business's public page.
///
/// Slugs appear directly in customer-facing URLs (`revupage.io/{slug}`), so
/// they are restricted to lowercase ASCII letters, digits, and single interior
/// hyphens.
///
/// ```
/// use revupage_core::Slug;
///
/// assert!(Slug::parse("acme-coffee").is_ok());
/// assert!(Slug::parse("Acme").is_err());       // uppercase
/// assert!(Slug::parse("-acme").is_err());      // leading hyphen
/// assert!(Slug::parse("ac--me").is_err());     // double hyphen
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Minimum slug length.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum slug length (fits a DNS label, plenty for a URL segment).
    pub const MAX_LENGTH: usize = 63;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is outside the length bounds, contains a
    /// character other than `[a-z0-9-]`, or has a leading, trailing, or
    /// doubled hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(SlugError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::BadHyphenPlacement);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("acme").is_ok());
        assert!(Slug::parse("acme-coffee-2").is_ok());
        assert!(Slug::parse("a1").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(Slug::parse("a"), Err(SlugError::TooShort { .. })));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Slug::parse(&long),
            Err(SlugError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_symbols() {
        assert!(matches!(
            Slug::parse("Acme"),
            Err(SlugError::InvalidCharacter)
        ));
        assert!(matches!(
            Slug::parse("acme_co"),
            Err(SlugError::InvalidCharacter)
        ));
        assert!(matches!(
            Slug::parse("acme co"),
            Err(SlugError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_hyphen_placement() {
        assert!(matches!(
            Slug::parse("-acme"),
            Err(SlugError::BadHyphenPlacement)
        ));
        assert!(matches!(
            Slug::parse("acme-"),
            Err(SlugError::BadHyphenPlacement)
        ));
        assert!(matches!(
            Slug::parse("ac--me"),
            Err(SlugError::BadHyphenPlacement)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let slug = Slug::parse("acme-coffee").unwrap();
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"acme-coffee\"");
        let parsed: Slug = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slug);
    }
}
