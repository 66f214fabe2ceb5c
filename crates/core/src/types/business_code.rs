//! Public business code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`BusinessCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum BusinessCodeError {
    /// The input is shorter than the minimum length.
    #[error("business code must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("business code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("business code may only contain letters, digits, hyphens, and underscores")]
    InvalidCharacter,
}

/// A second, independently-unique public identifier for a business.
///
/// Functionally overlapping with [`crate::Slug`] - public lookups accept
/// either - but less restrictive: codes are case-preserving and allow
/// underscores, since they show up on printed material and QR codes rather
/// than in URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BusinessCode(String);

impl BusinessCode {
    /// Minimum code length.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum code length.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `BusinessCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is outside the length bounds or contains
    /// a character other than `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, BusinessCodeError> {
        if s.len() < Self::MIN_LENGTH {
            return Err(BusinessCodeError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(BusinessCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(BusinessCodeError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `BusinessCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BusinessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BusinessCode {
    type Err = BusinessCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for BusinessCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BusinessCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BusinessCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BusinessCode {
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
    fn test_parse_valid_codes() {
        assert!(BusinessCode::parse("acme1").is_ok());
        assert!(BusinessCode::parse("Acme_Coffee-2").is_ok());
    }

    #[test]
    fn test_parse_length_bounds() {
        assert!(matches!(
            BusinessCode::parse("a"),
            Err(BusinessCodeError::TooShort { .. })
        ));
        let long = "a".repeat(33);
        assert!(matches!(
            BusinessCode::parse(&long),
            Err(BusinessCodeError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_symbols() {
        assert!(matches!(
            BusinessCode::parse("acme!"),
            Err(BusinessCodeError::InvalidCharacter)
        ));
        assert!(matches!(
            BusinessCode::parse("ac me"),
            Err(BusinessCodeError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let code = BusinessCode::parse("acme1").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"acme1\"");
        let parsed: BusinessCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }
}
