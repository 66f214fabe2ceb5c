//! Bearer session tokens.
//!
//! Signed HS256 JWTs carrying the user id as subject, with a fixed 30-day
//! validity. There is no refresh or server-side revocation: logout is
//! client-side token deletion.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use revupage_core::UserId;

/// Token issuer claim.
const ISSUER: &str = "revupage";

/// Fixed session validity.
const VALIDITY_DAYS: i64 = 30;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token")]
    Sign,

    /// The token is malformed, has a bad signature, or is expired.
    #[error("invalid or expired token")]
    Invalid,
}

/// Claims carried in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Issuer.
    iss: String,
    /// Issued-at timestamp.
    iat: i64,
    /// Expiration timestamp.
    exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a session token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if signing fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: ISSUER.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::days(VALIDITY_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| TokenError::Sign)
    }

    /// Verify a session token and return the user id it asserts.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the signature, issuer, expiry, or
    /// subject is bad.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let id: i32 = data.claims.sub.parse().map_err(|_| TokenError::Invalid)?;
        Ok(UserId::new(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = service("test-signing-secret-0123456789ab");
        let token = tokens.issue(UserId::new(7)).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), UserId::new(7));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let tokens = service("test-signing-secret-0123456789ab");
        assert!(matches!(
            tokens.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let a = service("signing-secret-a-0123456789abcdef");
        let b = service("signing-secret-b-0123456789abcdef");

        let token = a.issue(UserId::new(1)).unwrap();
        assert!(b.verify(&token).is_err());
    }

    #[test]
    fn test_thirty_day_validity() {
        let tokens = service("test-signing-secret-0123456789ab");
        let token = tokens.issue(UserId::new(1)).unwrap();

        // Decode without the service to inspect the expiry claim.
        let mut validation = Validation::default();
        validation.set_issuer(&["revupage"]);
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-signing-secret-0123456789ab"),
            &validation,
        )
        .unwrap();

        let lifetime = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime, 30 * 24 * 3600);
    }
}
