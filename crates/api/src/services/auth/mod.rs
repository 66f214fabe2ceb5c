//! Authentication service.
//!
//! Orchestrates registration, login (password or one-time code), and profile
//! reads/updates. Password hashing, token signing, code storage, and mail
//! dispatch each live in their own module; this service only sequences them.

mod error;

pub use error::AuthError;

use chrono::{Duration, Utc};
use sqlx::PgPool;

use revupage_core::{Email, UserId};

use crate::db::{PasscodeRepository, RepositoryError, UserRepository};
use crate::models::User;
use crate::services::email::{EmailService, generate_login_code};
use crate::services::password;
use crate::services::token::TokenService;

/// How long a login code stays valid after it is sent.
const CODE_VALIDITY_MINUTES: i64 = 5;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    passcodes: PasscodeRepository<'a>,
    tokens: &'a TokenService,
    email: &'a EmailService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService, email: &'a EmailService) -> Self {
        Self {
            users: UserRepository::new(pool),
            passcodes: PasscodeRepository::new(pool),
            tokens,
            email,
        }
    }

    /// Issue and dispatch a fresh login code for an email.
    ///
    /// All previously outstanding codes for the email are invalidated first.
    /// The recipient does not need an existing account: the code is bound to
    /// the email only, and registration may follow verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::Email` or `AuthError::Repository` if the code
    /// cannot be stored or dispatched.
    pub async fn send_login_code(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        let code = generate_login_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_VALIDITY_MINUTES);

        self.passcodes.replace(&email, &code, expires_at).await?;
        self.email.send_login_code(&email, &code).await?;

        tracing::info!(email = %email, "Login code sent");
        Ok(())
    }

    /// Verify and consume a login code without logging in.
    ///
    /// Used by the pre-registration email check. The code is consumed on
    /// success; a second call with the same pair fails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCode` if no matching unexpired code exists
    /// (wrong, expired, and already-used are indistinguishable).
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        if self.passcodes.consume(&email, code).await? {
            Ok(())
        } else {
            Err(AuthError::InvalidCode)
        }
    }

    /// Register a new account and issue a session token.
    ///
    /// The password is optional; without one the account is OTP-only until a
    /// password is later set. No business profile is created here - a
    /// registered user with no business is a valid intermediate state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is registered.
    /// Returns `AuthError::WeakPassword` if a too-short password is given.
    pub async fn register(
        &self,
        email: &str,
        name: Option<&str>,
        password: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let password_hash = match password {
            Some(password) => {
                password::validate(password).map_err(|_| AuthError::WeakPassword)?;
                Some(password::hash(password).map_err(|_| AuthError::PasswordHash)?)
            }
            None => None,
        };

        let user = self
            .users
            .create(&email, name, phone_number, password_hash.as_deref())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok((user, token))
    }

    /// Log in with exactly one credential: a password or a one-time code.
    ///
    /// The code branch never touches the password hash, so OTP login works
    /// for accounts that have no password at all.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredential` if neither credential is given.
    /// Returns `AuthError::InvalidCode`, `AuthError::UserNotFound`, or
    /// `AuthError::InvalidCredentials` for the respective failed checks.
    pub async fn login(
        &self,
        email: &str,
        password: Option<&str>,
        otp: Option<&str>,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = if let Some(code) = otp {
            self.login_with_code(&email, code).await?
        } else if let Some(password) = password {
            self.login_with_password(&email, password).await?
        } else {
            return Err(AuthError::MissingCredential);
        };

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    async fn login_with_code(&self, email: &Email, code: &str) -> Result<User, AuthError> {
        if !self.passcodes.consume(email, code).await? {
            return Err(AuthError::InvalidCode);
        }

        self.users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn login_with_password(&self, email: &Email, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // An account with no password set cannot log in with one.
        let password_hash = password_hash.ok_or(AuthError::InvalidCredentials)?;

        password::verify(password, &password_hash).map_err(|_| AuthError::InvalidCredentials)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update a user's profile (name and phone number only).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, AuthError> {
        self.users
            .update_profile(user_id, name, phone_number)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}
