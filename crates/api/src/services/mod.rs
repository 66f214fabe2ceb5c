//! Business-logic services.
//!
//! Each service owns one concern and is constructed once at startup (or per
//! request, for the cheap repository-backed ones) with its dependencies
//! injected. Services never read the process environment.

pub mod auth;
pub mod business;
pub mod email;
pub mod password;
pub mod reviews;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use business::{BusinessError, BusinessService};
pub use email::{EmailError, EmailService};
pub use reviews::ReviewWriter;
pub use token::{TokenError, TokenService};
