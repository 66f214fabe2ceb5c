//! Core types for RevuPage.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod business_code;
pub mod email;
pub mod id;
pub mod slug;

pub use business_code::{BusinessCode, BusinessCodeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use slug::{Slug, SlugError};
