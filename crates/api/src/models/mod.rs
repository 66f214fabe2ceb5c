//! Domain models for the RevuPage API.

pub mod business;
pub mod user;

pub use business::{Business, LinkItem, ReviewItem};
pub use user::User;
