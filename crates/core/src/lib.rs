//! RevuPage Core - Shared types library.
//!
//! This crate provides the common domain types used by the RevuPage API
//! server and any future tooling built on top of it.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, slugs, and
//!   business codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
