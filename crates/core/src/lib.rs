//! Delizio Core - Shared types library.
//!
//! This crate provides common types used across all Delizio components:
//! - `storefront` - Cart, pricing, checkout and the JSON storefront server
//! - `cli` - Command-line tools for browsing the menu and order history
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money amounts and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
