//! CLI command implementations.

pub mod menu;
pub mod orders;
pub mod quote;
