//! Delizio Storefront library.
//!
//! The cart, pricing and checkout engine behind the restaurant storefront,
//! plus the JSON HTTP layer that serves it. The engine modules
//! ([`cart`], [`pricing`], [`checkout`], [`session`]) have no HTTP
//! dependencies and can be driven directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod pricing;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod tracking;
