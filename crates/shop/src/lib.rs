//! Cartwheel Shop library.
//!
//! Catalog, cart, and checkout domain logic for the Cartwheel demo shop.
//!
//! # Architecture
//!
//! - [`models`] - Domain types (products, orders, users)
//! - [`stores`] - Store interfaces and the in-memory implementation
//! - [`services`] - Cart ledger, checkout, catalog paging, registration
//! - [`sessions`] - Session-keyed registry of active cart ledgers
//! - [`config`] - Environment-variable configuration
//!
//! The presentation layer (routing, templates, authentication) is not part
//! of this crate; callers drive the services directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
pub mod services;
pub mod sessions;
pub mod stores;
