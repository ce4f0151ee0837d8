//! storecart core - Shared domain types.
//!
//! This crate provides the value types used across all storecart components:
//! - `storefront` - Cart state, persistence, shipping and views
//! - `cli` - Command-line driver over a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
