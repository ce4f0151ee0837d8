//! Core types for storecart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::{CURRENCY_PREFIX, Price, PriceError};
pub use quantity::Quantity;
