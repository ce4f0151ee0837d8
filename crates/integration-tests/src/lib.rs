//! Integration tests for storecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Store, shipping, views and bindings working together
//! - `cart_persistence` - Reloading carts from the file-backed slot
//!
//! Shared fixtures live here.

use std::path::PathBuf;

use storecart_core::Price;
use storecart_storefront::Product;
use storecart_storefront::views::Region;

/// Every cart region, one instance each.
pub const FULL_PAGE: [Region; 10] = [
    Region::CartBadge,
    Region::MiniCartItems,
    Region::MiniCartSubtotal,
    Region::CartItems,
    Region::EmptyCartMessage,
    Region::CheckoutButton,
    Region::Subtotal,
    Region::ShippingFee,
    Region::Total,
    Region::PlaceOrderButton,
];

/// A product with a generated name and no image.
#[must_use]
pub fn product(id: &str, price: u32) -> Product {
    Product::new(id, format!("Product {id}"), Price::from_units(price), "")
}

/// A fresh directory path under the system temp dir. Not created.
#[must_use]
pub fn temp_storage_dir() -> PathBuf {
    std::env::temp_dir().join(format!("storecart-it-{}", uuid::Uuid::new_v4()))
}
