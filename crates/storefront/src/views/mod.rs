//! Cart views.
//!
//! Each view subscribes to the [`CartStore`] and repaints its own regions of
//! the [`Document`] whenever the cart changes:
//!
//! - [`CountBadge`] - total units in every badge
//! - [`MiniCart`] - compact item list for the navigation dropdown
//! - [`CartPage`] - full cart / checkout page with totals
//!
//! Views never call back into the store. Their markup carries
//! `data-cart-action` attributes that [`crate::bindings`] maps to actions.

mod badge;
mod cart_page;
mod document;
mod mini_cart;

pub use badge::CountBadge;
pub use cart_page::{CartPage, FREE_SHIPPING_LABEL, FREE_SHIPPING_CLASS};
pub use document::{Document, Element, Region};
pub use mini_cart::MiniCart;

use storecart_core::Quantity;

use crate::cart::LineItem;
use crate::store::{CartSnapshot, CartStore};

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u8,
    pub price: String,
    pub line_price: String,
    /// Quantity the stepper's minus button requests.
    pub decrement_to: i64,
    /// Quantity the stepper's plus button requests.
    pub increment_to: i64,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
    pub free_shipping: bool,
    pub subtotal_is_zero: bool,
}

impl CartView {
    /// Whether there are no items to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let quantity = i64::from(item.quantity.get());
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image_ref.clone(),
            quantity: item.quantity.get(),
            price: item.unit_price.to_string(),
            line_price: item.line_total().to_string(),
            decrement_to: quantity - 1,
            increment_to: quantity + 1,
        }
    }
}

impl From<&CartSnapshot<'_>> for CartView {
    fn from(snapshot: &CartSnapshot<'_>) -> Self {
        Self {
            items: snapshot.items.iter().map(CartItemView::from).collect(),
            subtotal: snapshot.subtotal.to_string(),
            shipping: snapshot.shipping_fee.to_string(),
            total: snapshot.total.to_string(),
            item_count: snapshot.item_count,
            free_shipping: snapshot.free_shipping,
            subtotal_is_zero: snapshot.subtotal.is_zero(),
        }
    }
}

/// Bounds for quantity inputs in markup.
pub(crate) const QUANTITY_MIN: u8 = Quantity::MIN.get();
pub(crate) const QUANTITY_MAX: u8 = Quantity::MAX.get();

/// Render a template, logging and returning `None` on failure.
pub(crate) fn render<T: askama::Template>(template: &T) -> Option<String> {
    match template.render() {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::warn!(error = %e, "failed to render cart fragment");
            None
        }
    }
}

/// Subscribe all three views to `store`, painting into `document`.
pub fn mount_all(store: &mut CartStore, document: &Document) {
    store.subscribe(CountBadge::new(document.clone()));
    store.subscribe(MiniCart::new(document.clone()));
    store.subscribe(CartPage::new(document.clone()));
}
