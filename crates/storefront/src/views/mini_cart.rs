//! Compact cart dropdown.

use askama::Template;

use super::{CartItemView, CartView, Document, Region, render};
use crate::store::{CartObserver, CartSnapshot};

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"{% if items.is_empty() %}<div class="text-center py-4 text-muted empty-cart-message"><p class="mb-0">Your cart is empty</p><small>Go find something you like!</small></div>{% else %}{% for item in items %}<div class="cart-item" data-product-id="{{ item.id }}"><img src="{{ item.image }}" alt="{{ item.name }}" class="cart-item-image me-3"><div class="flex-grow-1"><h6 class="mb-0">{{ item.name }}</h6><small class="text-muted me-2">Qty: {{ item.quantity }}</small><span class="line-total">{{ item.line_price }}</span></div><button type="button" class="btn btn-sm text-danger" data-cart-action="remove" data-product-id="{{ item.id }}">Remove</button></div>{% endfor %}{% endif %}"#
)]
struct MiniCartTemplate {
    items: Vec<CartItemView>,
}

/// Compact item list with its own subtotal line.
#[derive(Debug, Clone)]
pub struct MiniCart {
    document: Document,
}

impl MiniCart {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }
}

impl CartObserver for MiniCart {
    fn on_cart_changed(&mut self, snapshot: &CartSnapshot<'_>) {
        if !self.document.contains(Region::MiniCartItems) {
            return;
        }
        let CartView {
            items, subtotal, ..
        } = CartView::from(snapshot);

        if let Some(html) = render(&MiniCartTemplate { items }) {
            self.document.set_content(Region::MiniCartItems, &html);
        }
        self.document.set_content(Region::MiniCartSubtotal, &subtotal);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storecart_core::{Price, ProductId};

    use super::*;
    use crate::cart::Product;
    use crate::store::CartStore;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_empty_state() {
        let document = Document::with_regions([Region::MiniCartItems, Region::MiniCartSubtotal]);
        let mut store = CartStore::open(MemoryStorage::new());
        store.subscribe(MiniCart::new(document.clone()));

        let items = document.first(Region::MiniCartItems).unwrap();
        assert!(items.content.contains("Your cart is empty"));
        assert_eq!(
            document.first(Region::MiniCartSubtotal).unwrap().content,
            "NT$ 0"
        );
    }

    #[test]
    fn test_lists_items_with_escaped_names() {
        let document = Document::with_regions([Region::MiniCartItems]);
        let mut store = CartStore::open(MemoryStorage::new());
        store.subscribe(MiniCart::new(document.clone()));

        store.add_item(Product::new("a", "<Fast> Card", Price::from_units(1500), "a.png"));
        store.set_quantity(&ProductId::new("a"), 2);

        let html = document.first(Region::MiniCartItems).unwrap().content;
        assert!(html.contains("&lt;Fast&gt; Card"));
        assert!(!html.contains("<Fast>"));
        assert!(html.contains("Qty: 2"));
        assert!(html.contains("NT$ 3,000"));
        assert!(html.contains(r#"data-cart-action="remove""#));
        assert!(!html.contains("Your cart is empty"));
    }

    #[test]
    fn test_missing_list_skips_everything() {
        let document = Document::with_regions([Region::MiniCartSubtotal]);
        let mut store = CartStore::open(MemoryStorage::new());
        store.subscribe(MiniCart::new(document.clone()));
        store.add_item(Product::new("a", "A", Price::from_units(10), ""));

        assert_eq!(document.first(Region::MiniCartSubtotal).unwrap().content, "");
    }
}
