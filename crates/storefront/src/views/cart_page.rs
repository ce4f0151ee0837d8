//! Full cart page and checkout totals.

use askama::Template;

use super::{CartItemView, CartView, Document, QUANTITY_MAX, QUANTITY_MIN, Region, render};
use crate::store::{CartObserver, CartSnapshot};

/// Text shown in shipping regions when shipping is free.
pub const FREE_SHIPPING_LABEL: &str = "Free shipping";

/// Class added to shipping regions when shipping is free.
pub const FREE_SHIPPING_CLASS: &str = "text-success";

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"{% for item in items %}<div class="cart-item" data-product-id="{{ item.id }}"><div class="d-flex align-items-center"><img src="{{ item.image }}" alt="{{ item.name }}" class="cart-item-image me-3"><div class="flex-grow-1"><h5 class="mb-1">{{ item.name }}</h5><div class="unit-price mb-2">{{ item.price }}</div><div class="d-flex align-items-center"><div class="quantity-control input-group me-3"><button type="button" class="btn btn-outline-secondary" data-cart-action="step" data-product-id="{{ item.id }}" data-quantity="{{ item.decrement_to }}">-</button><input type="number" class="form-control text-center" value="{{ item.quantity }}" min="{{ min }}" max="{{ max }}" data-cart-action="set-quantity" data-product-id="{{ item.id }}"><button type="button" class="btn btn-outline-secondary" data-cart-action="step" data-product-id="{{ item.id }}" data-quantity="{{ item.increment_to }}">+</button></div><button type="button" class="btn btn-outline-danger" data-cart-action="remove" data-product-id="{{ item.id }}">Remove</button></div></div><div class="text-end ms-3"><h5 class="line-total mb-0">{{ item.line_price }}</h5></div></div></div>{% endfor %}"#
)]
struct CartItemsTemplate {
    items: Vec<CartItemView>,
    min: u8,
    max: u8,
}

/// The cart / checkout page: item list, empty state, totals and the
/// checkout controls.
#[derive(Debug, Clone)]
pub struct CartPage {
    document: Document,
}

impl CartPage {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    /// Item list, empty message and checkout button, painted only when all
    /// three are on the page.
    fn paint_list(&self, view: &CartView) {
        let doc = &self.document;
        let complete = [
            Region::CartItems,
            Region::EmptyCartMessage,
            Region::CheckoutButton,
        ]
        .into_iter()
        .all(|region| doc.contains(region));
        if !complete {
            return;
        }

        if view.is_empty() {
            doc.update(Region::EmptyCartMessage, |el| el.hidden = false);
            doc.set_content(Region::CartItems, "");
            doc.update(Region::CheckoutButton, |el| el.disabled = true);
            return;
        }

        let template = CartItemsTemplate {
            items: view.items.clone(),
            min: QUANTITY_MIN,
            max: QUANTITY_MAX,
        };
        doc.update(Region::EmptyCartMessage, |el| el.hidden = true);
        if let Some(html) = render(&template) {
            doc.set_content(Region::CartItems, &html);
        }
        doc.update(Region::CheckoutButton, |el| el.disabled = false);
    }

    fn paint_totals(&self, view: &CartView) {
        let doc = &self.document;
        doc.set_content(Region::Subtotal, &view.subtotal);
        doc.update(Region::ShippingFee, |el| {
            if view.free_shipping {
                FREE_SHIPPING_LABEL.clone_into(&mut el.content);
                el.classes.insert(FREE_SHIPPING_CLASS.to_string());
            } else {
                el.content.clone_from(&view.shipping);
                el.classes.remove(FREE_SHIPPING_CLASS);
            }
        });
        doc.set_content(Region::Total, &view.total);
        doc.update(Region::PlaceOrderButton, |el| el.disabled = view.subtotal_is_zero);
    }
}

impl CartObserver for CartPage {
    fn on_cart_changed(&mut self, snapshot: &CartSnapshot<'_>) {
        let view = CartView::from(snapshot);
        self.paint_list(&view);
        self.paint_totals(&view);
    }
}
