//! UI bindings: turning page controls into cart actions.
//!
//! Rendered controls carry `data-cart-action` and `data-product-id`
//! attributes. Whatever owns the page's event handling reads those into a
//! [`Control`], maps it with [`action_for`], and hands the result to
//! [`CartStore::dispatch`]. The store never reaches into the page.

use std::collections::HashMap;

use storecart_core::ProductId;
use thiserror::Error;

use crate::cart::{Product, ProductError};
use crate::store::CartStore;

/// A state change requested by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    AddItem(Product),
    RemoveItem(ProductId),
    SetQuantity { id: ProductId, quantity: i64 },
    Clear,
    /// Repaint without changing state (e.g. the shipping selector changed).
    Refresh,
}

/// Errors mapping a control to an action.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The control's action name is not recognized.
    #[error("unknown cart action {0:?}")]
    UnknownAction(String),

    /// The control has no product id.
    #[error("cart action {0:?} needs a product id")]
    MissingProductId(String),

    /// A quantity input holds something other than an integer.
    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),

    /// An add-to-cart control carries bad product data.
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Data attributes read from an activated control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Control {
    /// Value of `data-cart-action`.
    pub action: String,
    /// Remaining `data-*` attributes, keys without the `data-` prefix.
    pub data: HashMap<String, String>,
    /// Current value of the control, for inputs.
    pub value: Option<String>,
}

impl Control {
    /// A control with the given action and no attributes.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    /// Add a data attribute.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the input value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn product_id(&self) -> Result<ProductId, BindingError> {
        self.data
            .get("product-id")
            .filter(|id| !id.is_empty())
            .map(|id| ProductId::new(id.as_str()))
            .ok_or_else(|| BindingError::MissingProductId(self.action.clone()))
    }
}

/// Map an activated control to the action it requests.
///
/// Recognized actions:
/// - `add` - product attributes `id`, `name`, `price`, `image`
/// - `remove` - `product-id`
/// - `set-quantity` - `product-id`, integer in the control's value
/// - `step` - `product-id`, target integer in `quantity` (stepper buttons)
/// - `clear`
/// - `refresh`
///
/// # Errors
///
/// Returns [`BindingError`] if the action is unknown or its attributes are
/// missing or malformed.
pub fn action_for(control: &Control) -> Result<CartAction, BindingError> {
    match control.action.as_str() {
        "add" => Ok(CartAction::AddItem(Product::from_dataset(&control.data)?)),
        "remove" => Ok(CartAction::RemoveItem(control.product_id()?)),
        "set-quantity" => Ok(CartAction::SetQuantity {
            id: control.product_id()?,
            quantity: parse_quantity(control.value.as_deref().unwrap_or_default())?,
        }),
        "step" => Ok(CartAction::SetQuantity {
            id: control.product_id()?,
            quantity: parse_quantity(
                control.data.get("quantity").map(String::as_str).unwrap_or_default(),
            )?,
        }),
        "clear" => Ok(CartAction::Clear),
        "refresh" => Ok(CartAction::Refresh),
        other => Err(BindingError::UnknownAction(other.to_owned())),
    }
}

fn parse_quantity(raw: &str) -> Result<i64, BindingError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| BindingError::InvalidQuantity(raw.to_owned()))
}

impl CartStore {
    /// Apply an action requested by the page.
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(product) => self.add_item(product),
            CartAction::RemoveItem(id) => self.remove_item(&id),
            CartAction::SetQuantity { id, quantity } => self.set_quantity(&id, quantity),
            CartAction::Clear => self.clear(),
            CartAction::Refresh => self.refresh(),
        }
    }

    /// Map a control and apply it. Malformed controls leave the cart
    /// untouched and are logged.
    pub fn handle_control(&mut self, control: &Control) {
        match action_for(control) {
            Ok(action) => self.dispatch(action),
            Err(e) => tracing::debug!(error = %e, "ignoring cart control"),
        }
    }
}
