//! Cart data model.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by product id. All
//! operations here are pure: persistence, notifications and repaints are the
//! job of [`crate::store::CartStore`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use storecart_core::{Price, PriceError, ProductId, Quantity};

/// Errors building a [`Product`] from element data attributes.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// A required attribute is absent or blank.
    #[error("missing product attribute: {0}")]
    MissingAttribute(&'static str),

    /// The price attribute is not a number.
    #[error("invalid product price {0:?}")]
    InvalidPrice(String),

    /// The price attribute is a number but not a usable price.
    #[error("invalid product price: {0}")]
    Price(#[from] PriceError),
}

/// A product as offered on the page: everything a line item holds except
/// the quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_ref: String,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
        }
    }

    /// Build a product from an add-to-cart control's data attributes.
    ///
    /// Expects `id`, `name` and `price` keys; `image` is optional. The price is
    /// read as a decimal number, leading and trailing whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError`] if a required attribute is missing or the
    /// price is not a non-negative finite number.
    pub fn from_dataset(data: &HashMap<String, String>) -> Result<Self, ProductError> {
        let id = required(data, "id")?;
        let name = required(data, "name")?;
        let raw_price = required(data, "price")?;
        let price = raw_price
            .parse::<f64>()
            .map_err(|_| ProductError::InvalidPrice(raw_price.to_owned()))?;
        let image = data.get("image").map(|s| s.trim()).unwrap_or_default();

        Ok(Self::new(id, name, Price::from_f64(price)?, image))
    }
}

fn required<'a>(
    data: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ProductError> {
    data.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or(ProductError::MissingAttribute(key))
}

/// One product line in the cart.
///
/// Serialized as `{"id", "name", "price", "image", "quantity"}`, the shape the
/// persisted slot has always used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "image", default)]
    pub image_ref: String,
    #[serde(default)]
    pub quantity: Quantity,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(u32::from(self.quantity))
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.unit_price,
            image_ref: product.image_ref,
            quantity: Quantity::MIN,
        }
    }
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Inserted,
    /// An existing line's quantity went up by one.
    Incremented(Quantity),
    /// The existing line was already at the maximum quantity.
    AtMaximum,
}

/// Ordered list of line items with unique product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, keeping the first line for any repeated
    /// product id.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.clone());
                if !fresh {
                    tracing::warn!(product_id = %item.id, "dropping duplicate cart line");
                }
                fresh
            })
            .collect();
        Self { items }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Add one unit of a product.
    ///
    /// An existing line is incremented (stopping at the maximum quantity),
    /// otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: Product) -> AddOutcome {
        if let Some(existing) = self.get_mut(&product.id) {
            if existing.quantity.is_max() {
                return AddOutcome::AtMaximum;
            }
            existing.quantity = existing.quantity.saturating_increment();
            return AddOutcome::Incremented(existing.quantity);
        }
        self.items.push(LineItem::from(product));
        AddOutcome::Inserted
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set a line's quantity, clamped into the allowed range.
    ///
    /// Returns the stored quantity, or `None` if no line has this id.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Option<Quantity> {
        let item = self.get_mut(id)?;
        item.quantity = Quantity::clamped(quantity);
        Some(item.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| u32::from(item.quantity)).sum()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Option::<Vec<LineItem>>::deserialize(deserializer)?;
        Ok(Self::from_items(items.unwrap_or_default()))
    }
}
