//! Shipping fee policies.
//!
//! A policy prices shipping for a subtotal below the free-shipping threshold.
//! The threshold itself is applied by the store, so it overrides whatever a
//! policy would charge.

use storecart_core::Price;

/// Fee charged when no shipping method can be determined.
pub const DEFAULT_SHIPPING_FEE: u32 = 100;

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: u32 = 30_000;

/// Prices shipping for a cart subtotal.
pub trait ShippingPolicy {
    /// Fee for an order with this subtotal.
    fn fee_for(&self, subtotal: Price) -> Price;
}

/// The same fee for every order. Used when the page has no shipping selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRate(pub Price);

impl Default for FlatRate {
    fn default() -> Self {
        Self(Price::from_units(DEFAULT_SHIPPING_FEE))
    }
}

impl ShippingPolicy for FlatRate {
    fn fee_for(&self, _subtotal: Price) -> Price {
        self.0
    }
}

/// One selectable shipping method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingOption {
    /// Machine-readable method code.
    pub code: String,
    /// Label shown to the shopper.
    pub label: String,
    /// Flat fee for this method. `None` falls back to the selector default.
    pub fee: Option<Price>,
}

impl ShippingOption {
    /// Create an option with a known fee.
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>, fee: Price) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            fee: Some(fee),
        }
    }

    /// Create an option from a raw fee attribute.
    ///
    /// Missing, unparsable and zero fees all count as "no fee given".
    #[must_use]
    pub fn from_raw_fee(code: impl Into<String>, label: impl Into<String>, raw_fee: &str) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            fee: parse_fee(raw_fee),
        }
    }
}

/// Parse an option's fee attribute as a positive whole amount.
///
/// Only the leading digits count, so `"60.5"` and `"60 NTD"` both read as 60.
/// A sign other than `+` gives no fee.
#[must_use]
pub fn parse_fee(raw: &str) -> Option<Price> {
    let text = raw.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits = text
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    digits
        .parse::<u32>()
        .ok()
        .filter(|fee| *fee > 0)
        .map(Price::from_units)
}

/// A shopper-controlled choice among shipping methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingSelector {
    options: Vec<ShippingOption>,
    selected: usize,
    default_fee: Price,
}

impl ShippingSelector {
    /// Create a selector with the first option selected.
    #[must_use]
    pub fn new(options: Vec<ShippingOption>) -> Self {
        Self {
            options,
            selected: 0,
            default_fee: Price::from_units(DEFAULT_SHIPPING_FEE),
        }
    }

    /// Override the fee used when the selected option has none.
    #[must_use]
    pub const fn with_default_fee(mut self, fee: Price) -> Self {
        self.default_fee = fee;
        self
    }

    /// Select the option with this code. Returns `false` if no option matches,
    /// leaving the selection unchanged.
    pub fn select(&mut self, code: &str) -> bool {
        match self.options.iter().position(|option| option.code == code) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// The selected option, if any options exist.
    #[must_use]
    pub fn selected(&self) -> Option<&ShippingOption> {
        self.options.get(self.selected)
    }

    /// All options in display order.
    #[must_use]
    pub fn options(&self) -> &[ShippingOption] {
        &self.options
    }
}

impl ShippingPolicy for ShippingSelector {
    fn fee_for(&self, _subtotal: Price) -> Price {
        self.selected()
            .and_then(|option| option.fee)
            .unwrap_or(self.default_fee)
    }
}

impl<P: ShippingPolicy + ?Sized> ShippingPolicy for Box<P> {
    fn fee_for(&self, subtotal: Price) -> Price {
        (**self).fee_for(subtotal)
    }
}
