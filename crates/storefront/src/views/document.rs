//! The page surface views paint into.
//!
//! A [`Document`] holds the cart-related regions that exist on the current
//! page. A region may be absent (the page doesn't show it) or present in
//! several instances (e.g. a subtotal in both the summary and the order
//! form). Writes to an absent region are skipped.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Cart-related page regions, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Item count badge in the navigation bar.
    CartBadge,
    /// Compact item list in the navigation dropdown.
    MiniCartItems,
    /// Subtotal line under the compact list.
    MiniCartSubtotal,
    /// Full item list on the cart page.
    CartItems,
    /// Message shown when the cart is empty.
    EmptyCartMessage,
    /// Proceed-to-checkout control on the cart page.
    CheckoutButton,
    /// Subtotal displays.
    Subtotal,
    /// Shipping fee displays.
    ShippingFee,
    /// Order total displays.
    Total,
    /// Order submission control on the checkout page.
    PlaceOrderButton,
}

impl Region {
    /// Class name the region carries in markup.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::CartBadge => "cart-badge",
            Self::MiniCartItems => "mini-cart-items",
            Self::MiniCartSubtotal => "mini-cart-subtotal",
            Self::CartItems => "cart-items",
            Self::EmptyCartMessage => "empty-cart-message",
            Self::CheckoutButton => "checkout-btn",
            Self::Subtotal => "cart-subtotal",
            Self::ShippingFee => "shipping-fee",
            Self::Total => "cart-total",
            Self::PlaceOrderButton => "place-order-btn",
        }
    }
}

/// One instance of a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Inner markup or text.
    pub content: String,
    pub hidden: bool,
    pub disabled: bool,
    pub classes: BTreeSet<String>,
}

impl Element {
    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Shared handle to the page's regions.
///
/// Clones refer to the same page, so each view can hold its own handle.
#[derive(Debug, Clone, Default)]
pub struct Document {
    regions: Rc<RefCell<HashMap<Region, Vec<Element>>>>,
}

impl Document {
    /// A page with no cart regions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with one instance of each listed region.
    #[must_use]
    pub fn with_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        let document = Self::new();
        for region in regions {
            document.mount(region);
        }
        document
    }

    /// Add an instance of `region` to the page.
    pub fn mount(&self, region: Region) {
        self.regions
            .borrow_mut()
            .entry(region)
            .or_default()
            .push(Element::default());
    }

    /// Whether at least one instance of `region` exists.
    #[must_use]
    pub fn contains(&self, region: Region) -> bool {
        self.count(region) > 0
    }

    /// Number of instances of `region`.
    #[must_use]
    pub fn count(&self, region: Region) -> usize {
        self.regions.borrow().get(&region).map_or(0, Vec::len)
    }

    /// Apply `f` to every instance of `region`.
    ///
    /// Returns `false` (and does nothing) if the region is absent.
    pub fn update(&self, region: Region, mut f: impl FnMut(&mut Element)) -> bool {
        let mut regions = self.regions.borrow_mut();
        match regions.get_mut(&region) {
            Some(elements) if !elements.is_empty() => {
                elements.iter_mut().for_each(&mut f);
                true
            }
            _ => {
                tracing::trace!(region = region.class_name(), "region not on page, skipped");
                false
            }
        }
    }

    /// Set the content of every instance of `region`.
    pub fn set_content(&self, region: Region, content: &str) -> bool {
        self.update(region, |element| content.clone_into(&mut element.content))
    }

    /// The first instance of `region`.
    #[must_use]
    pub fn first(&self, region: Region) -> Option<Element> {
        self.regions
            .borrow()
            .get(&region)
            .and_then(|elements| elements.first().cloned())
    }

    /// Every instance of `region`.
    #[must_use]
    pub fn all(&self, region: Region) -> Vec<Element> {
        self.regions
            .borrow()
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }
}
