//! The cart store: sole owner of cart state.
//!
//! Every mutation goes through [`CartStore`], which persists the whole cart to
//! its storage slot, then hands a [`CartSnapshot`] to every subscribed
//! [`CartObserver`] and, where relevant, tells the [`Notifier`].

use storecart_core::{Price, ProductId, Quantity};
use tracing::instrument;

use crate::cart::{AddOutcome, Cart, LineItem, Product};
use crate::config::CartSettings;
use crate::error::add_breadcrumb;
use crate::notify::{Notifier, TracingNotifier};
use crate::shipping::{FlatRate, ShippingPolicy};
use crate::storage::CartStorage;

/// Key under which browsers have always stored the cart.
pub const DEFAULT_STORAGE_KEY: &str = "cartItems";

/// Read-only view of the cart and its derived totals.
#[derive(Debug, Clone, Copy)]
pub struct CartSnapshot<'a> {
    pub items: &'a [LineItem],
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
    pub item_count: u32,
    /// Whether the subtotal reached the free-shipping threshold.
    pub free_shipping: bool,
}

impl CartSnapshot<'_> {
    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Receives a snapshot whenever cart state changes.
pub trait CartObserver {
    /// Called after every change, and once on subscription.
    fn on_cart_changed(&mut self, snapshot: &CartSnapshot<'_>);
}

/// Owns the cart and its collaborators.
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn CartStorage>,
    storage_key: String,
    free_shipping_threshold: Price,
    shipping: Box<dyn ShippingPolicy>,
    notifier: Box<dyn Notifier>,
    observers: Vec<Box<dyn CartObserver>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage_key", &self.storage_key)
            .field("free_shipping_threshold", &self.free_shipping_threshold)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart from `storage` with default settings.
    #[must_use]
    pub fn open(storage: impl CartStorage + 'static) -> Self {
        Self::open_with(storage, &CartSettings::default())
    }

    /// Load the cart from `storage`.
    ///
    /// An absent slot gives an empty cart. So does a slot that cannot be read
    /// or parsed; that case is logged and otherwise ignored.
    #[must_use]
    pub fn open_with(storage: impl CartStorage + 'static, settings: &CartSettings) -> Self {
        let cart = load_cart(&storage, &settings.storage_key);
        tracing::debug!(lines = cart.len(), key = %settings.storage_key, "cart loaded");

        Self {
            cart,
            storage: Box::new(storage),
            storage_key: settings.storage_key.clone(),
            free_shipping_threshold: settings.free_shipping_threshold,
            shipping: Box::new(FlatRate(settings.default_shipping_fee)),
            notifier: Box::new(TracingNotifier),
            observers: Vec::new(),
        }
    }

    /// Replace the shipping policy.
    #[must_use]
    pub fn with_shipping(mut self, shipping: impl ShippingPolicy + 'static) -> Self {
        self.shipping = Box::new(shipping);
        self
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Subscribe a view. It is painted with the current state right away.
    pub fn subscribe(&mut self, mut observer: impl CartObserver + 'static) {
        observer.on_cart_changed(&self.snapshot());
        self.observers.push(Box::new(observer));
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of `product`.
    ///
    /// Repeated adds of the same product increase its quantity by one, up to
    /// the maximum line quantity.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product) {
        let name = product.name.clone();
        let id = product.id.clone();
        match self.cart.add(product) {
            AddOutcome::Inserted => tracing::debug!("new cart line"),
            AddOutcome::Incremented(quantity) => tracing::debug!(%quantity, "cart line incremented"),
            AddOutcome::AtMaximum => tracing::debug!("cart line already at maximum quantity"),
        }
        add_breadcrumb("cart", "Added item", Some(&[("product_id", id.as_str())]));

        self.commit();
        self.notifier.show(&format!("Added {name} to cart"));
    }

    /// Remove the line for `id`. Does nothing if it is not in the cart.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &ProductId) {
        let Some(removed) = self.cart.remove(id) else {
            tracing::debug!("remove ignored, product not in cart");
            return;
        };
        add_breadcrumb("cart", "Removed item", Some(&[("product_id", id.as_str())]));

        self.commit();
        self.notifier
            .show(&format!("Removed {} from cart", removed.name));
    }

    /// Set the quantity of the line for `id`, clamped to `1..=10`.
    /// Does nothing if it is not in the cart.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        let Some(stored) = self.cart.set_quantity(id, quantity) else {
            tracing::debug!("quantity update ignored, product not in cart");
            return;
        };
        if i64::from(stored.get()) != quantity {
            tracing::debug!(requested = quantity, %stored, "quantity clamped");
        }

        self.commit();
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        add_breadcrumb("cart", "Cleared cart", None);

        self.commit();
        self.notifier.show("Cart cleared");
    }

    /// Swap the shipping policy, e.g. after the shopper picks another method,
    /// and repaint. The cart itself is unchanged, so nothing is persisted.
    pub fn replace_shipping(&mut self, shipping: impl ShippingPolicy + 'static) {
        self.shipping = Box::new(shipping);
        self.emit();
    }

    /// Repaint every view without changing state.
    pub fn refresh(&mut self) {
        self.emit();
    }

    /// Sum of unit price times quantity.
    #[must_use]
    pub fn compute_subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    /// Shipping for `subtotal`: free at or above the threshold, otherwise
    /// whatever the shipping policy charges.
    #[must_use]
    pub fn compute_shipping_fee(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_shipping_threshold {
            return Price::ZERO;
        }
        self.shipping.fee_for(subtotal)
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn compute_total(&self) -> Price {
        let subtotal = self.compute_subtotal();
        subtotal + self.compute_shipping_fee(subtotal)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Quantity of the line for `id`, if present.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> Option<Quantity> {
        self.cart.get(id).map(|item| item.quantity)
    }

    /// Current state with derived totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot<'_> {
        let subtotal = self.compute_subtotal();
        let shipping_fee = self.compute_shipping_fee(subtotal);
        CartSnapshot {
            items: self.cart.items(),
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
            item_count: self.cart.item_count(),
            free_shipping: subtotal >= self.free_shipping_threshold,
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.emit();
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.cart) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.storage_key, &serialized) {
            tracing::warn!(error = %e, key = %self.storage_key, "failed to persist cart");
        }
    }

    fn emit(&mut self) {
        // Observers need `&mut` while the snapshot borrows the cart.
        let mut observers = std::mem::take(&mut self.observers);
        let snapshot = self.snapshot();
        for observer in &mut observers {
            observer.on_cart_changed(&snapshot);
        }
        self.observers = observers;
    }
}

/// Read and parse the persisted cart, falling back to empty.
fn load_cart(storage: &dyn CartStorage, key: &str) -> Cart {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, key, "failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, key, "persisted cart is corrupt, starting empty");
        Cart::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::notify::Toaster;
    use crate::shipping::{ShippingOption, ShippingSelector};
    use crate::storage::MemoryStorage;

    fn product(id: &str, price: u32) -> Product {
        Product::new(id, format!("Item {id}"), Price::from_units(price), "")
    }

    fn messages(toaster: &Toaster) -> Vec<String> {
        toaster.visible().into_iter().map(|t| t.message).collect()
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(usize, Price)>>>);

    impl CartObserver for Recorder {
        fn on_cart_changed(&mut self, snapshot: &CartSnapshot<'_>) {
            self.0
                .borrow_mut()
                .push((snapshot.items.len(), snapshot.subtotal));
        }
    }

    #[test]
    fn test_largest_prices_do_not_overflow_totals() {
        let mut store = CartStore::open(MemoryStorage::new());
        for id in ["a", "b", "c"] {
            for _ in 0..12 {
                store.add_item(Product::new(id, "Vault", Price::MAX, ""));
            }
        }

        assert_eq!(store.compute_subtotal(), Price::MAX.times(30));
        assert!(store.compute_total() >= store.compute_subtotal());
        assert_eq!(store.item_count(), 30);
    }

    #[test]
    fn test_saved_price_out_of_range_loads_empty() {
        let raw = r#"[{"id":"a","name":"A","price":5e28,"image":"","quantity":2}]"#;
        let store = CartStore::open(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw));

        assert!(store.cart().is_empty());
        assert_eq!(store.compute_total(), Price::from_units(100));
    }

    #[test]
    fn test_add_twice_scenario() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add_item(product("A", 500));
        store.add_item(product("A", 500));

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.quantity_of(&ProductId::new("A")).map(Quantity::get), Some(2));
        assert_eq!(store.compute_subtotal(), Price::from_units(1000));
    }

    #[test]
    fn test_set_quantity_scenario() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add_item(product("A", 500));
        store.set_quantity(&ProductId::new("A"), 15);
        assert_eq!(store.quantity_of(&ProductId::new("A")), Some(Quantity::MAX));
    }

    #[test]
    fn test_mutations_persist() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store.add_item(product("A", 500));
        store.set_quantity(&ProductId::new("A"), 3);

        let raw = storage.raw(DEFAULT_STORAGE_KEY).unwrap();
        let reloaded: Cart = serde_json::from_str(&raw).unwrap();
        assert_eq!(&reloaded, store.cart());
    }

    #[test]
    fn test_corrupt_state_loads_empty() {
        for raw in ["{not json", "42", "[{\"id\": 1}]", "null"] {
            let store = CartStore::open(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw));
            assert!(store.cart().is_empty(), "{raw:?} should load as empty");
        }
    }

    #[test]
    fn test_shipping_threshold_overrides_selection() {
        let selector = ShippingSelector::new(vec![ShippingOption::new(
            "express",
            "Express",
            Price::from_units(250),
        )]);
        let store = CartStore::open(MemoryStorage::new()).with_shipping(selector);

        assert_eq!(
            store.compute_shipping_fee(Price::from_units(35_000)),
            Price::ZERO
        );
        assert_eq!(
            store.compute_shipping_fee(Price::from_units(30_000)),
            Price::ZERO
        );
        assert_eq!(
            store.compute_shipping_fee(Price::from_units(29_999)),
            Price::from_units(250)
        );
    }

    #[test]
    fn test_default_shipping_scenario() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add_item(product("A", 500));
        assert_eq!(
            store.compute_shipping_fee(store.compute_subtotal()),
            Price::from_units(100)
        );
        assert_eq!(store.compute_total(), Price::from_units(600));
    }

    #[test]
    fn test_notifications() {
        let toaster = Toaster::default();
        let mut store = CartStore::open(MemoryStorage::new()).with_notifier(toaster.clone());

        store.add_item(product("A", 10));
        store.set_quantity(&ProductId::new("A"), 4);
        store.remove_item(&ProductId::new("missing"));
        store.remove_item(&ProductId::new("A"));
        store.clear();

        assert_eq!(
            messages(&toaster),
            ["Added Item A to cart", "Removed Item A from cart", "Cart cleared"]
        );
    }

    #[test]
    fn test_observers_see_every_change() {
        let recorder = Recorder::default();
        let mut store = CartStore::open(MemoryStorage::new());
        store.subscribe(recorder.clone());

        store.add_item(product("A", 500));
        store.add_item(product("B", 200));
        store.remove_item(&ProductId::new("nope"));
        store.clear();

        assert_eq!(
            *recorder.0.borrow(),
            [
                (0, Price::ZERO),
                (1, Price::from_units(500)),
                (2, Price::from_units(700)),
                (0, Price::ZERO),
            ]
        );
    }

    #[test]
    fn test_replace_shipping_repaints_without_persisting() {
        let storage = MemoryStorage::new();
        let recorder = Recorder::default();
        let mut store = CartStore::open(storage.clone());
        store.subscribe(recorder.clone());

        store.replace_shipping(FlatRate(Price::from_units(60)));
        assert_eq!(recorder.0.borrow().len(), 2);
        assert_eq!(storage.raw(DEFAULT_STORAGE_KEY), None);
        assert_eq!(store.snapshot().shipping_fee, Price::from_units(60));
    }
}
