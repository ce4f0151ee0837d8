//! Cart commands.
//!
//! Each invocation is one "page load": the cart is read from the file-backed
//! slot, one action is applied through the same control bindings the page
//! uses, and the result is printed.
//!
//! # Environment Variables
//!
//! - `STORECART_STORAGE_DIR` - Directory holding the cart file
//! - `STORECART_SHIPPING_OPTIONS` - Shipping methods selectable with `--shipping`

use storecart_storefront::bindings::action_for;
use storecart_storefront::views::{self, Region};
use storecart_storefront::{
    AppError, CartStore, Control, Document, FileStorage, StorecartConfig, Toaster,
};

/// Every region a full cart page shows, in print order.
const PAGE_REGIONS: [Region; 10] = [
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

/// A loaded cart with its page and notifications.
pub struct CartSession {
    store: CartStore,
    toaster: Toaster,
    document: Document,
    config: StorecartConfig,
}

impl CartSession {
    /// Load the cart from the configured storage directory.
    pub fn open(config: &StorecartConfig) -> Self {
        let storage = FileStorage::new(&config.storage_dir);
        let toaster = Toaster::new(config.toast_duration);
        let document = Document::with_regions(PAGE_REGIONS);

        let mut store = CartStore::open_with(storage, &config.cart).with_notifier(toaster.clone());
        if let Some(selector) = config.shipping_selector() {
            store = store.with_shipping(selector);
        }
        views::mount_all(&mut store, &document);

        Self {
            store,
            toaster,
            document,
            config: config.clone(),
        }
    }

    /// Add one unit of a product.
    pub fn add(&mut self, id: &str, name: &str, price: &str, image: &str) -> Result<(), AppError> {
        let control = Control::new("add")
            .with_data("id", id)
            .with_data("name", name)
            .with_data("price", price)
            .with_data("image", image);
        self.store.dispatch(action_for(&control)?);
        Ok(())
    }

    /// Remove a product's line.
    pub fn remove(&mut self, id: &str) -> Result<(), AppError> {
        let control = Control::new("remove").with_data("product-id", id);
        self.store.dispatch(action_for(&control)?);
        Ok(())
    }

    /// Set a line's quantity from raw input.
    pub fn set_quantity(&mut self, id: &str, quantity: &str) -> Result<(), AppError> {
        let control = Control::new("set-quantity")
            .with_data("product-id", id)
            .with_value(quantity);
        self.store.dispatch(action_for(&control)?);
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Price shipping with the configured option `code`.
    pub fn select_shipping(&mut self, code: &str) -> Result<(), AppError> {
        let mut selector = self
            .config
            .shipping_selector()
            .ok_or_else(|| AppError::UnknownShipping(code.to_string()))?;
        if !selector.select(code) {
            return Err(AppError::UnknownShipping(code.to_string()));
        }
        self.store.replace_shipping(selector);
        Ok(())
    }

    /// Print notifications raised by this command.
    #[allow(clippy::print_stdout)]
    pub fn print_toasts(&self) {
        for toast in self.toaster.visible() {
            println!("* {}", toast.message);
        }
    }

    /// Print the cart lines and totals.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            println!("Cart is empty");
        } else {
            println!("Cart ({} items):", snapshot.item_count);
            for item in snapshot.items {
                println!(
                    "  {:<16} {:<24} x{:<3} {}",
                    item.id,
                    item.name,
                    item.quantity,
                    item.line_total()
                );
            }
        }

        println!("Subtotal: {}", snapshot.subtotal);
        if snapshot.free_shipping {
            println!("Shipping: {}", views::FREE_SHIPPING_LABEL);
        } else {
            println!("Shipping: {}", snapshot.shipping_fee);
        }
        println!("Total:    {}", snapshot.total);
    }

    /// Print every painted page region.
    #[allow(clippy::print_stdout)]
    pub fn print_regions(&self) {
        for region in PAGE_REGIONS {
            let Some(element) = self.document.first(region) else {
                continue;
            };
            let mut flags = Vec::new();
            if element.hidden {
                flags.push("hidden");
            }
            if element.disabled {
                flags.push("disabled");
            }
            println!("<!-- .{} {} -->", region.class_name(), flags.join(" "));
            println!("{}", element.content);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("storecart-cli-{}", uuid::Uuid::new_v4()))
    }

    fn config(dir: &Path, shipping_options: Option<&str>) -> StorecartConfig {
        let dir = dir.to_string_lossy().into_owned();
        let shipping_options = shipping_options.map(str::to_string);
        StorecartConfig::from_source(|key| match key {
            "STORECART_STORAGE_DIR" => Some(dir.clone()),
            "STORECART_SHIPPING_OPTIONS" => shipping_options.clone(),
            _ => None,
        })
        .unwrap()
    }

    fn quantity(session: &CartSession, id: &str) -> Option<u8> {
        session
            .store
            .cart()
            .items()
            .iter()
            .find(|item| item.id.as_str() == id)
            .map(|item| item.quantity.get())
    }

    #[test]
    fn test_add_then_show_across_sessions() {
        let dir = temp_dir();
        let config = config(&dir, None);

        let mut first = CartSession::open(&config);
        first.add("gpu", "RTX Card", "45990", "img/gpu.jpg").unwrap();
        first.add("gpu", "RTX Card", "45990", "img/gpu.jpg").unwrap();
        let messages: Vec<String> = first
            .toaster
            .visible()
            .into_iter()
            .map(|toast| toast.message)
            .collect();
        assert_eq!(messages.first().map(String::as_str), Some("Added RTX Card to cart"));

        let second = CartSession::open(&config);
        assert_eq!(quantity(&second, "gpu"), Some(2));

        let snapshot = second.store.snapshot();
        assert_eq!(snapshot.subtotal.to_string(), "NT$ 91,980");
        assert!(snapshot.free_shipping);
        assert_eq!(
            second.document.first(Region::CartBadge).map(|e| e.content),
            Some("2".to_string())
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_configured_shipping_prices_show() {
        let dir = temp_dir();
        let mut session = CartSession::open(&config(&dir, Some("home=120,store=60")));
        session.add("cable", "Cable", "300", "").unwrap();

        assert_eq!(session.store.snapshot().shipping_fee.to_string(), "NT$ 120");

        session.select_shipping("store").unwrap();
        assert_eq!(session.store.snapshot().shipping_fee.to_string(), "NT$ 60");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unknown_shipping_code_is_rejected() {
        let dir = temp_dir();
        let mut session = CartSession::open(&config(&dir, Some("home=120,store=60")));

        let err = session.select_shipping("drone").unwrap_err();
        assert!(matches!(err, AppError::UnknownShipping(code) if code == "drone"));
        assert_eq!(session.store.snapshot().shipping_fee.to_string(), "NT$ 120");

        let mut unconfigured = CartSession::open(&config(&dir, None));
        assert!(matches!(
            unconfigured.select_shipping("home"),
            Err(AppError::UnknownShipping(_))
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_set_quantity_clamps_raw_input() {
        let dir = temp_dir();
        let config = config(&dir, None);

        let mut session = CartSession::open(&config);
        session.add("a", "Item A", "500", "").unwrap();
        session.set_quantity("a", "-5").unwrap();
        assert_eq!(quantity(&session, "a"), Some(1));

        session.set_quantity("a", "42").unwrap();
        assert_eq!(quantity(&session, "a"), Some(10));

        assert!(matches!(
            session.set_quantity("a", "many"),
            Err(AppError::Binding(_))
        ));
        assert_eq!(quantity(&CartSession::open(&config), "a"), Some(10));

        std::fs::remove_dir_all(dir).ok();
    }
}
