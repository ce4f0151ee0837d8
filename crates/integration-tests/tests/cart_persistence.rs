//! Integration tests for persisting carts across page loads.
//!
//! Each `CartStore::open_with` call stands in for a page load against the same
//! file-backed slot.

use storecart_core::{Price, ProductId, Quantity};
use storecart_integration_tests::{product, temp_storage_dir};
use storecart_storefront::storage::CartStorage;
use storecart_storefront::{CartSettings, CartStore, FileStorage, MemoryStorage, StorecartConfig};

#[test]
fn test_reload_without_mutation_is_identical() {
    let dir = temp_storage_dir();
    let settings = CartSettings::default();

    let mut first = CartStore::open_with(FileStorage::new(&dir), &settings);
    first.add_item(product("a", 500));
    first.add_item(product("a", 500));
    first.add_item(product("b", 1200));
    first.set_quantity(&ProductId::new("b"), 4);

    let second = CartStore::open_with(FileStorage::new(&dir), &settings);
    assert_eq!(second.cart(), first.cart());

    // Reloading again without mutating changes nothing on disk either.
    let third = CartStore::open_with(FileStorage::new(&dir), &settings);
    assert_eq!(third.cart(), first.cart());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_reads_browser_written_cart() {
    let raw = r#"[
        {"id":"p1","name":"RTX Card","price":45990,"image":"img/p1.jpg","quantity":1},
        {"id":"p2","name":"Mouse","price":1290.5,"image":"img/p2.jpg","quantity":3}
    ]"#;
    let store = CartStore::open(MemoryStorage::with_item("cartItems", raw));

    assert_eq!(store.cart().len(), 2);
    assert_eq!(
        store.quantity_of(&ProductId::new("p2")).map(Quantity::get),
        Some(3)
    );
    assert_eq!(store.compute_subtotal().to_string(), "NT$ 49,861.5");
    assert_eq!(
        store.compute_shipping_fee(store.compute_subtotal()),
        Price::ZERO
    );
}

#[test]
fn test_corrupt_file_starts_empty_and_is_overwritten() {
    let dir = temp_storage_dir();
    let mut storage = FileStorage::new(&dir);
    storage.set_item("cartItems", "[{\"id\": \"a\", \"price\":").ok();

    let mut store = CartStore::open_with(storage.clone(), &CartSettings::default());
    assert!(store.cart().is_empty());

    store.add_item(product("a", 100));
    let raw = storage.get_item("cartItems").ok().flatten().unwrap_or_default();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap_or_default();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_clear_persists_empty_array() {
    let storage = MemoryStorage::new();
    let mut store = CartStore::open(storage.clone());
    store.add_item(product("a", 100));
    store.clear();

    assert_eq!(storage.raw("cartItems").as_deref(), Some("[]"));
    assert!(CartStore::open(storage).cart().is_empty());
}

#[test]
fn test_configured_key_and_directory() {
    let dir = temp_storage_dir();
    let dir_str = dir.to_string_lossy().into_owned();
    let config = StorecartConfig::from_source(|key| match key {
        "STORECART_STORAGE_DIR" => Some(dir_str.clone()),
        "STORECART_STORAGE_KEY" => Some("headerCart".to_string()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("config should load: {e}"));

    let mut store = CartStore::open_with(FileStorage::new(&config.storage_dir), &config.cart);
    store.add_item(product("a", 100));

    assert!(dir.join("headerCart.json").exists());
    assert!(!dir.join("cartItems.json").exists());

    std::fs::remove_dir_all(dir).ok();
}
