//! storecart storefront - Shopping cart state for the storefront pages.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart, persists it after every mutation and
//!   notifies subscribed views
//! - [`storage`] is the key-value slot the cart is persisted to
//! - [`shipping`] prices shipping below the free-shipping threshold
//! - [`notify`] surfaces short-lived shopper messages
//! - [`views`] paint the badge, mini cart and cart page with Askama templates
//! - [`bindings`] map page controls to cart actions
//!
//! Everything is single-threaded and synchronous. Shared page handles use
//! `Rc<RefCell<_>>`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bindings;
pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod shipping;
pub mod storage;
pub mod store;
pub mod views;

pub use bindings::{CartAction, Control, action_for};
pub use cart::{Cart, LineItem, Product};
pub use config::{CartSettings, StorecartConfig};
pub use error::{AppError, Result};
pub use notify::{Notifier, Toaster};
pub use shipping::{FlatRate, ShippingOption, ShippingPolicy, ShippingSelector};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartObserver, CartSnapshot, CartStore};
pub use views::Document;
