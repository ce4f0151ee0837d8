//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STORECART_STORAGE_DIR` - Directory for the file-backed slot (default: .storecart)
//! - `STORECART_STORAGE_KEY` - Slot key for the persisted cart (default: cartItems)
//! - `STORECART_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 30000)
//! - `STORECART_DEFAULT_SHIPPING_FEE` - Fee without a usable shipping option (default: 100)
//! - `STORECART_SHIPPING_OPTIONS` - Comma-separated `code=fee` list, e.g.
//!   `home=100,store=60`; unset or empty means the page has no selector
//! - `STORECART_TOAST_MILLIS` - Notification lifetime in milliseconds (default: 1500)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use storecart_core::Price;
use thiserror::Error;

use crate::notify::DEFAULT_TOAST_DURATION;
use crate::shipping::{
    DEFAULT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, ShippingOption, ShippingSelector, parse_fee,
};
use crate::store::DEFAULT_STORAGE_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings the cart store needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Slot key for the persisted cart
    pub storage_key: String,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Price,
    /// Fee charged when no shipping option supplies one
    pub default_shipping_fee: Price,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            free_shipping_threshold: Price::from_units(FREE_SHIPPING_THRESHOLD),
            default_shipping_fee: Price::from_units(DEFAULT_SHIPPING_FEE),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct StorecartConfig {
    /// Store settings
    pub cart: CartSettings,
    /// Directory holding the file-backed persistence slot
    pub storage_dir: PathBuf,
    /// Configured shipping methods; empty means no selector
    pub shipping_options: Vec<ShippingOption>,
    /// How long notifications stay visible
    pub toast_duration: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorecartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = Source(&lookup);

        let storage_dir = PathBuf::from(source.or_default("STORECART_STORAGE_DIR", ".storecart"));
        let storage_key = source.or_default("STORECART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        let free_shipping_threshold =
            source.price("STORECART_FREE_SHIPPING_THRESHOLD", FREE_SHIPPING_THRESHOLD)?;
        let default_shipping_fee =
            source.price("STORECART_DEFAULT_SHIPPING_FEE", DEFAULT_SHIPPING_FEE)?;
        let shipping_options = source
            .optional("STORECART_SHIPPING_OPTIONS")
            .map(|raw| parse_shipping_options(&raw))
            .transpose()?
            .unwrap_or_default();
        let toast_millis = source
            .optional("STORECART_TOAST_MILLIS")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("STORECART_TOAST_MILLIS".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let sentry_dsn = source.optional("SENTRY_DSN").filter(|dsn| !dsn.is_empty());

        Ok(Self {
            cart: CartSettings {
                storage_key,
                free_shipping_threshold,
                default_shipping_fee,
            },
            storage_dir,
            shipping_options,
            toast_duration: toast_millis.map_or(DEFAULT_TOAST_DURATION, Duration::from_millis),
            sentry_dsn,
        })
    }

    /// The shipping selector, if any options are configured.
    #[must_use]
    pub fn shipping_selector(&self) -> Option<ShippingSelector> {
        if self.shipping_options.is_empty() {
            return None;
        }
        Some(
            ShippingSelector::new(self.shipping_options.clone())
                .with_default_fee(self.cart.default_shipping_fee),
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Source<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Source<'_, F> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a whole-unit price with a default value.
    fn price(&self, key: &str, default: u32) -> Result<Price, ConfigError> {
        self.optional(key).map_or(Ok(Price::from_units(default)), |raw| {
            raw.trim()
                .parse::<u32>()
                .map(Price::from_units)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse `code=fee[,code=fee...]`. A blank or non-positive fee means the
/// option has no fee of its own.
fn parse_shipping_options(raw: &str) -> Result<Vec<ShippingOption>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, fee) = entry.split_once('=').unwrap_or((entry, ""));
            let code = code.trim();
            if code.is_empty() {
                return Err(ConfigError::InvalidEnvVar(
                    "STORECART_SHIPPING_OPTIONS".to_string(),
                    format!("option {entry:?} has no code"),
                ));
            }
            Ok(ShippingOption {
                code: code.to_string(),
                label: code.to_string(),
                fee: parse_fee(fee),
            })
        })
        .collect()
}
