//! Unified error handling with Sentry integration.
//!
//! Cart operations themselves never fail: corrupt state, missing view regions
//! and out-of-range quantities all recover locally. The errors here cover the
//! edges around the cart (configuration, storage, markup parsing) and are
//! unified into [`AppError`] for callers such as the CLI.

use thiserror::Error;

use crate::bindings::BindingError;
use crate::cart::ProductError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront cart.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product data attributes were invalid.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// A UI control could not be mapped to a cart action.
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// Shipping method code is not one of the configured options.
    #[error("Unknown shipping method: {0}")]
    UnknownShipping(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for cart activity.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error. Without an initialized Sentry client this
/// is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "gpu-1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::UnknownShipping("drone".to_string());
        assert_eq!(err.to_string(), "Unknown shipping method: drone");

        let err = AppError::from(StorageError::InvalidKey("../x".to_string()));
        assert_eq!(err.to_string(), "Storage error: invalid storage key \"../x\"");
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("cart", "Cleared cart", None);
        add_breadcrumb("cart", "Added item", Some(&[("product_id", "a")]));
    }
}
