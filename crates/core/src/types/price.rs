//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always non-negative and denominated in the storefront's single
//! display currency (New Taiwan dollars). Arithmetic stays in [`Decimal`] so
//! subtotals never pick up floating-point drift, while the persisted form is a
//! plain JSON number for compatibility with browser-written cart data.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display prefix for the storefront currency.
pub const CURRENCY_PREFIX: &str = "NT$";

/// Maximum number of fraction digits shown when formatting.
const DISPLAY_FRACTION_DIGITS: u32 = 3;

/// Largest accepted unit price, in whole currency units.
const MAX_UNITS: i64 = 1_000_000_000_000;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The input is above [`Price::MAX`] or cannot be represented as a decimal.
    #[error("price {0} is out of range")]
    OutOfRange(String),
}

/// A non-negative monetary amount.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use storecart_core::Price;
///
/// let price = Price::new(Decimal::from(12_500)).unwrap();
/// assert_eq!(price.to_string(), "NT$ 12,500");
///
/// assert!(Price::new(Decimal::from(-1)).is_err());
/// assert!(Price::from_f64(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest price [`Price::new`] accepts.
    pub const MAX: Self = Self(Decimal::from_parts(
        0xD4A5_1000,
        0xE8,
        0,
        false,
        0,
    ));

    /// Create a price from a decimal amount.
    ///
    /// The amount is kept to the precision a JSON number carries, so a price
    /// reads back unchanged after being persisted.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero and
    /// [`PriceError::OutOfRange`] if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::OutOfRange(amount.to_string()));
        }
        let stored = decimal_from_f64(decimal_to_f64(amount)).unwrap_or(amount);
        Ok(Self(stored))
    }

    /// Create a price from a whole-unit amount.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from a floating-point amount, as read from markup or JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not finite, cannot be represented, or
    /// is negative.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        let decimal =
            decimal_from_f64(amount).ok_or_else(|| PriceError::OutOfRange(amount.to_string()))?;
        Self::new(decimal)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// This price multiplied by a whole count (e.g. a line quantity).
    ///
    /// Saturates at the largest representable amount.
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(count))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at the largest representable amount.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_PREFIX} {}", group_thousands(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = self.0.normalize();
        match normalized.to_u64() {
            Some(whole) if normalized.scale() == 0 => serializer.serialize_u64(whole),
            _ => serializer.serialize_f64(decimal_to_f64(self.0)),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Self::from_f64(raw).map_err(serde::de::Error::custom)
    }
}

/// The `f64` nearest to `amount`, parsed from its decimal text so the
/// rounding is exact.
fn decimal_to_f64(amount: Decimal) -> f64 {
    amount.to_string().parse().unwrap_or_default()
}

/// The shortest decimal that reads back as `value`.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::try_from(value).ok())
}

/// Format an amount with comma thousands separators and at most three
/// fraction digits, trailing zeros trimmed.
fn group_thousands(amount: Decimal) -> String {
    let text = amount.round_dp(DISPLAY_FRACTION_DIGITS).normalize().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let digits = whole.len();
    let mut grouped = String::with_capacity(digits + digits / 3 + 4);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
