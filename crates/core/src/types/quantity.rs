//! Line item quantity bounded to the range a single cart line accepts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Quantity of a single cart line.
///
/// ## Constraints
///
/// - Always within `1..=10`
/// - Out-of-range input is clamped to the nearest bound, never rejected
///
/// ## Examples
///
/// ```
/// use storecart_core::Quantity;
///
/// assert_eq!(Quantity::clamped(15).get(), 10);
/// assert_eq!(Quantity::clamped(-3).get(), 1);
/// assert_eq!(Quantity::MAX.saturating_increment(), Quantity::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Quantity(u8);

impl Quantity {
    /// Smallest quantity a line can hold.
    pub const MIN: Self = Self(1);
    /// Largest quantity a line can hold.
    pub const MAX: Self = Self(10);

    /// Build a quantity from any integer, clamping into `1..=10`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        // The clamp above keeps the value well inside u8.
        Self(u8::try_from(bounded).unwrap_or(Self::MAX.0))
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One more than this quantity, stopping at [`Quantity::MAX`].
    #[must_use]
    pub fn saturating_increment(self) -> Self {
        Self::clamped(i64::from(self.0) + 1)
    }

    /// Whether this quantity is at the upper bound.
    #[must_use]
    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Quantity> for u8 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_matches_min_max_rule() {
        for value in -20_i64..=25 {
            let expected = value.clamp(1, 10);
            assert_eq!(i64::from(Quantity::clamped(value).get()), expected);
        }
        assert_eq!(Quantity::clamped(i64::MIN), Quantity::MIN);
        assert_eq!(Quantity::clamped(i64::MAX), Quantity::MAX);
    }

    #[test]
    fn test_saturating_increment() {
        assert_eq!(Quantity::MIN.saturating_increment().get(), 2);
        assert_eq!(Quantity::clamped(9).saturating_increment(), Quantity::MAX);
        assert_eq!(Quantity::MAX.saturating_increment(), Quantity::MAX);
    }

    #[test]
    fn test_deserialize_clamps() {
        let q: Quantity = serde_json::from_str("42").unwrap();
        assert_eq!(q, Quantity::MAX);
        let q: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(q, Quantity::MIN);
        assert!(serde_json::from_str::<Quantity>("\"three\"").is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Quantity::clamped(3)).unwrap(), "3");
    }
}
