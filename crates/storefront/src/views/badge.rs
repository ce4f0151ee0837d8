//! Item count badge.

use super::{Document, Region};
use crate::store::{CartObserver, CartSnapshot};

/// Shows the total number of units in every badge on the page.
#[derive(Debug, Clone)]
pub struct CountBadge {
    document: Document,
}

impl CountBadge {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }
}

impl CartObserver for CountBadge {
    fn on_cart_changed(&mut self, snapshot: &CartSnapshot<'_>) {
        self.document
            .set_content(Region::CartBadge, &snapshot.item_count.to_string());
    }
}

#[cfg(test)]
mod tests {
    use storecart_core::Price;

    use super::*;
    use crate::cart::Product;
    use crate::store::CartStore;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_badge_counts_units() {
        let document = Document::with_regions([Region::CartBadge, Region::CartBadge]);
        let mut store = CartStore::open(MemoryStorage::new());
        store.subscribe(CountBadge::new(document.clone()));

        let product = Product::new("a", "A", Price::from_units(10), "");
        store.add_item(product.clone());
        store.add_item(product);
        store.add_item(Product::new("b", "B", Price::from_units(5), ""));

        for badge in document.all(Region::CartBadge) {
            assert_eq!(badge.content, "3");
        }
    }
}
