//! Read-only snapshot of the order being quoted.

use rust_decimal::Decimal;

/// One cart line, as supplied by the checkout collaborator.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub product_id: i64,
    /// `None` means the product has no shipping class (class 0 pricing).
    pub shipping_class_id: Option<i64>,
    pub quantity: u32,
    pub needs_shipping: bool,
}

/// Immutable order snapshot used for rule matching and cost computation.
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    pub subtotal: Decimal,
    pub item_count: u32,
    pub items: Vec<LineItem>,
}

impl OrderContext {
    /// Lines that actually need shipping.
    pub fn shippable(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|item| item.needs_shipping)
    }
}
