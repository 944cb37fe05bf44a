// src/domain/service/mod.rs
// Pure checkout and rating arithmetic, kept free of I/O

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::model::{OrderItem, Product, UserId};

/// The slice of a checkout belonging to one vendor; becomes exactly one
/// order.
#[derive(Debug, Clone)]
pub struct VendorGroup {
    pub vendor_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
}

/// Partition validated checkout lines into disjoint per-vendor groups,
/// preserving the order vendors first appear in the request. Unit prices
/// are taken from the product records (server-authoritative); the line
/// snapshot is immutable from here on.
pub fn partition_by_vendor(lines: &[(Product, u32)]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();

    for (product, quantity) in lines {
        let line_total = product.price * Decimal::from(*quantity);
        let item = OrderItem {
            product_id: product.id,
            quantity: *quantity,
            unit_price: product.price,
            line_total,
        };

        match groups.iter_mut().find(|g| g.vendor_id == product.vendor_id) {
            Some(group) => {
                group.items.push(item);
                group.total_amount += line_total;
            }
            None => groups.push(VendorGroup {
                vendor_id: product.vendor_id,
                items: vec![item],
                total_amount: line_total,
            }),
        }
    }

    groups
}

/// Arithmetic mean of a product's ratings, rounded half-up to one decimal
/// place. An empty review set yields zero.
pub fn mean_rating(rating_sum: u64, review_count: u32) -> Decimal {
    if review_count == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(rating_sum) / Decimal::from(review_count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
