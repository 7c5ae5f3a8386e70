//! Order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storeroom_core::{CustomerId, Money, OrderId, OrderStatus, ProductId};
use storeroom_storage::TableRecord;

use super::{Customer, Product};

/// Display copies of customer and product data, frozen when the order is
/// created.
///
/// These are intentionally not kept in sync with later customer or product
/// edits; the snapshot records what the buyer saw at purchase time. The
/// formatted price is a presentation derivative of the order's
/// `total_amount`, never a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub full_name: String,
    pub product_name: String,
    pub formatted_price: String,
}

impl OrderSnapshot {
    /// Freeze display fields from the records resolved at purchase time.
    #[must_use]
    pub fn freeze(customer: &Customer, product: &Product, total: Money) -> Self {
        Self {
            full_name: customer.full_name(),
            product_name: product.name.clone(),
            formatted_price: total.to_string(),
        }
    }
}

/// A purchase record.
///
/// Orders reference their customer and product by id only - deleting
/// either leaves the order in place. They are created exclusively by the
/// purchase workflow and transition `Completed -> Returned` at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub order_date: DateTime<Utc>,
    /// Exact total, fixed at the product's price when the order was placed.
    pub total_amount: Money,
    pub status: OrderStatus,
    pub snapshot: OrderSnapshot,
    /// Stamped on creation and again when the order is returned.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Partition label for order records.
    pub const PARTITION: &'static str = "orders";
}

impl TableRecord for Order {
    fn partition_key(&self) -> &'static str {
        Self::PARTITION
    }

    fn row_key(&self) -> String {
        self.id.to_string()
    }
}
