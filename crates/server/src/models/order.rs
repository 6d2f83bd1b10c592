//! Order documents embedded in the user's order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshbasket_core::{Email, OrderId, OrderStatus, Price, ProductId};

use super::user::CartEntry;

/// An immutable order snapshot.
///
/// Line items are copied by value from the cart at placement time and
/// never change afterwards, even if the referenced products are later
/// edited or deleted. Enrichment tolerates missing products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub items: Vec<CartEntry>,
    pub total_price: Price,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_method: String,
    pub address: String,
    pub phone: String,
    pub user_email: Email,
}

/// Marker value substituted for product display fields of a line item
/// whose product has been deleted.
pub const UNAVAILABLE: &str = "unavailable";

/// An order with line items joined against current product data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total_price: Price,
    pub placed_at: DateTime<Utc>,
    pub payment_method: String,
    pub address: String,
    pub phone: String,
    pub items: Vec<OrderLineView>,
}

/// One enriched order line.
///
/// When the product has been deleted, `available` is false and the
/// display fields hold the [`UNAVAILABLE`] marker; the line is still
/// returned so order history keeps its full length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub food_name: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: u32,
    pub available: bool,
}

/// One order in the administrative all-orders view (summary: product
/// names only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderRow {
    pub user_email: Email,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total_price: Price,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<AdminOrderLine>,
}

/// One summary line of an administrative order row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderLine {
    pub product_id: ProductId,
    pub food_name: String,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_serializes_camel_case() {
        let order = Order {
            order_id: OrderId::new("o1"),
            items: vec![CartEntry {
                product_id: ProductId::new("p1"),
                quantity: 2,
            }],
            total_price: Price::ZERO,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
            payment_method: "cod".to_owned(),
            address: "1 Main St".to_owned(),
            phone: "555".to_owned(),
            user_email: Email::parse("a@x.com").unwrap(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "o1");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert!(json.get("placedAt").is_some());
    }
}
