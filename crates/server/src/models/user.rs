//! User documents in the `users` collection.
//!
//! The user document is the sole owner of both the embedded cart and the
//! order history. There is no separate cart or order collection.

use serde::{Deserialize, Serialize};

use freshbasket_core::{Email, Price, ProductId};

use super::order::Order;

/// A user document, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub cart_items: Vec<CartEntry>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl User {
    /// A fresh user document with an empty cart and no orders.
    #[must_use]
    pub const fn new(email: Email) -> Self {
        Self {
            email,
            phone: None,
            address: None,
            cart_items: Vec::new(),
            orders: Vec::new(),
        }
    }
}

/// One line of a cart: a weak reference to a product plus a quantity.
///
/// Invariant (enforced by the cart manager under the default merge
/// policy): at most one entry per distinct product id per user, and
/// `quantity >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart entry joined against current product data for display.
///
/// Entries whose product no longer exists are dropped from cart views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub food_name: String,
    pub price: Price,
    pub image_url: String,
    pub in_stock: bool,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_document_defaults() {
        // Documents written before carts existed have neither array field
        let doc = serde_json::json!({ "email": "a@x.com" });
        let user: User = serde_json::from_value(doc).unwrap();
        assert!(user.cart_items.is_empty());
        assert!(user.orders.is_empty());
    }

    #[test]
    fn test_cart_entry_field_names() {
        let entry = CartEntry {
            product_id: ProductId::new("p1"),
            quantity: 2,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "productId": "p1", "quantity": 2 }));
    }
}
