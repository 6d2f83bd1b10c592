//! Order placement: converts a user's current cart into an immutable
//! order record.
//!
//! The only writer of a user's `orders` sequence, and the only code path
//! allowed to empty a cart as a side effect. The order append and the
//! cart clear go through one document-level store update, so a crash
//! between the two is never observable.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use freshbasket_core::{Email, OrderId, OrderStatus, Price};

use crate::error::Result;
use crate::models::Order;
use crate::store::UserStore;

/// Fields submitted when placing an order.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    pub payment_method: String,
    pub total_price: Price,
}

/// Outcome of a place-order request.
///
/// `EmptyCart` is an expected business condition, not an error; the
/// HTTP layer renders it as a 200 with an `error` field.
#[derive(Debug, Clone)]
pub enum PlaceOrderOutcome {
    Placed(Order),
    EmptyCart,
}

/// Order placement service.
#[derive(Clone)]
pub struct OrderPlacement {
    users: Arc<dyn UserStore>,
}

impl OrderPlacement {
    /// Create a new placement service over the given user store.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Place an order from the user's current cart.
    ///
    /// On success the cart is empty afterwards; on any failure it is
    /// unchanged. The snapshot copies the cart entries by value: later
    /// product edits or deletions never alter a placed order.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn place(&self, request: PlaceOrderRequest) -> Result<PlaceOrderOutcome> {
        let cart_items = match self.users.get(&request.email).await? {
            Some(user) => user.cart_items,
            None => Vec::new(),
        };

        if cart_items.is_empty() {
            return Ok(PlaceOrderOutcome::EmptyCart);
        }

        let order = Order {
            order_id: OrderId::generate(),
            items: cart_items,
            total_price: request.total_price,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
            payment_method: request.payment_method,
            address: request.address,
            phone: request.phone_number,
            user_email: request.email.clone(),
        };

        self.users
            .append_order_and_clear_cart(&request.email, &order)
            .await?;

        tracing::info!(order_id = %order.order_id, "Order placed");
        Ok(PlaceOrderOutcome::Placed(order))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CartEntry;
    use crate::store::{MemoryStore, UserStore};
    use freshbasket_core::ProductId;
    use rust_decimal::Decimal;

    fn email() -> Email {
        Email::parse("a@x.com").unwrap()
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            email: email(),
            phone_number: "555".to_owned(),
            address: "1 Main St".to_owned(),
            payment_method: "cod".to_owned(),
            total_price: Price::new(Decimal::new(2000, 2)),
        }
    }

    #[tokio::test]
    async fn test_place_snapshots_cart_and_clears_it() {
        let store = Arc::new(MemoryStore::new());
        store
            .push_cart_entry(
                &email(),
                &CartEntry {
                    product_id: ProductId::new("p1"),
                    quantity: 2,
                },
            )
            .await
            .unwrap();

        let placement = OrderPlacement::new(store.clone());
        let outcome = placement.place(request()).await.unwrap();

        let PlaceOrderOutcome::Placed(order) = outcome else {
            panic!("expected order to be placed");
        };
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.items,
            vec![CartEntry {
                product_id: ProductId::new("p1"),
                quantity: 2,
            }]
        );
        assert_eq!(order.total_price, Price::new(Decimal::new(2000, 2)));

        let user = UserStore::get(store.as_ref(), &email()).await.unwrap().unwrap();
        assert!(user.cart_items.is_empty());
        assert_eq!(user.orders.len(), 1);
        assert_eq!(user.orders[0].order_id, order.order_id);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected_without_side_effects() {
        let store = Arc::new(MemoryStore::new());
        let placement = OrderPlacement::new(store.clone());

        let outcome = placement.place(request()).await.unwrap();
        assert!(matches!(outcome, PlaceOrderOutcome::EmptyCart));

        // No order was appended, no user document was created
        assert!(UserStore::get(store.as_ref(), &email()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_order_ids_are_unique_per_user() {
        let store = Arc::new(MemoryStore::new());
        let placement = OrderPlacement::new(store.clone());

        for _ in 0..2 {
            store
                .push_cart_entry(
                    &email(),
                    &CartEntry {
                        product_id: ProductId::new("p1"),
                        quantity: 1,
                    },
                )
                .await
                .unwrap();
            placement.place(request()).await.unwrap();
        }

        let user = UserStore::get(store.as_ref(), &email()).await.unwrap().unwrap();
        assert_eq!(user.orders.len(), 2);
        assert_ne!(user.orders[0].order_id, user.orders[1].order_id);
    }
}
