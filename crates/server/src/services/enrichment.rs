//! Order enrichment: joins stored order line items back against the
//! catalog to produce display-ready order views.
//!
//! Orders reference products weakly (id only); a line item whose product
//! has been deleted is still returned, carrying the `unavailable` marker
//! instead of being dropped, so order history keeps its full length.
//!
//! Product lookups are batched: all referenced ids per request are
//! collected and fetched in one multi-get, never one lookup per line.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use freshbasket_core::{Email, Price, ProductId};

use crate::error::Result;
use crate::models::order::UNAVAILABLE;
use crate::models::{AdminOrderLine, AdminOrderRow, Order, OrderLineView, OrderView, Product};
use crate::store::{ProductStore, UserStore};

/// Read-only enrichment over users' order histories.
#[derive(Clone)]
pub struct OrderEnrichment {
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
}

impl OrderEnrichment {
    /// Create a new enrichment service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>, users: Arc<dyn UserStore>) -> Self {
        Self { products, users }
    }

    /// Every order for the user, line items enriched with current
    /// product display fields. An unknown user has no orders.
    #[instrument(skip(self))]
    pub async fn user_orders(&self, email: &Email) -> Result<Vec<OrderView>> {
        let orders = match self.users.get(email).await? {
            Some(user) => user.orders,
            None => Vec::new(),
        };

        let lookup = self.product_lookup(&orders).await?;
        Ok(orders
            .into_iter()
            .map(|order| enrich_order(order, &lookup))
            .collect())
    }

    /// Administrative view: every user's order history flattened into
    /// one sequence, each line enriched with the product name only.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<AdminOrderRow>> {
        let users = self.users.all().await?;
        let orders: Vec<Order> = users.into_iter().flat_map(|u| u.orders).collect();

        let lookup = self.product_lookup(&orders).await?;
        Ok(orders
            .into_iter()
            .map(|order| summarize_order(order, &lookup))
            .collect())
    }

    /// One multi-get for every product id referenced by `orders`.
    async fn product_lookup(&self, orders: &[Order]) -> Result<HashMap<ProductId, Product>> {
        let mut ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.product_id.clone()))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let products = self.products.get_many(&ids).await?;
        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}

fn enrich_order(order: Order, lookup: &HashMap<ProductId, Product>) -> OrderView {
    let items = order
        .items
        .into_iter()
        .map(|item| match lookup.get(&item.product_id) {
            Some(product) => OrderLineView {
                product_id: item.product_id,
                food_name: product.food_name.clone(),
                image_url: product.image_url.clone(),
                price: product.price,
                quantity: item.quantity,
                available: true,
            },
            None => OrderLineView {
                product_id: item.product_id,
                food_name: UNAVAILABLE.to_owned(),
                image_url: UNAVAILABLE.to_owned(),
                price: Price::ZERO,
                quantity: item.quantity,
                available: false,
            },
        })
        .collect();

    OrderView {
        order_id: order.order_id,
        status: order.status,
        total_price: order.total_price,
        placed_at: order.placed_at,
        payment_method: order.payment_method,
        address: order.address,
        phone: order.phone,
        items,
    }
}

fn summarize_order(order: Order, lookup: &HashMap<ProductId, Product>) -> AdminOrderRow {
    let items = order
        .items
        .into_iter()
        .map(|item| {
            let food_name = lookup
                .get(&item.product_id)
                .map_or_else(|| UNAVAILABLE.to_owned(), |p| p.food_name.clone());
            AdminOrderLine {
                product_id: item.product_id,
                food_name,
                quantity: item.quantity,
            }
        })
        .collect();

    AdminOrderRow {
        user_email: order.user_email,
        order_id: order.order_id,
        status: order.status,
        total_price: order.total_price,
        placed_at: order.placed_at,
        items,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CartEntry;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use freshbasket_core::{OrderId, OrderStatus};
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            food_name: name.to_owned(),
            category: "misc".to_owned(),
            price: Price::new(Decimal::new(150, 2)),
            rating: 0.0,
            in_stock: true,
            quantity: 1,
            expire_date: Utc::now(),
            location: String::new(),
            image_url: "img".to_owned(),
            notes: String::new(),
            user_email: None,
        }
    }

    fn order(email: &Email, items: Vec<(&str, u32)>) -> Order {
        Order {
            order_id: OrderId::generate(),
            items: items
                .into_iter()
                .map(|(id, quantity)| CartEntry {
                    product_id: ProductId::new(id),
                    quantity,
                })
                .collect(),
            total_price: Price::ZERO,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
            payment_method: "cod".to_owned(),
            address: "1 Main St".to_owned(),
            phone: "555".to_owned(),
            user_email: email.clone(),
        }
    }

    #[tokio::test]
    async fn test_user_orders_enriched_with_product_fields() {
        let store = Arc::new(MemoryStore::new());
        let email = Email::parse("a@x.com").unwrap();
        store.insert(product("p1", "Loaf")).await.unwrap();
        store
            .append_order_and_clear_cart(&email, &order(&email, vec![("p1", 2)]))
            .await
            .unwrap();

        let enrichment = OrderEnrichment::new(store.clone(), store);
        let views = enrichment.user_orders(&email).await.unwrap();

        assert_eq!(views.len(), 1);
        let line = &views[0].items[0];
        assert_eq!(line.food_name, "Loaf");
        assert_eq!(line.quantity, 2);
        assert!(line.available);
    }

    #[tokio::test]
    async fn test_deleted_product_yields_unavailable_marker() {
        let store = Arc::new(MemoryStore::new());
        let email = Email::parse("a@x.com").unwrap();
        store
            .append_order_and_clear_cart(&email, &order(&email, vec![("gone", 3)]))
            .await
            .unwrap();

        let enrichment = OrderEnrichment::new(store.clone(), store);
        let views = enrichment.user_orders(&email).await.unwrap();

        // History keeps its full length; the line carries the marker
        assert_eq!(views[0].items.len(), 1);
        let line = &views[0].items[0];
        assert_eq!(line.food_name, UNAVAILABLE);
        assert_eq!(line.price, Price::ZERO);
        assert_eq!(line.quantity, 3);
        assert!(!line.available);
    }

    #[tokio::test]
    async fn test_all_orders_flattens_across_users() {
        let store = Arc::new(MemoryStore::new());
        store.insert(product("p1", "Loaf")).await.unwrap();

        let alice = Email::parse("alice@x.com").unwrap();
        let bob = Email::parse("bob@x.com").unwrap();
        store
            .append_order_and_clear_cart(&alice, &order(&alice, vec![("p1", 1)]))
            .await
            .unwrap();
        store
            .append_order_and_clear_cart(&bob, &order(&bob, vec![("p1", 4)]))
            .await
            .unwrap();

        let enrichment = OrderEnrichment::new(store.clone(), store);
        let rows = enrichment.all_orders().await.unwrap();

        assert_eq!(rows.len(), 2);
        let emails: Vec<&str> = rows.iter().map(|r| r.user_email.as_str()).collect();
        assert!(emails.contains(&"alice@x.com"));
        assert!(emails.contains(&"bob@x.com"));
        assert_eq!(rows[0].items[0].food_name, "Loaf");
    }
}
