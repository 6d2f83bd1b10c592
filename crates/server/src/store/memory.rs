//! In-memory document store.
//!
//! Test double for the store traits, and the backing store for local
//! development when no `DATABASE_URL` is configured. Documents keep
//! insertion order, matching the store-order guarantee of the listing
//! operations. Each mutation holds the collection lock for its full
//! duration, mirroring the per-document atomicity of the real store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use freshbasket_core::{Email, ProductId};

use crate::models::{CartEntry, Order, Product, ProductEdit, User};

use super::{ProductStore, StoreResult, UserStore};

/// Mutex-guarded in-memory collections.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.lock().await.clone())
    }

    async fn get(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        let products = self.products.lock().await;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    async fn get_many(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        let products = self.products.lock().await;
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let mut products = self.products.lock().await;
        products.push(product.clone());
        Ok(product)
    }

    async fn update_fields(&self, id: &ProductId, edit: &ProductEdit) -> StoreResult<bool> {
        let mut products = self.products.lock().await;
        if let Some(product) = products.iter_mut().find(|p| &p.id == id) {
            edit.apply_to(product);
            Ok(true)
        } else {
            products.push(edit.clone().into_product(id.clone()));
            Ok(false)
        }
    }

    async fn delete(&self, id: &ProductId) -> StoreResult<bool> {
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|p| &p.id != id);
        Ok(products.len() < before)
    }

    async fn set_stock(&self, id: &ProductId, in_stock: bool) -> StoreResult<u64> {
        let mut products = self.products.lock().await;
        match products.iter_mut().find(|p| &p.id == id) {
            Some(product) => {
                product.in_stock = in_stock;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, email: &Email) -> StoreResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn all(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }

    async fn push_cart_entry(&self, email: &Email, entry: &CartEntry) -> StoreResult<()> {
        let mut users = self.users.lock().await;
        match users.iter_mut().find(|u| &u.email == email) {
            Some(user) => user.cart_items.push(entry.clone()),
            None => {
                let mut user = User::new(email.clone());
                user.cart_items.push(entry.clone());
                users.push(user);
            }
        }
        Ok(())
    }

    async fn increment_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        delta: u32,
    ) -> StoreResult<u64> {
        let mut users = self.users.lock().await;
        let Some(user) = users.iter_mut().find(|u| &u.email == email) else {
            return Ok(0);
        };
        let mut matched = false;
        for entry in user
            .cart_items
            .iter_mut()
            .filter(|e| &e.product_id == product_id)
        {
            // Saturate so a merged quantity can never wrap past u32::MAX
            entry.quantity = entry.quantity.saturating_add(delta);
            matched = true;
        }
        Ok(u64::from(matched))
    }

    async fn set_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        quantity: u32,
    ) -> StoreResult<u64> {
        let mut users = self.users.lock().await;
        let Some(user) = users.iter_mut().find(|u| &u.email == email) else {
            return Ok(0);
        };
        let mut matched = false;
        for entry in user
            .cart_items
            .iter_mut()
            .filter(|e| &e.product_id == product_id)
        {
            entry.quantity = quantity;
            matched = true;
        }
        Ok(u64::from(matched))
    }

    async fn pull_cart_entries(&self, email: &Email, product_id: &ProductId) -> StoreResult<u64> {
        let mut users = self.users.lock().await;
        let Some(user) = users.iter_mut().find(|u| &u.email == email) else {
            return Ok(0);
        };
        let before = user.cart_items.len();
        user.cart_items.retain(|e| &e.product_id != product_id);
        Ok(u64::from(user.cart_items.len() < before))
    }

    async fn append_order_and_clear_cart(&self, email: &Email, order: &Order) -> StoreResult<()> {
        let mut users = self.users.lock().await;
        match users.iter_mut().find(|u| &u.email == email) {
            Some(user) => {
                // Both mutations under one lock hold; never separately visible
                user.orders.push(order.clone());
                user.cart_items.clear();
            }
            None => {
                let mut user = User::new(email.clone());
                user.orders.push(order.clone());
                users.push(user);
            }
        }
        Ok(())
    }
}
