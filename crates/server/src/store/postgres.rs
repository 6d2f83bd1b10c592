//! `PostgreSQL`-backed document store.
//!
//! Each collection is a two-column table: a text primary key and a
//! `JSONB` document. All queries are runtime `sqlx::query` calls (no
//! compile-time macros), so the crate builds without a live database.
//!
//! Every mutation is a single SQL statement. Postgres row-level
//! atomicity then covers the one correctness-critical invariant: the
//! order-append + cart-clear pair in
//! [`append_order_and_clear_cart`](PgStore::append_order_and_clear_cart)
//! is one `UPDATE`, never two.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::Row;
use sqlx::postgres::{PgPoolOptions, PgRow};

use freshbasket_core::{Email, ProductId};

use crate::models::{CartEntry, Order, Product, ProductEdit, User};

use super::{ProductStore, StoreError, StoreResult, UserStore};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the collection tables if they do not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the DDL fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS products (
            id  TEXT PRIMARY KEY,
            doc JSONB NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            email TEXT PRIMARY KEY,
            doc   JSONB NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Document store over `PostgreSQL` `JSONB` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_doc<T: serde::de::DeserializeOwned>(row: &PgRow) -> StoreResult<T> {
    let doc: serde_json::Value = row.try_get("doc")?;
    serde_json::from_value(doc).map_err(|e| StoreError::Corruption(e.to_string()))
}

fn encode_doc<T: serde::Serialize>(value: &T) -> StoreResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Corruption(e.to_string()))
}

#[async_trait]
impl ProductStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT doc FROM products")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_doc).collect()
    }

    async fn get(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT doc FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_doc).transpose()
    }

    async fn get_many(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<&str> = ids.iter().map(ProductId::as_str).collect();
        let rows = sqlx::query("SELECT doc FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_doc).collect()
    }

    async fn insert(&self, product: Product) -> StoreResult<Product> {
        let doc = encode_doc(&product)?;
        sqlx::query("INSERT INTO products (id, doc) VALUES ($1, $2)")
            .bind(product.id.as_str())
            .bind(doc)
            .execute(&self.pool)
            .await?;
        Ok(product)
    }

    async fn update_fields(&self, id: &ProductId, edit: &ProductEdit) -> StoreResult<bool> {
        // On conflict the JSONB || merge replaces only the edit's keys;
        // on insert the document is created from the edit alone. A
        // nonzero xmax distinguishes the conflict-update path from a
        // fresh insert.
        let patch = encode_doc(edit)?;
        let row = sqlx::query(
            r"
            INSERT INTO products (id, doc)
            VALUES ($1, $2::jsonb || jsonb_build_object('id', $1::text))
            ON CONFLICT (id) DO UPDATE
            SET doc = products.doc || $2::jsonb
            RETURNING (NOT (xmax = 0)) AS modified
            ",
        )
        .bind(id.as_str())
        .bind(patch)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("modified")?)
    }

    async fn delete(&self, id: &ProductId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_stock(&self, id: &ProductId, in_stock: bool) -> StoreResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET doc = jsonb_set(doc, '{inStock}', to_jsonb($2::boolean))
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .bind(in_stock)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get(&self, email: &Email) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_doc).transpose()
    }

    async fn all(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT doc FROM users")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_doc).collect()
    }

    async fn push_cart_entry(&self, email: &Email, entry: &CartEntry) -> StoreResult<()> {
        let entry = encode_doc(entry)?;
        sqlx::query(
            r"
            INSERT INTO users (email, doc)
            VALUES ($1, jsonb_build_object(
                'email', $1::text,
                'cartItems', jsonb_build_array($2::jsonb),
                'orders', '[]'::jsonb))
            ON CONFLICT (email) DO UPDATE
            SET doc = jsonb_set(
                users.doc,
                '{cartItems}',
                COALESCE(users.doc->'cartItems', '[]'::jsonb) || $2::jsonb)
            ",
        )
        .bind(email.as_str())
        .bind(entry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn increment_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        delta: u32,
    ) -> StoreResult<u64> {
        // LEAST caps the sum at the u32 ceiling so the stored quantity
        // always deserializes back into the model
        let result = sqlx::query(
            r"
            UPDATE users
            SET doc = jsonb_set(doc, '{cartItems}', (
                SELECT COALESCE(jsonb_agg(
                    CASE WHEN entry->>'productId' = $2
                         THEN jsonb_set(entry, '{quantity}',
                              to_jsonb(LEAST(
                                  (entry->>'quantity')::bigint + $3,
                                  4294967295)))
                         ELSE entry
                    END), '[]'::jsonb)
                FROM jsonb_array_elements(doc->'cartItems') AS entry))
            WHERE email = $1
              AND EXISTS (
                SELECT 1 FROM jsonb_array_elements(doc->'cartItems') AS entry
                WHERE entry->>'productId' = $2)
            ",
        )
        .bind(email.as_str())
        .bind(product_id.as_str())
        .bind(i64::from(delta))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_cart_quantity(
        &self,
        email: &Email,
        product_id: &ProductId,
        quantity: u32,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET doc = jsonb_set(doc, '{cartItems}', (
                SELECT COALESCE(jsonb_agg(
                    CASE WHEN entry->>'productId' = $2
                         THEN jsonb_set(entry, '{quantity}', to_jsonb($3::bigint))
                         ELSE entry
                    END), '[]'::jsonb)
                FROM jsonb_array_elements(doc->'cartItems') AS entry))
            WHERE email = $1
              AND EXISTS (
                SELECT 1 FROM jsonb_array_elements(doc->'cartItems') AS entry
                WHERE entry->>'productId' = $2)
            ",
        )
        .bind(email.as_str())
        .bind(product_id.as_str())
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn pull_cart_entries(&self, email: &Email, product_id: &ProductId) -> StoreResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET doc = jsonb_set(doc, '{cartItems}', (
                SELECT COALESCE(jsonb_agg(entry), '[]'::jsonb)
                FROM jsonb_array_elements(doc->'cartItems') AS entry
                WHERE entry->>'productId' <> $2))
            WHERE email = $1
              AND EXISTS (
                SELECT 1 FROM jsonb_array_elements(doc->'cartItems') AS entry
                WHERE entry->>'productId' = $2)
            ",
        )
        .bind(email.as_str())
        .bind(product_id.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn append_order_and_clear_cart(&self, email: &Email, order: &Order) -> StoreResult<()> {
        // One statement: the order append and the cart clear share a
        // single row update, so neither is ever visible without the other.
        let order = encode_doc(order)?;
        sqlx::query(
            r"
            INSERT INTO users (email, doc)
            VALUES ($1, jsonb_build_object(
                'email', $1::text,
                'cartItems', '[]'::jsonb,
                'orders', jsonb_build_array($2::jsonb)))
            ON CONFLICT (email) DO UPDATE
            SET doc = jsonb_set(
                jsonb_set(
                    users.doc,
                    '{orders}',
                    COALESCE(users.doc->'orders', '[]'::jsonb) || $2::jsonb),
                '{cartItems}', '[]'::jsonb)
            ",
        )
        .bind(email.as_str())
        .bind(order)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
