//! Integration test harness for the `FreshBasket` backend.
//!
//! Builds the real router over the in-memory store and drives it with
//! `tower::ServiceExt::oneshot`, one request per call, no listening
//! socket and no database required.
//!
//! # Test Categories
//!
//! - `catalog` - Product CRUD, listing filters, and the derived views
//! - `cart_flow` - Add/merge/update/remove cart flows
//! - `order_flow` - Order placement, enrichment, and immutability

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use freshbasket_server::config::ServerConfig;
use freshbasket_server::routes;
use freshbasket_server::services::CartPolicy;
use freshbasket_server::state::AppState;
use freshbasket_server::store::MemoryStore;

/// The backend router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build the app with the default (merge) cart policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cart_policy(CartPolicy::Merge)
    }

    /// Build the app with an explicit cart policy.
    #[must_use]
    pub fn with_cart_policy(policy: CartPolicy) -> Self {
        let config = ServerConfig {
            database_url: None,
            host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0,
            cart_policy: policy,
            sentry_dsn: None,
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(&config, store.clone(), store);
        let router = routes::routes().with_state(state);

        Self { router }
    }

    /// Send one request and return the status plus the parsed JSON body
    /// (or `Value::Null` for an empty body).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder
                    .body(Body::from(
                        serde_json::to_vec(json).expect("serialize request body"),
                    ))
                    .expect("build request")
            }
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.request("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }
}

/// A well-formed product creation body, overridable per test.
#[must_use]
pub fn product_body(name: &str, category: &str) -> Value {
    serde_json::json!({
        "foodName": name,
        "category": category,
        "price": "4.50",
        "rating": 4.0,
        "inStock": true,
        "quantity": 10,
        "expireDate": "2026-09-01T00:00:00Z",
        "location": "Shelf 3",
        "imageUrl": "https://img.example/item.png",
        "notes": "",
        "userEmail": "lister@example.com"
    })
}

/// Create a product and return its store-assigned id.
pub async fn create_product(app: &TestApp, name: &str, category: &str) -> String {
    let (status, body) = app.post("/products", &product_body(name, category)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"]
        .as_str()
        .expect("created product has an id")
        .to_owned()
}
