//! End-to-end tests for the cart routes.

use axum::http::StatusCode;
use serde_json::json;

use freshbasket_integration_tests::{TestApp, create_product, product_body};
use freshbasket_server::services::CartPolicy;

const EMAIL: &str = "a@x.com";

#[tokio::test]
async fn test_add_then_cart_shows_enriched_entry() {
    let app = TestApp::new();
    let id = create_product(&app, "Sourdough Loaf", "Bakery").await;

    let (status, body) = app
        .post(
            "/cart/add",
            &json!({"email": EMAIL, "productId": id, "quantity": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart.as_array().map(Vec::len), Some(1));
    assert_eq!(cart[0]["productId"], id.as_str());
    assert_eq!(cart[0]["foodName"], "Sourdough Loaf");
    assert_eq!(cart[0]["price"], "4.50");
    assert_eq!(cart[0]["inStock"], true);
    assert_eq!(cart[0]["quantity"], 2);
}

#[tokio::test]
async fn test_add_defaults_quantity_to_one() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;

    app.post("/cart/add", &json!({"email": EMAIL, "productId": id}))
        .await;

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart[0]["quantity"], 1);
}

#[tokio::test]
async fn test_repeated_add_merges_quantities() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;

    for quantity in [2, 3] {
        app.post(
            "/cart/add",
            &json!({"email": EMAIL, "productId": id, "quantity": quantity}),
        )
        .await;
    }

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(1));
    assert_eq!(cart[0]["quantity"], 5);
}

#[tokio::test]
async fn test_append_policy_keeps_duplicate_entries() {
    let app = TestApp::with_cart_policy(CartPolicy::Append);
    let id = create_product(&app, "Loaf", "Bakery").await;

    for _ in 0..2 {
        app.post(
            "/cart/add",
            &json!({"email": EMAIL, "productId": id, "quantity": 1}),
        )
        .await;
    }

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_out_of_stock_is_200_with_error_field() {
    let app = TestApp::new();
    let mut body = product_body("Loaf", "Bakery");
    body["inStock"] = json!(false);
    let (_, created) = app.post("/products", &body).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let (status, response) = app
        .post(
            "/cart/add",
            &json!({"email": EMAIL, "productId": id, "quantity": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "out_of_stock");

    // Nothing was written
    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_add_unknown_product_is_404() {
    let app = TestApp::new();
    let (status, _) = app
        .post(
            "/cart/add",
            &json!({"email": EMAIL, "productId": "ghost", "quantity": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_quantity_reflected_exactly() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;
    app.post("/cart/add", &json!({"email": EMAIL, "productId": id}))
        .await;

    let (status, body) = app
        .patch(
            "/cart/quantity",
            &json!({"email": EMAIL, "productId": id, "quantity": 7}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart[0]["quantity"], 7);
}

#[tokio::test]
async fn test_update_quantity_rejects_non_positive() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;
    app.post("/cart/add", &json!({"email": EMAIL, "productId": id}))
        .await;

    for bad in [0, -3] {
        let (status, _) = app
            .patch(
                "/cart/quantity",
                &json!({"email": EMAIL, "productId": id, "quantity": bad}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_update_quantity_missing_entry_is_404() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;

    let (status, _) = app
        .patch(
            "/cart/quantity",
            &json!({"email": EMAIL, "productId": id, "quantity": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = TestApp::new();
    let id = create_product(&app, "Loaf", "Bakery").await;
    app.post("/cart/add", &json!({"email": EMAIL, "productId": id}))
        .await;

    let (status, _) = app
        .patch("/cart/remove", &json!({"email": EMAIL, "productId": id}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(0));

    // Removing again still succeeds
    let (status, _) = app
        .patch("/cart/remove", &json!({"email": EMAIL, "productId": id}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cart_drops_entries_for_deleted_products() {
    let app = TestApp::new();
    let keep = create_product(&app, "Loaf", "Bakery").await;
    let gone = create_product(&app, "Apples", "Produce").await;
    for id in [&keep, &gone] {
        app.post("/cart/add", &json!({"email": EMAIL, "productId": id}))
            .await;
    }

    app.delete(&format!("/products/{gone}")).await;

    let (_, cart) = app.get(&format!("/users/{EMAIL}/cart")).await;
    assert_eq!(cart.as_array().map(Vec::len), Some(1));
    assert_eq!(cart[0]["productId"], keep.as_str());
}

#[tokio::test]
async fn test_unknown_user_has_empty_cart() {
    let app = TestApp::new();
    let (status, cart) = app.get("/users/nobody@x.com/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart.as_array().map(Vec::len), Some(0));
}
