//! Product documents in the `products` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshbasket_core::{Email, Price, ProductId};

const fn default_in_stock() -> bool {
    true
}

/// A product listing.
///
/// Immutable after creation except for the stock flag ([`crate::services::catalog`]
/// `set_stock`) and the enumerated editable fields ([`ProductEdit`]).
///
/// Most fields carry serde defaults: an upserted edit (see
/// [`ProductEdit`]) may create a document holding only the editable
/// fields, and older documents in the store may predate newer fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub food_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub quantity: u32,
    pub expire_date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: String,
    /// Email of the lister. Absent on documents created by an upserted edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Email>,
}

/// Fields submitted when creating a product. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub food_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub quantity: u32,
    pub expire_date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub notes: String,
    pub user_email: Email,
}

impl NewProduct {
    /// Materialize a [`Product`] under the given store-assigned id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            food_name: self.food_name,
            category: self.category,
            price: self.price,
            rating: self.rating,
            in_stock: self.in_stock,
            quantity: self.quantity,
            expire_date: self.expire_date,
            location: self.location,
            image_url: self.image_url,
            notes: self.notes,
            user_email: Some(self.user_email),
        }
    }
}

/// The enumerated editable fields of a product.
///
/// An edit replaces exactly these fields and leaves everything else in the
/// stored document untouched. Editing an unknown id upsert-creates a
/// document carrying only these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEdit {
    pub food_name: String,
    pub image_url: String,
    pub quantity: u32,
    pub location: String,
    pub expire_date: DateTime<Utc>,
    pub notes: String,
}

impl ProductEdit {
    /// Apply the edit to an existing product in place.
    pub fn apply_to(&self, product: &mut Product) {
        product.food_name = self.food_name.clone();
        product.image_url = self.image_url.clone();
        product.quantity = self.quantity;
        product.location = self.location.clone();
        product.expire_date = self.expire_date;
        product.notes = self.notes.clone();
    }

    /// Materialize a product from nothing but the editable fields
    /// (the upsert-create path).
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            food_name: self.food_name,
            category: String::new(),
            price: Price::ZERO,
            rating: 0.0,
            in_stock: true,
            quantity: self.quantity,
            expire_date: self.expire_date,
            location: self.location,
            image_url: self.image_url,
            notes: self.notes,
            user_email: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new("p1"),
            food_name: "Sourdough Loaf".to_owned(),
            category: "Bakery".to_owned(),
            price: Price::new(Decimal::new(450, 2)),
            rating: 4.5,
            in_stock: true,
            quantity: 12,
            expire_date: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
            location: "Shelf 3".to_owned(),
            image_url: "https://img.example/loaf.png".to_owned(),
            notes: String::new(),
            user_email: Some(Email::parse("baker@example.com").unwrap()),
        }
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert!(json.get("foodName").is_some());
        assert!(json.get("inStock").is_some());
        assert!(json.get("expireDate").is_some());
        assert!(json.get("userEmail").is_some());
        assert!(json.get("food_name").is_none());
    }

    #[test]
    fn test_deserialize_partial_document() {
        // Documents created by an upserted edit carry only the editable fields
        let doc = serde_json::json!({
            "id": "p9",
            "foodName": "Apples",
            "imageUrl": "",
            "quantity": 3,
            "location": "Bin 1",
            "expireDate": "2026-09-01T00:00:00Z",
            "notes": ""
        });
        let product: Product = serde_json::from_value(doc).unwrap();
        assert_eq!(product.category, "");
        assert!(product.in_stock);
        assert!(product.user_email.is_none());
    }

    #[test]
    fn test_edit_replaces_only_enumerated_fields() {
        let mut product = sample_product();
        let edit = ProductEdit {
            food_name: "Rye Loaf".to_owned(),
            image_url: "https://img.example/rye.png".to_owned(),
            quantity: 5,
            location: "Shelf 1".to_owned(),
            expire_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            notes: "day-old".to_owned(),
        };
        edit.apply_to(&mut product);

        assert_eq!(product.food_name, "Rye Loaf");
        assert_eq!(product.quantity, 5);
        // Untouched fields survive
        assert_eq!(product.category, "Bakery");
        assert_eq!(product.price, Price::new(Decimal::new(450, 2)));
        assert!(product.user_email.is_some());
    }
}
