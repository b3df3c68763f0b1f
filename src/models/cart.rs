use serde::{Deserialize, Serialize};

use crate::entities::products;

/// Denormalized copy of product fields stored alongside a cart line for
/// display and drift detection. Never authoritative for pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub name: String,

    pub price: f64,

    pub image_url: String,

    pub category: String,
}

impl ProductSnapshot {
    #[must_use]
    pub fn of(product: &products::Model) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
        }
    }
}

/// One line of a cart, embedded in the cart document.
///
/// `snapshot` is refreshed from the live product on every add/update and on
/// every cart read that finds the product; carts written before snapshots
/// existed deserialize with `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: i32,

    pub quantity: i32,

    #[serde(default)]
    pub snapshot: Option<ProductSnapshot>,
}

impl CartItem {
    #[must_use]
    pub fn new(product: &products::Model, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            quantity,
            snapshot: Some(ProductSnapshot::of(product)),
        }
    }
}
