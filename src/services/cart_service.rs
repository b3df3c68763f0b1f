//! Domain service for the per-user cart.
//!
//! The cart stores a denormalized snapshot of each product alongside the
//! quantity. Reads reconcile those snapshots against the live catalog:
//! drift is surfaced as sync messages and the stored snapshot is refreshed
//! as a side effect, so every read reports freshly computed drift.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Item not in cart")]
    ItemNotFound,

    #[error("{0}")]
    OutOfStock(String),

    /// Requested quantity exceeds current stock. `current_quantity` is the
    /// pre-update cart quantity on the merge path, absent otherwise.
    #[error("{message}")]
    InsufficientStock {
        message: String,
        stock: i32,
        current_quantity: Option<i32>,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CartError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Kind of catalog drift detected on a cart read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    PriceChanged,
    NameChanged,
    ProductDeleted,
}

/// Structured notice describing a mismatch between a cart line's stored
/// snapshot and the live product.
#[derive(Debug, Clone, Serialize)]
pub struct SyncMessage {
    #[serde(rename = "type")]
    pub kind: SyncKind,

    pub product_id: i32,

    pub product_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

/// One rendered cart line. Price and stock are live values for available
/// items and snapshot fallbacks for deleted products.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: i32,
    pub product_name: String,
    pub price: f64,
    pub quantity: i32,
    pub stock: i32,
    pub image_url: String,
    pub category: String,
    pub is_available: bool,
    pub has_stock_issue: bool,
    pub price_changed: bool,
    pub name_changed: bool,
}

/// The reconciled cart as returned to clients. `total` is always recomputed
/// from current prices; unavailable items contribute zero.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: f64,
    pub sync_messages: Vec<SyncMessage>,
}

#[async_trait]
pub trait CartService: Send + Sync {
    /// Read the cart, reconciling snapshots against the live catalog.
    /// Creates the cart lazily on first access.
    async fn get_cart(&self, user_id: i32) -> Result<CartView, CartError>;

    /// Add a quantity of a product, merging with an existing line.
    async fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, CartError>;

    /// Set the quantity of an existing line.
    async fn update_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, CartError>;

    /// Remove a line; idempotent, succeeds even when the line is absent.
    async fn remove_item(&self, user_id: i32, product_id: i32) -> Result<CartView, CartError>;

    /// Empty the cart; no-op when it does not exist yet.
    async fn clear(&self, user_id: i32) -> Result<(), CartError>;
}
