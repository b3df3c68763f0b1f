//! Domain service for order placement and history.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::db::{OrderRecord, PlaceOrderError};
use crate::models::order::{OrderItem, OrderLine};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Insufficient stock for {product_name}. Available: {available}")]
    InsufficientStock { product_name: String, available: i32 },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<PlaceOrderError> for OrderError {
    fn from(err: PlaceOrderError) -> Self {
        match err {
            PlaceOrderError::ProductNotFound(id) => Self::ProductNotFound(id),
            PlaceOrderError::InsufficientStock {
                product_name,
                available,
            } => Self::InsufficientStock {
                product_name,
                available,
            },
            PlaceOrderError::Encode(e) => Self::Database(e.to_string()),
            PlaceOrderError::Db(e) => Self::Database(e.to_string()),
        }
    }
}

/// A placed order as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: String,
    pub created_at: String,
}

impl From<OrderRecord> for OrderView {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            items: record.items,
            total: record.total,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Convert a requested item list into a priced order, decrementing
    /// stock. All stock checks, decrements and the order insert commit
    /// atomically; a failed line leaves no partial state behind.
    async fn place(&self, user_id: i32, lines: Vec<OrderLine>) -> Result<OrderView, OrderError>;

    /// The user's order history, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, OrderError>;
}
