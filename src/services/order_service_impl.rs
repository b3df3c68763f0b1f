//! `SeaORM` implementation of the `OrderService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::models::order::OrderLine;
use crate::services::order_service::{OrderError, OrderService, OrderView};

pub struct SeaOrmOrderService {
    store: Store,
}

impl SeaOrmOrderService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderService for SeaOrmOrderService {
    async fn place(&self, user_id: i32, lines: Vec<OrderLine>) -> Result<OrderView, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain items".to_string(),
            ));
        }
        if lines.iter().any(|l| l.quantity < 1) {
            return Err(OrderError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let order = self.store.place_order(user_id, lines).await?;

        tracing::info!(
            order_id = order.id,
            user_id,
            total = order.total,
            "Order placed"
        );

        Ok(OrderView::from(order))
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, OrderError> {
        let orders = self.store.list_orders_for_user(user_id).await?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }
}
