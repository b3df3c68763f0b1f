use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;

use crate::entities::{orders, products};
use crate::models::order::{OrderItem, OrderLine, OrderStatus};

/// Failures on the order placement path. Stock problems name the product so
/// the caller can report which line failed.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Insufficient stock for {product_name}. Available: {available}")]
    InsufficientStock { product_name: String, available: i32 },

    #[error("Failed to encode order document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// A persisted order with its embedded line items decoded.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: String,
    pub created_at: String,
}

impl OrderRecord {
    fn decode(model: orders::Model) -> Result<Self, serde_json::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&model.items_json)?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            items,
            total: model.total,
            status: model.status,
            created_at: model.created_at,
        })
    }
}

pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Place an order: resolve each line in request order, freeze its name
    /// and unit price, decrement stock, and insert the order row.
    ///
    /// The whole placement runs in one transaction, so a line failing its
    /// stock check rolls back every earlier decrement; there is no partial
    /// state to compensate for.
    pub async fn place(
        &self,
        user_id: i32,
        lines: Vec<OrderLine>,
    ) -> Result<OrderRecord, PlaceOrderError> {
        let result = self
            .conn
            .transaction::<_, orders::Model, PlaceOrderError>(move |txn| {
                Box::pin(async move {
                    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
                    let mut total = 0.0_f64;

                    for line in &lines {
                        let product = products::Entity::find_by_id(line.product_id)
                            .one(txn)
                            .await?
                            .ok_or(PlaceOrderError::ProductNotFound(line.product_id))?;

                        if product.stock < line.quantity {
                            return Err(PlaceOrderError::InsufficientStock {
                                product_name: product.name,
                                available: product.stock,
                            });
                        }

                        items.push(OrderItem {
                            product_id: product.id,
                            product_name: product.name.clone(),
                            quantity: line.quantity,
                            price: product.price,
                        });
                        total += product.price * f64::from(line.quantity);

                        let new_stock = product.stock - line.quantity;
                        let mut active: products::ActiveModel = product.into();
                        active.stock = Set(new_stock);
                        active.update(txn).await?;
                    }

                    let items_json = serde_json::to_string(&items)?;
                    let now = chrono::Utc::now().to_rfc3339();

                    let order = orders::ActiveModel {
                        user_id: Set(user_id),
                        items_json: Set(items_json),
                        total: Set(total),
                        status: Set(OrderStatus::Completed.as_str().to_string()),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(order)
                })
            })
            .await;

        let order = match result {
            Ok(order) => order,
            Err(sea_orm::TransactionError::Connection(e)) => return Err(PlaceOrderError::Db(e)),
            Err(sea_orm::TransactionError::Transaction(e)) => return Err(e),
        };

        Ok(OrderRecord::decode(order)?)
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, PlaceOrderError> {
        let orders = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.conn)
            .await?;

        orders
            .into_iter()
            .map(|o| OrderRecord::decode(o).map_err(PlaceOrderError::Encode))
            .collect()
    }
}
