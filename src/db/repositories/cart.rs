use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::carts;
use crate::models::cart::CartItem;

/// A user's cart with its embedded items decoded.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartItem>,
    pub updated_at: String,
}

impl CartRecord {
    fn decode(model: carts::Model) -> Result<Self> {
        let items: Vec<CartItem> = serde_json::from_str(&model.items_json)
            .context("Failed to decode cart items document")?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            items,
            updated_at: model.updated_at,
        })
    }
}

pub struct CartRepository {
    conn: DatabaseConnection,
}

impl CartRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<CartRecord>> {
        let cart = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart by user")?;

        cart.map(CartRecord::decode).transpose()
    }

    /// Carts are created lazily on first access.
    pub async fn get_or_create(&self, user_id: i32) -> Result<CartRecord> {
        if let Some(cart) = self.find_by_user(user_id).await? {
            return Ok(cart);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let cart = carts::ActiveModel {
            user_id: Set(user_id),
            items_json: Set("[]".to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create cart")?;

        CartRecord::decode(cart)
    }

    /// Overwrite the cart's item document in a single row write and bump
    /// `updated_at`.
    pub async fn save_items(&self, cart_id: i32, items: &[CartItem]) -> Result<()> {
        let items_json =
            serde_json::to_string(items).context("Failed to encode cart items document")?;
        let now = chrono::Utc::now().to_rfc3339();

        let active = carts::ActiveModel {
            id: Set(cart_id),
            items_json: Set(items_json),
            updated_at: Set(now),
            ..Default::default()
        };
        active
            .update(&self.conn)
            .await
            .context("Failed to save cart items")?;

        Ok(())
    }
}
