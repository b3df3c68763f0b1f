use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::products;
use crate::models::cart::CartItem;
use crate::models::order::OrderLine;

pub mod migrator;
pub mod repositories;

pub use repositories::cart::CartRecord;
pub use repositories::order::{OrderRecord, PlaceOrderError};
pub use repositories::product::{NewProduct, ProductFilter, ProductPatch};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn cart_repo(&self) -> repositories::cart::CartRepository {
        repositories::cart::CartRepository::new(self.conn.clone())
    }

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password_hash, is_admin)
            .await
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo()
            .username_or_email_taken(username, email)
            .await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<products::Model>, u64)> {
        self.product_repo().list(filter, page, per_page).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<products::Model>> {
        self.product_repo().get(id).await
    }

    pub async fn product_categories(&self) -> Result<Vec<String>> {
        self.product_repo().categories().await
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<products::Model> {
        self.product_repo().create(new).await
    }

    pub async fn update_product(
        &self,
        id: i32,
        patch: ProductPatch,
    ) -> Result<Option<products::Model>> {
        self.product_repo().update(id, patch).await
    }

    pub async fn delete_product(&self, id: i32) -> Result<bool> {
        self.product_repo().delete(id).await
    }

    pub async fn product_count(&self) -> Result<u64> {
        self.product_repo().count().await
    }

    // ========================================================================
    // Carts
    // ========================================================================

    pub async fn find_cart_by_user(&self, user_id: i32) -> Result<Option<CartRecord>> {
        self.cart_repo().find_by_user(user_id).await
    }

    pub async fn get_or_create_cart(&self, user_id: i32) -> Result<CartRecord> {
        self.cart_repo().get_or_create(user_id).await
    }

    pub async fn save_cart_items(&self, cart_id: i32, items: &[CartItem]) -> Result<()> {
        self.cart_repo().save_items(cart_id, items).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub async fn place_order(
        &self,
        user_id: i32,
        lines: Vec<OrderLine>,
    ) -> Result<OrderRecord, PlaceOrderError> {
        self.order_repo().place(user_id, lines).await
    }

    pub async fn list_orders_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<OrderRecord>, PlaceOrderError> {
        self.order_repo().list_for_user(user_id).await
    }
}
