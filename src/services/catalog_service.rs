//! Domain service for the product catalog: paginated filtered listing,
//! distinct categories, and admin-gated mutation.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::{NewProduct, ProductFilter, ProductPatch};
use crate::entities::products;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// One page of catalog results.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<products::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list(
        &self,
        filter: ProductFilter,
        page: u64,
        per_page: u64,
    ) -> Result<ProductPage, CatalogError>;

    async fn get(&self, id: i32) -> Result<products::Model, CatalogError>;

    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    async fn create(&self, new: NewProduct) -> Result<products::Model, CatalogError>;

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<products::Model, CatalogError>;

    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
}
