//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;

use crate::db::{NewProduct, ProductFilter, ProductPatch, Store};
use crate::entities::products;
use crate::services::catalog_service::{CatalogError, CatalogService, ProductPage};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_bounds(price: Option<f64>, stock: Option<i32>) -> Result<(), CatalogError> {
        if let Some(price) = price
            && (price.is_nan() || price < 0.0)
        {
            return Err(CatalogError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }
        if let Some(stock) = stock
            && stock < 0
        {
            return Err(CatalogError::Validation(
                "Stock must be a non-negative integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(
        &self,
        filter: ProductFilter,
        page: u64,
        per_page: u64,
    ) -> Result<ProductPage, CatalogError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let (products, total) = self.store.list_products(&filter, page, per_page).await?;

        Ok(ProductPage {
            products,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    async fn get(&self, id: i32) -> Result<products::Model, CatalogError> {
        self.store
            .get_product(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.product_categories().await?)
    }

    async fn create(&self, new: NewProduct) -> Result<products::Model, CatalogError> {
        if new.name.is_empty() || new.category.is_empty() {
            return Err(CatalogError::Validation(
                "Missing required fields".to_string(),
            ));
        }
        Self::validate_bounds(Some(new.price), Some(new.stock))?;

        Ok(self.store.create_product(new).await?)
    }

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<products::Model, CatalogError> {
        Self::validate_bounds(patch.price, patch.stock)?;

        self.store
            .update_product(id, patch)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        if self.store.delete_product(id).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound(id))
        }
    }
}
