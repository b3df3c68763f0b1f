use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::products;

/// Catalog filters for the paginated listing. Category is an exact match,
/// search a case-insensitive substring match on the name; both AND together.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub stock: i32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn condition(filter: &ProductFilter) -> Condition {
        let mut cond = Condition::all();
        if let Some(category) = &filter.category {
            cond = cond.add(products::Column::Category.eq(category.clone()));
        }
        if let Some(search) = &filter.search {
            // SQLite LIKE is case-insensitive for ASCII
            cond = cond.add(products::Column::Name.contains(search.clone()));
        }
        cond
    }

    /// Page slice plus the total matching count. `page` is 1-indexed.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<products::Model>, u64)> {
        let cond = Self::condition(filter);

        let total = products::Entity::find()
            .filter(cond.clone())
            .count(&self.conn)
            .await
            .context("Failed to count products")?;

        let items = products::Entity::find()
            .filter(cond)
            .order_by_asc(products::Column::Id)
            .offset(page.saturating_sub(1) * per_page)
            .limit(per_page)
            .all(&self.conn)
            .await
            .context("Failed to query products")?;

        Ok((items, total))
    }

    pub async fn get(&self, id: i32) -> Result<Option<products::Model>> {
        products::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product by ID")
    }

    /// Distinct category values currently in use.
    pub async fn categories(&self) -> Result<Vec<String>> {
        products::Entity::find()
            .select_only()
            .column(products::Column::Category)
            .distinct()
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to query product categories")
    }

    pub async fn create(&self, new: NewProduct) -> Result<products::Model> {
        products::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            category: Set(new.category),
            image_url: Set(new.image_url),
            stock: Set(new.stock),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert product")
    }

    /// Apply a partial update; returns `None` when the product is gone.
    pub async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<products::Model>> {
        let Some(product) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = product.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(stock) = patch.stock {
            active.stock = Set(stock);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update product")?;

        Ok(Some(updated))
    }

    /// Delete a product; returns whether a row was removed. Dangling cart
    /// references are expected and resolved by cart reconciliation.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        products::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count products")
    }
}
