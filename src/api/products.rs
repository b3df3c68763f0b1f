use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::require_admin;
use super::{ApiError, ApiResponse, AppState, CategoriesDto, MessageResponse, ProductDto, ProductPageDto};
use crate::db::{NewProduct, ProductFilter, ProductPatch};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_PER_PAGE: u64 = 20;

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

#[derive(Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

/// GET /api/products
/// Paginated catalog listing with optional category and name filters
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ProductPageDto>>, ApiError> {
    let filter = ProductFilter {
        category: query.category,
        search: query.search,
    };

    let page = state
        .catalog
        .list(
            filter,
            query.page.unwrap_or(DEFAULT_PAGE),
            query.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
        .await?;

    Ok(Json(ApiResponse::success(ProductPageDto {
        products: page.products.into_iter().map(ProductDto::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    })))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let product = state.catalog.get(id).await?;

    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

/// GET /api/products/categories
/// Distinct category values currently in use
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CategoriesDto>>, ApiError> {
    let categories = state.catalog.categories().await?;

    Ok(Json(ApiResponse::success(CategoriesDto { categories })))
}

/// POST /api/products (admin)
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    require_admin(&state, &headers)?;

    let (Some(name), Some(price), Some(category), Some(stock)) = (
        payload.name,
        payload.price,
        payload.category,
        payload.stock,
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let product = state
        .catalog
        .create(NewProduct {
            name,
            description: payload.description.unwrap_or_default(),
            price,
            category,
            image_url: payload.image_url.unwrap_or_default(),
            stock,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProductDto::from(product))),
    ))
}

/// PATCH /api/products/{id} (admin)
/// Partial update of any subset of product fields
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    require_admin(&state, &headers)?;

    let product = state
        .catalog
        .update(
            id,
            ProductPatch {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                category: payload.category,
                image_url: payload.image_url,
                stock: payload.stock,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    require_admin(&state, &headers)?;

    state.catalog.delete(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Product deleted successfully".to_string(),
    })))
}
