use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::services::cart_service::CartView;

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: Option<i32>,
}

/// GET /api/cart
/// Reconciled cart view: live totals, drift flags and sync messages
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let cart = state.cart.get_cart(user.id).await?;

    Ok(Json(ApiResponse::success(cart)))
}

/// POST /api/cart
/// Add a quantity of a product, merging with an existing line
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let (Some(product_id), Some(quantity)) = (payload.product_id, payload.quantity) else {
        return Err(ApiError::validation("Missing product_id or quantity"));
    };

    let cart = state.cart.add_item(user.id, product_id, quantity).await?;

    Ok(Json(ApiResponse::success(cart)))
}

/// PATCH /api/cart/{product_id}
/// Set the quantity of an existing cart line
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let Some(quantity) = payload.quantity else {
        return Err(ApiError::validation("Missing quantity"));
    };

    let cart = state
        .cart
        .update_item(user.id, product_id, quantity)
        .await?;

    Ok(Json(ApiResponse::success(cart)))
}

/// DELETE /api/cart/{product_id}
/// Remove a line; succeeds even when the line is absent
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let cart = state.cart.remove_item(user.id, product_id).await?;

    Ok(Json(ApiResponse::success(cart)))
}

/// DELETE /api/cart
/// Empty the cart; no-op when it does not exist yet
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.cart.clear(user.id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Cart cleared".to_string(),
    })))
}
