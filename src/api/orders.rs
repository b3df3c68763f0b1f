use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::auth::CurrentUser;
use crate::models::order::OrderLine;
use crate::services::order_service::OrderView;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// GET /api/orders
/// The authenticated user's order history, newest first
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ApiError> {
    let orders = state.orders.list_for_user(user.id).await?;

    Ok(Json(ApiResponse::success(orders)))
}

/// POST /api/orders
/// Place an order from a list of (product_id, quantity) pairs
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), ApiError> {
    let order = state.orders.place(user.id, payload.items).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}
