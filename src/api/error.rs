use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{CartError, CatalogError, IdentityError, OrderError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    Conflict(String),

    Unauthorized(String),

    Forbidden(String),

    OutOfStock(String),

    /// Stock check failure; the payload carries the available stock and, on
    /// the cart-merge path, the pre-update quantity.
    InsufficientStock {
        message: String,
        stock: i32,
        current_quantity: Option<i32>,
    },

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::OutOfStock(msg) => write!(f, "Out of stock: {}", msg),
            ApiError::InsufficientStock { message, .. } => {
                write!(f, "Insufficient stock: {}", message)
            }
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Stock errors carry extra payload fields alongside the message
        if let ApiError::InsufficientStock {
            message,
            stock,
            current_quantity,
        } = &self
        {
            let mut body = serde_json::json!({
                "success": false,
                "error": message,
                "stock": stock,
            });
            if let Some(current) = current_quantity {
                body["current_quantity"] = serde_json::json!(current);
            }
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ValidationError(msg) | ApiError::OutOfStock(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::InsufficientStock { .. } => unreachable!("handled above"),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Validation(msg) => ApiError::ValidationError(msg),
            IdentityError::Conflict => ApiError::Conflict(err_msg(&err)),
            IdentityError::InvalidCredentials => ApiError::Unauthorized(err_msg(&err)),
            IdentityError::UserNotFound => ApiError::NotFound(err_msg(&err)),
            IdentityError::Database(msg) => ApiError::DatabaseError(msg),
            IdentityError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => ApiError::ValidationError(msg),
            CatalogError::NotFound(_) => ApiError::NotFound(err_msg(&err)),
            CatalogError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Validation(msg) => ApiError::ValidationError(msg),
            CartError::ProductNotFound | CartError::CartNotFound | CartError::ItemNotFound => {
                ApiError::NotFound(err_msg(&err))
            }
            CartError::OutOfStock(msg) => ApiError::OutOfStock(msg),
            CartError::InsufficientStock {
                message,
                stock,
                current_quantity,
            } => ApiError::InsufficientStock {
                message,
                stock,
                current_quantity,
            },
            CartError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => ApiError::ValidationError(msg),
            OrderError::ProductNotFound(_) => ApiError::NotFound(err_msg(&err)),
            OrderError::InsufficientStock {
                product_name,
                available,
            } => ApiError::InsufficientStock {
                message: format!("Insufficient stock for {product_name}. Available: {available}"),
                stock: available,
                current_quantity: None,
            },
            OrderError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

fn err_msg(err: &impl fmt::Display) -> String {
    err.to_string()
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
