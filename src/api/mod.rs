use axum::{
    Json, Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CartService, CatalogService, IdentityService, OrderService, SeaOrmCartService,
    SeaOrmCatalogService, SeaOrmIdentityService, SeaOrmOrderService,
};

pub mod auth;
pub mod cart;
mod error;
pub mod orders;
pub mod products;
mod types;

pub use error::ApiError;
pub use types::*;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub identity: Arc<dyn IdentityService>,

    pub catalog: Arc<dyn CatalogService>,

    pub cart: Arc<dyn CartService>,

    pub orders: Arc<dyn OrderService>,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(build_app_state(config, store))
}

#[must_use]
pub fn build_app_state(config: Config, store: Store) -> Arc<AppState> {
    let identity = Arc::new(SeaOrmIdentityService::new(
        store.clone(),
        config.auth.clone(),
        config.security.clone(),
    ));
    let catalog = Arc::new(SeaOrmCatalogService::new(store.clone()));
    let cart = Arc::new(SeaOrmCartService::new(store.clone()));
    let orders = Arc::new(SeaOrmOrderService::new(store.clone()));

    Arc::new(AppState {
        config,
        store,
        identity,
        catalog,
        cart,
        orders,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/categories", get(products::get_categories))
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/health", get(health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/cart",
            get(cart::get_cart)
                .post(cart::add_item)
                .delete(cart::clear_cart),
        )
        .route(
            "/cart/{product_id}",
            patch(cart::update_item).delete(cart::remove_item),
        )
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "API is running",
    }))
}
