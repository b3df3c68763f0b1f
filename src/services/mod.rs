pub mod cart_service;
pub mod cart_service_impl;
pub mod catalog_service;
pub mod catalog_service_impl;
pub mod identity_service;
pub mod identity_service_impl;
pub mod order_service;
pub mod order_service_impl;

pub use cart_service::{CartError, CartService};
pub use cart_service_impl::SeaOrmCartService;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;
pub use identity_service::{IdentityError, IdentityService};
pub use identity_service_impl::SeaOrmIdentityService;
pub use order_service::{OrderError, OrderService};
pub use order_service_impl::SeaOrmOrderService;
