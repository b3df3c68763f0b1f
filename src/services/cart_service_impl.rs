//! `SeaORM` implementation of the `CartService` trait.
//!
//! Reconciliation is a pure pass over the cart's embedded items and a map of
//! live products; the database is only touched to load both sides and to
//! persist refreshed snapshots in a single write afterwards.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::products;
use crate::models::cart::{CartItem, ProductSnapshot};
use crate::services::cart_service::{
    CartError, CartItemView, CartService, CartView, SyncKind, SyncMessage,
};

/// Fallback line name for products that no longer exist and left no snapshot.
const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Outcome of reconciling cart items against the live catalog.
struct Reconciliation {
    views: Vec<CartItemView>,
    total: f64,
    messages: Vec<SyncMessage>,
    /// Items with snapshots refreshed from the catalog.
    items: Vec<CartItem>,
    /// Whether any stored snapshot changed and the cart needs a write-back.
    dirty: bool,
}

fn reconcile(items: &[CartItem], catalog: &HashMap<i32, products::Model>) -> Reconciliation {
    let mut views = Vec::with_capacity(items.len());
    let mut messages = Vec::new();
    let mut refreshed = Vec::with_capacity(items.len());
    let mut total = 0.0_f64;
    let mut dirty = false;

    for item in items {
        if let Some(product) = catalog.get(&item.product_id) {
            total += product.price * f64::from(item.quantity);

            let mut price_changed = false;
            let mut name_changed = false;

            if let Some(snapshot) = &item.snapshot {
                if snapshot.price != product.price {
                    price_changed = true;
                    messages.push(SyncMessage {
                        kind: SyncKind::PriceChanged,
                        product_id: product.id,
                        product_name: product.name.clone(),
                        old_price: Some(snapshot.price),
                        new_price: Some(product.price),
                        old_name: None,
                        new_name: None,
                    });
                }
                if snapshot.name != product.name {
                    name_changed = true;
                    messages.push(SyncMessage {
                        kind: SyncKind::NameChanged,
                        product_id: product.id,
                        product_name: product.name.clone(),
                        old_price: None,
                        new_price: None,
                        old_name: Some(snapshot.name.clone()),
                        new_name: Some(product.name.clone()),
                    });
                }
            }

            views.push(CartItemView {
                product_id: product.id,
                product_name: product.name.clone(),
                price: product.price,
                quantity: item.quantity,
                stock: product.stock,
                image_url: product.image_url.clone(),
                category: product.category.clone(),
                is_available: true,
                has_stock_issue: item.quantity > product.stock,
                price_changed,
                name_changed,
            });

            // Refresh-on-read: overwrite the stored snapshot with current
            // product fields so the next read starts from fresh values.
            let snapshot = ProductSnapshot::of(product);
            if item.snapshot.as_ref() != Some(&snapshot) {
                dirty = true;
            }
            refreshed.push(CartItem {
                product_id: item.product_id,
                quantity: item.quantity,
                snapshot: Some(snapshot),
            });
        } else {
            // Product deleted: render from the stale snapshot, keep the
            // line, contribute nothing to the total.
            let (name, price, image_url, category) = item.snapshot.as_ref().map_or_else(
                || (UNKNOWN_PRODUCT.to_string(), 0.0, String::new(), String::new()),
                |s| (s.name.clone(), s.price, s.image_url.clone(), s.category.clone()),
            );

            messages.push(SyncMessage {
                kind: SyncKind::ProductDeleted,
                product_id: item.product_id,
                product_name: name.clone(),
                old_price: None,
                new_price: None,
                old_name: None,
                new_name: None,
            });

            views.push(CartItemView {
                product_id: item.product_id,
                product_name: name,
                price,
                quantity: item.quantity,
                stock: 0,
                image_url,
                category,
                is_available: false,
                has_stock_issue: false,
                price_changed: false,
                name_changed: false,
            });

            refreshed.push(item.clone());
        }
    }

    Reconciliation {
        views,
        total,
        messages,
        items: refreshed,
        dirty,
    }
}

pub struct SeaOrmCartService {
    store: Store,
}

impl SeaOrmCartService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load_catalog(
        &self,
        items: &[CartItem],
    ) -> Result<HashMap<i32, products::Model>, CartError> {
        let mut catalog = HashMap::with_capacity(items.len());
        for item in items {
            if catalog.contains_key(&item.product_id) {
                continue;
            }
            if let Some(product) = self.store.get_product(item.product_id).await? {
                catalog.insert(item.product_id, product);
            }
        }
        Ok(catalog)
    }

    async fn reconciled_view(&self, user_id: i32) -> Result<CartView, CartError> {
        let cart = self.store.get_or_create_cart(user_id).await?;
        let catalog = self.load_catalog(&cart.items).await?;

        let outcome = reconcile(&cart.items, &catalog);

        // Single write after the full item scan, and only when something
        // actually drifted.
        if outcome.dirty {
            self.store.save_cart_items(cart.id, &outcome.items).await?;
        }

        Ok(CartView {
            items: outcome.views,
            total: outcome.total,
            sync_messages: outcome.messages,
        })
    }
}

#[async_trait]
impl CartService for SeaOrmCartService {
    async fn get_cart(&self, user_id: i32) -> Result<CartView, CartError> {
        self.reconciled_view(user_id).await
    }

    async fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, CartError> {
        if quantity < 1 {
            return Err(CartError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if product.stock == 0 {
            return Err(CartError::OutOfStock(format!(
                "{} is out of stock",
                product.name
            )));
        }

        let mut cart = self.store.get_or_create_cart(user_id).await?;

        if let Some(existing) = cart.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_quantity = existing.quantity + quantity;
            if new_quantity > product.stock {
                return Err(CartError::InsufficientStock {
                    message: format!("Cannot add more. Only {} in stock", product.stock),
                    stock: product.stock,
                    current_quantity: Some(existing.quantity),
                });
            }
            existing.quantity = new_quantity;
            existing.snapshot = Some(ProductSnapshot::of(&product));
        } else {
            if quantity > product.stock {
                return Err(CartError::InsufficientStock {
                    message: format!("Only {} available in stock", product.stock),
                    stock: product.stock,
                    current_quantity: None,
                });
            }
            cart.items.push(CartItem::new(&product, quantity));
        }

        self.store.save_cart_items(cart.id, &cart.items).await?;

        self.reconciled_view(user_id).await
    }

    async fn update_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, CartError> {
        if quantity < 1 {
            return Err(CartError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let mut cart = self
            .store
            .find_cart_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        let item = cart
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if product.stock == 0 {
            return Err(CartError::OutOfStock(format!(
                "{} is out of stock",
                product.name
            )));
        }

        if quantity > product.stock {
            return Err(CartError::InsufficientStock {
                message: format!("Only {} available in stock", product.stock),
                stock: product.stock,
                current_quantity: None,
            });
        }

        item.quantity = quantity;
        item.snapshot = Some(ProductSnapshot::of(&product));

        self.store.save_cart_items(cart.id, &cart.items).await?;

        self.reconciled_view(user_id).await
    }

    async fn remove_item(&self, user_id: i32, product_id: i32) -> Result<CartView, CartError> {
        if let Some(mut cart) = self.store.find_cart_by_user(user_id).await? {
            cart.items.retain(|i| i.product_id != product_id);
            self.store.save_cart_items(cart.id, &cart.items).await?;
        }

        self.reconciled_view(user_id).await
    }

    async fn clear(&self, user_id: i32) -> Result<(), CartError> {
        if let Some(cart) = self.store.find_cart_by_user(user_id).await? {
            self.store.save_cart_items(cart.id, &[]).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, price: f64, stock: i32) -> products::Model {
        products::Model {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            category: "Test".to_string(),
            image_url: String::new(),
            stock,
        }
    }

    fn catalog(products: Vec<products::Model>) -> HashMap<i32, products::Model> {
        products.into_iter().map(|p| (p.id, p)).collect()
    }

    #[test]
    fn total_uses_current_prices() {
        let p = product(1, "Milk", 4.49, 10);
        let items = vec![CartItem::new(&p, 3)];
        let catalog = catalog(vec![product(1, "Milk", 5.00, 10)]);

        let outcome = reconcile(&items, &catalog);

        assert_eq!(outcome.total, 15.00);
        assert_eq!(outcome.views[0].price, 5.00);
    }

    #[test]
    fn price_drift_emits_sync_message_and_refreshes_snapshot() {
        let old = product(1, "Milk", 2.00, 10);
        let items = vec![CartItem::new(&old, 2)];
        let catalog = catalog(vec![product(1, "Milk", 3.00, 10)]);

        let outcome = reconcile(&items, &catalog);

        assert!(outcome.views[0].price_changed);
        assert!(!outcome.views[0].name_changed);
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].kind, SyncKind::PriceChanged);
        assert_eq!(outcome.messages[0].old_price, Some(2.00));
        assert_eq!(outcome.messages[0].new_price, Some(3.00));
        assert!(outcome.dirty);
        assert_eq!(outcome.items[0].snapshot.as_ref().unwrap().price, 3.00);
    }

    #[test]
    fn price_and_name_drift_fire_independently() {
        let old = product(1, "Millk", 2.00, 10);
        let items = vec![CartItem::new(&old, 1)];
        let catalog = catalog(vec![product(1, "Milk", 3.00, 10)]);

        let outcome = reconcile(&items, &catalog);

        assert!(outcome.views[0].price_changed);
        assert!(outcome.views[0].name_changed);
        assert_eq!(outcome.messages.len(), 2);
    }

    #[test]
    fn unchanged_snapshot_is_not_dirty() {
        let p = product(1, "Milk", 4.49, 10);
        let items = vec![CartItem::new(&p, 1)];
        let catalog = catalog(vec![p]);

        let outcome = reconcile(&items, &catalog);

        assert!(!outcome.dirty);
        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn missing_snapshot_triggers_refresh_without_drift_messages() {
        let items = vec![CartItem {
            product_id: 1,
            quantity: 1,
            snapshot: None,
        }];
        let catalog = catalog(vec![product(1, "Milk", 4.49, 10)]);

        let outcome = reconcile(&items, &catalog);

        assert!(outcome.dirty);
        assert!(outcome.messages.is_empty());
        assert!(outcome.items[0].snapshot.is_some());
    }

    #[test]
    fn deleted_product_renders_from_snapshot_and_contributes_zero() {
        let gone = product(7, "Discontinued Tea", 4.99, 5);
        let kept = product(1, "Milk", 4.49, 10);
        let items = vec![CartItem::new(&gone, 2), CartItem::new(&kept, 1)];
        let catalog = catalog(vec![kept]);

        let outcome = reconcile(&items, &catalog);

        let view = &outcome.views[0];
        assert!(!view.is_available);
        assert_eq!(view.product_name, "Discontinued Tea");
        assert_eq!(view.price, 4.99);
        assert_eq!(view.stock, 0);
        assert_eq!(outcome.total, 4.49);
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].kind, SyncKind::ProductDeleted);
        // The stale line is kept, not removed
        assert_eq!(outcome.items.len(), 2);
    }

    #[test]
    fn deleted_product_without_snapshot_uses_neutral_defaults() {
        let items = vec![CartItem {
            product_id: 9,
            quantity: 1,
            snapshot: None,
        }];

        let outcome = reconcile(&items, &HashMap::new());

        let view = &outcome.views[0];
        assert_eq!(view.product_name, UNKNOWN_PRODUCT);
        assert_eq!(view.price, 0.0);
        assert_eq!(view.image_url, "");
        assert_eq!(view.category, "");
    }

    #[test]
    fn stock_issue_flagged_when_quantity_exceeds_stock() {
        let p = product(1, "Milk", 4.49, 2);
        let items = vec![CartItem::new(&p, 5)];
        let catalog = catalog(vec![p]);

        let outcome = reconcile(&items, &catalog);

        assert!(outcome.views[0].has_stock_issue);
        assert!(outcome.views[0].is_available);
    }
}
