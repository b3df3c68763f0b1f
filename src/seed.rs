//! Demo catalog seeding for local development.

use anyhow::Result;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{NewProduct, Store, repositories::user::hash_password};

const DEMO_USER_USERNAME: &str = "user";
const DEMO_USER_EMAIL: &str = "user@marketd.local";
const DEMO_USER_PASSWORD: &str = "user123";

fn product(
    name: &str,
    description: &str,
    price: f64,
    category: &str,
    image: &str,
    stock: i32,
) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        image_url: format!("/images/{image}"),
        stock,
    }
}

#[rustfmt::skip]
fn demo_catalog() -> Vec<NewProduct> {
    vec![
        product("Organic Bananas", "Fresh organic bananas, sold by the pound", 0.79, "Fresh Produce", "organic-bananas.jpg", 150),
        product("Fuji Apples", "Crisp and sweet Fuji apples", 1.99, "Fresh Produce", "fuji-apples.jpg", 120),
        product("Roma Tomatoes", "Fresh Roma tomatoes, perfect for cooking", 2.49, "Fresh Produce", "roma-tomatoes.jpg", 80),
        product("Strawberries", "Fresh strawberries, 1 lb container", 4.99, "Fresh Produce", "strawberries.jpg", 50),
        product("Chicken Breast", "Boneless skinless chicken breast, per lb", 8.99, "Meat & Seafood", "chicken-breast.jpg", 40),
        product("Ground Beef", "80/20 ground beef, per lb", 6.99, "Meat & Seafood", "ground-beef.jpg", 45),
        product("Salmon Fillet", "Fresh Atlantic salmon fillet, per lb", 14.99, "Meat & Seafood", "salmon-fillet.jpg", 30),
        product("Whole Milk", "Fresh whole milk, 1 gallon", 4.49, "Dairy & Eggs", "whole-milk.jpg", 80),
        product("Large Eggs", "Grade A large eggs, dozen", 3.99, "Dairy & Eggs", "large-eggs.jpg", 100),
        product("Cheddar Cheese", "Sharp cheddar cheese, 8 oz block", 5.49, "Dairy & Eggs", "cheddar-cheese.jpg", 60),
        product("Sourdough Bread", "Fresh baked sourdough loaf", 4.99, "Bakery", "sourdough-bread.jpg", 40),
        product("Croissants", "Butter croissants, 4 pack", 5.99, "Bakery", "croissants.jpg", 35),
        product("Diced Tomatoes", "Canned diced tomatoes, 14.5 oz", 1.29, "Canned Goods", "diced-tomatoes.jpg", 120),
        product("Black Beans", "Canned black beans, 15 oz", 0.99, "Canned Goods", "black-beans.jpg", 100),
        product("Spaghetti", "Traditional spaghetti pasta, 16 oz", 1.99, "Pasta & Grains", "spaghetti.jpg", 100),
        product("Brown Rice", "Long grain brown rice, 2 lb", 3.99, "Pasta & Grains", "brown-rice.jpg", 80),
        product("Potato Chips", "Classic potato chips, 8 oz bag", 3.49, "Snacks & Sweets", "potato-chips.jpg", 75),
        product("Dark Chocolate Bar", "70% cacao dark chocolate, 3.5 oz", 3.99, "Snacks & Sweets", "dark-chocolate-bar.jpg", 85),
        product("Orange Juice", "Fresh squeezed orange juice, 64 oz", 5.49, "Beverages", "orange-juice.jpg", 60),
        product("Coffee Beans", "Medium roast coffee beans, 12 oz", 9.99, "Beverages", "coffee-beans.jpg", 50),
        product("Paper Towels", "Paper towels, 6 rolls", 9.99, "Household Items", "paper-towels.jpg", 80),
        product("Dish Soap", "Liquid dish soap, 24 oz", 3.99, "Household Items", "dish-soap.jpg", 90),
        product("Frozen Pizza", "Pepperoni pizza, 12 inch", 6.99, "Frozen Foods", "frozen-pizza.jpg", 50),
        product("Ice Cream", "Vanilla ice cream, 1.5 quart", 4.99, "Frozen Foods", "ice-cream.jpg", 60),
    ]
}

/// Seed the demo catalog and a demo shopper account. Skips catalog seeding
/// when products already exist.
pub async fn run(store: &Store, security: &SecurityConfig) -> Result<()> {
    if !store
        .username_or_email_taken(DEMO_USER_USERNAME, DEMO_USER_EMAIL)
        .await?
    {
        let hash = hash_password(DEMO_USER_PASSWORD, security)?;
        store
            .create_user(DEMO_USER_USERNAME, DEMO_USER_EMAIL, &hash, false)
            .await?;
        info!("Demo user created (username: {DEMO_USER_USERNAME})");
    }

    if store.product_count().await? > 0 {
        info!("Catalog already seeded. Skipping...");
        return Ok(());
    }

    let catalog = demo_catalog();
    let count = catalog.len();
    for item in catalog {
        store.create_product(item).await?;
    }

    info!("Created {count} products");

    Ok(())
}
