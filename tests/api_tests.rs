use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use marketd::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Default admin seeded by the initial migration.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A pool of in-memory SQLite connections would give each connection its
    // own empty database, so pin the pool to a single connection.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = marketd::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    marketd::api::router(state)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, username: &str, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, admin_token: &str, product: Value) -> i32 {
    let (status, body) = request(app, "POST", "/api/products", Some(admin_token), Some(product)).await;
    assert_eq!(status, StatusCode::CREATED, "product create failed: {body}");
    body["data"]["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = request(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_auth_required() {
    let app = spawn_app().await;

    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/cart", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_flow() {
    let app = spawn_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "alice", "email": "alice@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["is_admin"], false);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");

    // Same email under a different username is still a conflict
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "alice2", "email": "alice@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username or email already exists");

    // Wrong password gets the same generic response as an unknown user
    let (status, wrong_pw) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown_user) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw["error"], unknown_user["error"]);

    let token = login(&app, "alice", "hunter22").await;
    let (status, _) = request(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "bob", "email": "", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(&app, "POST", "/api/auth/register", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_admin_crud() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "carol", "carol@example.com", "pw12345").await;

    // Admin-only mutations
    let payload = json!({ "name": "Milk", "price": 1.5, "category": "Dairy", "stock": 10 });
    let (status, _) = request(&app, "POST", "/api/products", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = request(&app, "POST", "/api/products", Some(&user), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (status, body) = request(&app, "POST", "/api/products", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Milk");
    assert_eq!(body["data"]["description"], "");
    let id = body["data"]["id"].as_i64().unwrap();

    // Incomplete create payload
    let (status, _) = request(
        &app,
        "POST",
        "/api/products",
        Some(&admin),
        Some(json!({ "name": "Nameless" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Public read
    let (status, body) = request(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 1.5);

    // Partial update leaves other fields alone
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/products/{id}"),
        Some(&admin),
        Some(json!({ "price": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 2.0);
    assert_eq!(body["data"]["name"], "Milk");

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/products/{id}"),
        Some(&user),
        Some(json!({ "price": 0.01 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&app, "DELETE", &format!("/api/products/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = request(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(&app, "DELETE", &format!("/api/products/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_listing_and_filters() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    for (name, category, price) in [
        ("Whole Milk", "Dairy", 1.5),
        ("Skim Milk", "Dairy", 1.4),
        ("Cheddar", "Dairy", 3.0),
        ("Baguette", "Bakery", 2.0),
        ("Croissant", "Bakery", 1.2),
    ] {
        create_product(
            &app,
            &admin,
            json!({ "name": name, "price": price, "category": category, "stock": 5 }),
        )
        .await;
    }

    let (status, body) = request(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["per_page"], 20);
    assert_eq!(body["data"]["total_pages"], 1);

    let (_, body) = request(&app, "GET", "/api/products?category=Dairy", None, None).await;
    assert_eq!(body["data"]["total"], 3);
    assert!(
        body["data"]["products"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["category"] == "Dairy")
    );

    // Search matches name substrings case-insensitively
    let (_, body) = request(&app, "GET", "/api/products?search=milk", None, None).await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = request(&app, "GET", "/api/products?search=milk&category=Bakery", None, None).await;
    assert_eq!(body["data"]["total"], 0);

    let (_, body) = request(&app, "GET", "/api/products?page=2&per_page=2", None, None).await;
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["total_pages"], 3);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);

    // Out-of-range pages come back empty rather than erroring
    let (status, body) = request(&app, "GET", "/api/products?page=99", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 0);

    let (_, body) = request(&app, "GET", "/api/products/categories", None, None).await;
    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert!(categories.contains(&json!("Bakery")));
    assert!(categories.contains(&json!("Dairy")));
}

#[tokio::test]
async fn test_cart_flow() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "dave", "dave@example.com", "pw12345").await;

    let milk = create_product(
        &app,
        &admin,
        json!({ "name": "Milk", "price": 1.5, "category": "Dairy", "stock": 10 }),
    )
    .await;
    let bread = create_product(
        &app,
        &admin,
        json!({ "name": "Bread", "price": 2.0, "category": "Bakery", "stock": 10 }),
    )
    .await;

    // Empty cart exists implicitly
    let (status, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total"], 0.0);

    let (status, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": milk, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3.0);

    // Adding the same product merges quantities
    let (_, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": milk, "quantity": 1 })),
    )
    .await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(body["data"]["total"], 4.5);

    let (_, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": bread, "quantity": 1 })),
    )
    .await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], 6.5);

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/cart/{milk}"),
        Some(&user),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3.5);

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/cart/{milk}"),
        Some(&user),
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(&app, "PATCH", "/api/cart/99999", Some(&user), Some(json!({ "quantity": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Removal is idempotent
    let (status, body) = request(&app, "DELETE", &format!("/api/cart/{milk}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    let (status, _) = request(&app, "DELETE", &format!("/api/cart/{milk}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, "DELETE", "/api/cart", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Cart cleared");
    let (_, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cart_stock_limits() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "erin", "erin@example.com", "pw12345").await;

    let scarce = create_product(
        &app,
        &admin,
        json!({ "name": "Truffle", "price": 30.0, "category": "Deli", "stock": 2 }),
    )
    .await;
    let gone = create_product(
        &app,
        &admin,
        json!({ "name": "Caviar", "price": 50.0, "category": "Deli", "stock": 0 }),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": gone, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Caviar is out of stock");

    // More than available on a fresh line
    let (status, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": scarce, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["stock"], 2);
    assert!(body.get("current_quantity").is_none());

    // Merge past the stock ceiling reports the pre-update quantity
    let (status, _) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": scarce, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": scarce, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["stock"], 2);
    assert_eq!(body["current_quantity"], 2);

    // Failed adds leave the cart as it was
    let (_, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/cart/{scarce}"),
        Some(&user),
        Some(json!({ "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": 99999, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_price_drift() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "frank", "frank@example.com", "pw12345").await;

    let id = create_product(
        &app,
        &admin,
        json!({ "name": "Olive Oil", "price": 2.0, "category": "Pantry", "stock": 3 }),
    )
    .await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/cart",
        Some(&user),
        Some(json!({ "product_id": id, "quantity": 2 })),
    )
    .await;
    assert_eq!(body["data"]["total"], 4.0);

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/products/{id}"),
        Some(&admin),
        Some(json!({ "price": 3.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The next read reprices the line and reports the drift once
    let (_, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    assert_eq!(body["data"]["total"], 6.0);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items[0]["price"], 3.0);
    assert_eq!(items[0]["price_changed"], true);
    let messages = body["data"]["sync_messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "price_changed");
    assert_eq!(messages[0]["old_price"], 2.0);
    assert_eq!(messages[0]["new_price"], 3.0);

    let (_, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    assert_eq!(body["data"]["sync_messages"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["items"][0]["price_changed"], false);

    // Checking out after the drift uses the new price
    let (status, body) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&user),
        Some(json!({ "items": [{ "product_id": id, "quantity": 2 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], 6.0);
    let (_, body) = request(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(body["data"]["stock"], 1);
}

#[tokio::test]
async fn test_cart_deleted_product() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "grace", "grace@example.com", "pw12345").await;

    let keep = create_product(
        &app,
        &admin,
        json!({ "name": "Rice", "price": 1.0, "category": "Pantry", "stock": 5 }),
    )
    .await;
    let doomed = create_product(
        &app,
        &admin,
        json!({ "name": "Limited Edition", "price": 9.0, "category": "Pantry", "stock": 5 }),
    )
    .await;

    for (id, qty) in [(keep, 2), (doomed, 1)] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/cart",
            Some(&user),
            Some(json!({ "product_id": id, "quantity": qty })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = request(&app, "DELETE", &format!("/api/products/{doomed}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // The line survives, flagged unavailable, and no longer counts
    let (_, body) = request(&app, "GET", "/api/cart", Some(&user), None).await;
    assert_eq!(body["data"]["total"], 2.0);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let missing = items.iter().find(|i| i["product_id"] == doomed).unwrap();
    assert_eq!(missing["is_available"], false);
    assert_eq!(missing["product_name"], "Limited Edition");
    let messages = body["data"]["sync_messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "product_deleted");

    // Users can still drop the dead line
    let (status, body) = request(&app, "DELETE", &format!("/api/cart/{doomed}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_placement() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "heidi", "heidi@example.com", "pw12345").await;

    let milk = create_product(
        &app,
        &admin,
        json!({ "name": "Milk", "price": 1.5, "category": "Dairy", "stock": 10 }),
    )
    .await;
    let bread = create_product(
        &app,
        &admin,
        json!({ "name": "Bread", "price": 2.0, "category": "Bakery", "stock": 4 }),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&user),
        Some(json!({ "items": [
            { "product_id": milk, "quantity": 2 },
            { "product_id": bread, "quantity": 1 },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], 5.0);
    assert_eq!(body["data"]["status"], "completed");
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_name"], "Milk");
    assert_eq!(items[0]["price"], 1.5);

    // Stock was decremented
    let (_, body) = request(&app, "GET", &format!("/api/products/{milk}"), None, None).await;
    assert_eq!(body["data"]["stock"], 8);
    let (_, body) = request(&app, "GET", &format!("/api/products/{bread}"), None, None).await;
    assert_eq!(body["data"]["stock"], 3);

    // Order totals are frozen at placement time
    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/products/{milk}"),
        Some(&admin),
        Some(json!({ "price": 99.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, "GET", "/api/orders", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["total"], 5.0);

    // Orders are private to their owner
    let other = register(&app, "ivan", "ivan@example.com", "pw12345").await;
    let (_, body) = request(&app, "GET", "/api/orders", Some(&other), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_order_validation_and_rollback() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let user = register(&app, "judy", "judy@example.com", "pw12345").await;

    let (status, _) = request(&app, "POST", "/api/orders", Some(&user), Some(json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let milk = create_product(
        &app,
        &admin,
        json!({ "name": "Milk", "price": 1.5, "category": "Dairy", "stock": 10 }),
    )
    .await;
    let bread = create_product(
        &app,
        &admin,
        json!({ "name": "Bread", "price": 2.0, "category": "Bakery", "stock": 1 }),
    )
    .await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&user),
        Some(json!({ "items": [{ "product_id": milk, "quantity": 0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&user),
        Some(json!({ "items": [{ "product_id": 99999, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A failing line rolls the whole order back, earlier decrements included
    let (status, body) = request(
        &app,
        "POST",
        "/api/orders",
        Some(&user),
        Some(json!({ "items": [
            { "product_id": milk, "quantity": 3 },
            { "product_id": bread, "quantity": 2 },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["stock"], 1);

    let (_, body) = request(&app, "GET", &format!("/api/products/{milk}"), None, None).await;
    assert_eq!(body["data"]["stock"], 10);
    let (_, body) = request(&app, "GET", "/api/orders", Some(&user), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
