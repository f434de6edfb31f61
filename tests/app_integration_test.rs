//! Integration tests for startup, schema invariants and the non-JSON routes.

mod common;

use assert_matches::assert_matches;
use axum::http::{header, Method, StatusCode};
use common::{response_json, response_text, test_config, TestApp};
use food_ordering::{
    db,
    entities::{customer, menu_item, order, order_item, payment, Customer, MenuItem, Order},
    errors::ServiceError,
    seed,
};
use rstest::rstest;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

// ==================== Startup ====================

#[tokio::test]
async fn initialize_is_idempotent() {
    let app = TestApp::new().await;

    db::initialize(app.db(), true).await.expect("second initialize");
    seed::populate_sample_data(app.db())
        .await
        .expect("third seeding");

    assert_eq!(MenuItem::find().count(app.db()).await.unwrap(), 2);
    let joys = Customer::find()
        .filter(customer::Column::Username.eq("joy"))
        .count(app.db())
        .await
        .unwrap();
    assert_eq!(joys, 1);
}

#[tokio::test]
async fn seeding_keeps_existing_rows() {
    let mut cfg = test_config();
    cfg.seed_sample_data = false;
    let app = TestApp::with_config(cfg).await;

    menu_item::ActiveModel {
        id: NotSet,
        name: Set("Pizza".to_string()),
        price: Set(12.5),
        description: Set(None),
        image_path: Set(None),
    }
    .insert(app.db())
    .await
    .unwrap();

    seed::populate_sample_data(app.db()).await.unwrap();

    let pizza = MenuItem::find()
        .filter(menu_item::Column::Name.eq("Pizza"))
        .one(app.db())
        .await
        .unwrap()
        .expect("pizza");
    assert_eq!(pizza.price, 12.5);
    assert_eq!(MenuItem::find().count(app.db()).await.unwrap(), 2);
}

// ==================== Referential integrity ====================

async fn joy_id(app: &TestApp) -> i32 {
    Customer::find()
        .filter(customer::Column::Email.eq("joy@example.com"))
        .one(app.db())
        .await
        .unwrap()
        .expect("seeded customer")
        .id
}

#[tokio::test]
async fn order_for_unknown_customer_is_rejected() {
    let app = TestApp::new().await;

    let result = order::ActiveModel {
        id: NotSet,
        customer_id: Set(9_999),
        order_date: Set("2024-06-01 12:00:00".to_string()),
        total_amount: Set(10.99),
        status: Set("pending".to_string()),
    }
    .insert(app.db())
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn order_with_items_and_payment_is_linked() {
    let app = TestApp::new().await;
    let customer_id = joy_id(&app).await;

    let placed = order::ActiveModel {
        id: NotSet,
        customer_id: Set(customer_id),
        order_date: Set("2024-06-01 12:00:00".to_string()),
        total_amount: Set(19.98),
        status: Set("pending".to_string()),
    }
    .insert(app.db())
    .await
    .unwrap();

    order_item::ActiveModel {
        id: NotSet,
        order_id: Set(placed.id),
        item_id: Set(2),
        quantity: Set(2),
        price: Set(8.99),
    }
    .insert(app.db())
    .await
    .unwrap();

    payment::ActiveModel {
        id: NotSet,
        order_id: Set(placed.id),
        payment_date: Set("2024-06-01 12:01:00".to_string()),
        amount: Set(19.98),
        payment_method: Set("card".to_string()),
        status: Set("paid".to_string()),
    }
    .insert(app.db())
    .await
    .unwrap();

    let (found, items) = Order::find_by_id(placed.id)
        .find_with_related(order_item::Entity)
        .all(app.db())
        .await
        .unwrap()
        .pop()
        .expect("order with items");
    assert_eq!(found.customer_id, customer_id);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
}

#[tokio::test]
async fn order_item_for_missing_order_is_rejected() {
    let app = TestApp::new().await;

    let result = order_item::ActiveModel {
        id: NotSet,
        order_id: Set(4_242),
        item_id: Set(1),
        quantity: Set(1),
        price: Set(10.99),
    }
    .insert(app.db())
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn payment_for_missing_order_is_rejected() {
    let app = TestApp::new().await;

    let result = payment::ActiveModel {
        id: NotSet,
        order_id: Set(4_242),
        payment_date: Set("2024-06-01 12:01:00".to_string()),
        amount: Set(1.0),
        payment_method: Set("cash".to_string()),
        status: Set("paid".to_string()),
    }
    .insert(app.db())
    .await;

    assert!(result.is_err());
}

// ==================== Pages ====================

#[rstest]
#[case("/", "Sign in")]
#[case("/main", "Menu")]
#[case("/admin", "Admin")]
#[tokio::test]
async fn pages_are_served_as_html(#[case] uri: &str, #[case] marker: &str) {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    assert!(response_text(response).await.contains(marker));
}

#[tokio::test]
async fn pages_follow_the_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.html"), "<p>custom main</p>").unwrap();

    let mut cfg = test_config();
    cfg.static_dir = dir.path().to_string_lossy().into_owned();
    let app = TestApp::with_config(cfg).await;

    let response = app.request(Method::GET, "/main", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_text(response).await, "<p>custom main</p>");

    let response = app.request(Method::GET, "/admin", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Health and tracing ====================

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({"status": "healthy", "database": "healthy"})
    );
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/menu", None).await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_matches!(request_id, Some(id) if !id.is_empty());
}

#[tokio::test]
async fn storage_faults_surface_as_server_errors() {
    let app = TestApp::new().await;
    app.db().clone().close().await.unwrap();

    let err = app.state.catalog.list_menu_items().await.unwrap_err();
    assert_matches!(err, ServiceError::DatabaseError(_));

    let response = app.request(Method::GET, "/menu", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Database error");
}
