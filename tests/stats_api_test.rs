mod common;

use axum::http::Method;
use serde_json::json;

use common::{decimal_as_f64, response_json, TestApp};

#[tokio::test]
async fn empty_store_reports_zeroes() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/stats", None).await;
    assert_eq!(response.status(), 200);
    let stats = response_json(response).await;

    assert_eq!(stats["totalProducts"], 0);
    assert_eq!(stats["totalCategories"], 0);
    assert_eq!(stats["totalSuppliers"], 0);
    assert_eq!(stats["lowStockProducts"], 0);
    assert_eq!(decimal_as_f64(&stats["totalStockValue"]), 0.0);
    assert!(stats["recentMovements"]
        .as_array()
        .expect("movement array")
        .is_empty());
    assert!(stats["categoryDistribution"]
        .as_array()
        .expect("distribution array")
        .is_empty());
    // The trend window is zero-filled even with no data
    assert_eq!(stats["stockTrends"].as_array().expect("trend array").len(), 7);
}

#[tokio::test]
async fn low_stock_product_shows_up_on_the_dashboard() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Tools" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let category = response_json(response).await;

    // stock 5 < min_stock 10: a low-stock product
    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Torque wrench",
                "sku": "T-1",
                "category_id": category["id"],
                "price": "10.00",
                "stock": 5,
                "min_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product = response_json(response).await;
    let product_id = product["id"].as_i64().expect("product id");

    let response = app.request(Method::GET, "/api/stats", None).await;
    assert_eq!(response.status(), 200);
    let stats = response_json(response).await;

    assert_eq!(stats["totalProducts"], 1);
    assert_eq!(stats["totalCategories"], 1);
    assert_eq!(stats["lowStockProducts"], 1);
    assert_eq!(decimal_as_f64(&stats["totalStockValue"]), 50.0);

    // The creation shows up in the recent ledger, joined with the name
    let recent = stats["recentMovements"].as_array().expect("movement array");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["product_name"], "Torque wrench");
    assert_eq!(recent[0]["movement_type"], "IN");
    assert_eq!(recent[0]["quantity"], 5);

    // Distribution counts the product under its category
    let distribution = stats["categoryDistribution"]
        .as_array()
        .expect("distribution array");
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution[0]["name"], "Tools");
    assert_eq!(distribution[0]["value"], 1);

    // Today's trend bucket carries the inbound quantity
    let trends = stats["stockTrends"].as_array().expect("trend array");
    assert_eq!(trends.len(), 7);
    assert_eq!(trends[6]["in"], 5);
    assert_eq!(trends[6]["out"], 0);

    // And the product's own movement log holds exactly one IN(5)
    let response = app
        .request(
            Method::GET,
            &format!("/api/products/{product_id}/movements"),
            None,
        )
        .await;
    let movements = response_json(response).await;
    let movements = movements.as_array().expect("movement array");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["movement_type"], "IN");
    assert_eq!(movements[0]["quantity"], 5);
}

#[tokio::test]
async fn raising_stock_above_minimum_clears_the_low_stock_flag() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Torque wrench",
                "sku": "T-2",
                "price": "10.00",
                "stock": 5,
                "min_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product = response_json(response).await;
    let product_id = product["id"].as_i64().expect("product id");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(json!({
                "name": "Torque wrench",
                "sku": "T-2",
                "price": "10.00",
                "stock": 10,
                "min_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app.request(Method::GET, "/api/stats", None).await;
    let stats = response_json(response).await;

    // stock == min_stock is not low stock; the comparison is strict
    assert_eq!(stats["lowStockProducts"], 0);
    assert_eq!(decimal_as_f64(&stats["totalStockValue"]), 100.0);

    // Both the initial IN(5) and the adjustment IN(5) are in the trend
    let trends = stats["stockTrends"].as_array().expect("trend array");
    assert_eq!(trends[6]["in"], 10);
}

#[tokio::test]
async fn health_endpoint_reports_database_state() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}
