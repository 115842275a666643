mod common;

use axum::http::Method;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn movement_listing_joins_product_names_newest_first() {
    let app = TestApp::new().await;

    for (sku, stock) in [("M-1", 3), ("M-2", 9)] {
        let response = app
            .request(
                Method::POST,
                "/api/products",
                Some(json!({
                    "name": format!("Item {sku}"),
                    "sku": sku,
                    "price": "1.00",
                    "stock": stock,
                    "min_stock": 0
                })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = app.request(Method::GET, "/api/stock-movements", None).await;
    assert_eq!(response.status(), 200);
    let movements = response_json(response).await;
    let movements = movements.as_array().expect("movement array");

    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["product_name"], "Item M-2");
    assert_eq!(movements[0]["quantity"], 9);
    assert_eq!(movements[1]["product_name"], "Item M-1");
    assert_eq!(movements[1]["quantity"], 3);
}

#[tokio::test]
async fn movement_listing_honors_the_limit() {
    let app = TestApp::new().await;

    for i in 0..5 {
        let response = app
            .request(
                Method::POST,
                "/api/products",
                Some(json!({
                    "name": format!("Bulk {i}"),
                    "sku": format!("BULK-{i}"),
                    "price": "1.00",
                    "stock": i,
                    "min_stock": 0
                })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .request(Method::GET, "/api/stock-movements?limit=2", None)
        .await;
    assert_eq!(response.status(), 200);
    let movements = response_json(response).await;
    assert_eq!(movements.as_array().expect("movement array").len(), 2);

    // Out-of-range limits are rejected
    let response = app
        .request(Method::GET, "/api/stock-movements?limit=0", None)
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(Method::GET, "/api/stock-movements?limit=100000", None)
        .await;
    assert_eq!(response.status(), 400);
}
