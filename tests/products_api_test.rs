mod common;

use axum::http::Method;
use serde_json::json;

use common::{decimal_as_f64, response_json, TestApp};

#[tokio::test]
async fn product_lifecycle_keeps_the_ledger_in_step() {
    let app = TestApp::new().await;

    // Referenced category and supplier
    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Tools", "description": "Hand tools" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let category = response_json(response).await;

    let response = app
        .request(
            Method::POST,
            "/api/suppliers",
            Some(json!({ "name": "Acme Industrial", "email": "sales@acme.example" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let supplier = response_json(response).await;

    // Create: initial stock lands in the ledger as one IN movement
    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Cordless drill",
                "sku": "TL-0001",
                "category_id": category["id"],
                "supplier_id": supplier["id"],
                "price": "129.90",
                "stock": 5,
                "min_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let product = response_json(response).await;
    let product_id = product["id"].as_i64().expect("product id");
    assert_eq!(product["sku"], "TL-0001");
    assert_eq!(product["stock"], 5);

    let response = app
        .request(
            Method::GET,
            &format!("/api/products/{product_id}/movements"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let movements = response_json(response).await;
    let movements = movements.as_array().expect("movement array");
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["movement_type"], "IN");
    assert_eq!(movements[0]["quantity"], 5);
    assert_eq!(movements[0]["notes"], "initial stock");

    // Raising stock 5 -> 12 appends exactly one IN(+7)
    let update_payload = json!({
        "name": "Cordless drill",
        "sku": "TL-0001",
        "category_id": category["id"],
        "supplier_id": supplier["id"],
        "price": "129.90",
        "stock": 12,
        "min_stock": 10
    });
    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(update_payload.clone()),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["stock"], 12);

    let response = app
        .request(
            Method::GET,
            &format!("/api/products/{product_id}/movements"),
            None,
        )
        .await;
    let movements = response_json(response).await;
    let movements = movements.as_array().expect("movement array");
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["movement_type"], "IN");
    assert_eq!(movements[0]["quantity"], 7);

    // Replaying the same stock level writes nothing
    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(update_payload),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/products/{product_id}/movements"),
            None,
        )
        .await;
    let movements = response_json(response).await;
    assert_eq!(movements.as_array().expect("movement array").len(), 2);

    // Lowering stock 12 -> 4 appends exactly one OUT(-8)
    let response = app
        .request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(json!({
                "name": "Cordless drill",
                "sku": "TL-0001",
                "category_id": category["id"],
                "supplier_id": supplier["id"],
                "price": "129.90",
                "stock": 4,
                "min_stock": 10
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/products/{product_id}/movements"),
            None,
        )
        .await;
    let movements = response_json(response).await;
    let movements = movements.as_array().expect("movement array");
    assert_eq!(movements.len(), 3);
    assert_eq!(movements[0]["movement_type"], "OUT");
    assert_eq!(movements[0]["quantity"], -8);

    // Read-one carries the joined names
    let response = app
        .request(Method::GET, &format!("/api/products/{product_id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    let fetched = response_json(response).await;
    assert_eq!(fetched["stock"], 4);
    assert_eq!(fetched["category_name"], "Tools");
    assert_eq!(fetched["supplier_name"], "Acme Industrial");
    assert!(decimal_as_f64(&fetched["price"]) > 129.0);

    // Delete, then 404
    let response = app
        .request(Method::DELETE, &format!("/api/products/{product_id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Product deleted successfully");

    let response = app
        .request(Method::GET, &format!("/api/products/{product_id}"), None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn duplicate_sku_is_rejected_without_inserting() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Claw hammer",
        "sku": "TL-0002",
        "price": "18.50",
        "stock": 10,
        "min_stock": 2
    });

    let response = app
        .request(Method::POST, "/api/products", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(Method::POST, "/api/products", Some(payload))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .expect("error message")
        .contains("TL-0002"));

    let response = app.request(Method::GET, "/api/products", None).await;
    let products = response_json(response).await;
    assert_eq!(products.as_array().expect("product array").len(), 1);
}

#[tokio::test]
async fn missing_product_returns_404() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Ghost",
        "sku": "NOPE-1",
        "price": "1.00",
        "stock": 0,
        "min_stock": 0
    });

    let response = app
        .request(Method::PUT, "/api/products/9999", Some(payload))
        .await;
    assert_eq!(response.status(), 404);

    let response = app.request(Method::DELETE, "/api/products/9999", None).await;
    assert_eq!(response.status(), 404);

    let response = app
        .request(Method::GET, "/api/products/9999/movements", None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn invalid_payload_is_rejected() {
    let app = TestApp::new().await;

    // Negative stock
    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Broken",
                "sku": "BAD-1",
                "price": "5.00",
                "stock": -3,
                "min_stock": 0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Empty SKU
    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Broken",
                "sku": "",
                "price": "5.00",
                "stock": 1,
                "min_stock": 0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Negative price
    let response = app
        .request(
            Method::POST,
            "/api/products",
            Some(json!({
                "name": "Broken",
                "sku": "BAD-2",
                "price": "-5.00",
                "stock": 1,
                "min_stock": 0
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Nothing got inserted along the way
    let response = app.request(Method::GET, "/api/products", None).await;
    let products = response_json(response).await;
    assert!(products.as_array().expect("product array").is_empty());
}
