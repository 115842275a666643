use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::common::{created_response, message_response, success_response, validate_input};
use crate::{
    entities::{product, stock_movement},
    errors::{ErrorResponse, ServiceError},
    handlers::AppState,
    services::products::{ProductInput, ProductWithRefs},
};

/// Payload for creating or replacing a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "SKU must be between 1 and 100 characters"
    ))]
    pub sku: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    pub category_id: Option<i32>,

    pub supplier_id: Option<i32>,

    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: i32,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

impl From<ProductRequest> for ProductInput {
    fn from(payload: ProductRequest) -> Self {
        Self {
            name: payload.name,
            sku: payload.sku,
            description: payload.description,
            category_id: payload.category_id,
            supplier_id: payload.supplier_id,
            price: payload.price,
            stock: payload.stock,
            min_stock: payload.min_stock,
            image_url: payload.image_url,
        }
    }
}

/// List all products with category/supplier names, newest first
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products with reference names", body = [ProductWithRefs])
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.products.list().await?;
    Ok(success_response(products))
}

/// Get a single product with category/supplier names
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "The product", body = ProductWithRefs),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let found = state.services.products.get(id).await?;
    Ok(success_response(found))
}

/// Create a product; its starting stock is written to the ledger as one
/// IN movement.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = product::Model),
        (status = 400, description = "Invalid payload or duplicate SKU", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state.services.products.create(payload.into()).await?;
    Ok(created_response(created))
}

/// Replace a product; a stock change is appended to the ledger as one
/// signed movement.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = product::Model),
        (status = 400, description = "Invalid payload or duplicate SKU", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let updated = state.services.products.update(id, payload.into()).await?;
    Ok(success_response(updated))
}

/// Delete a product and its ledger rows
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.delete(id).await?;
    Ok(message_response("Product deleted successfully"))
}

/// Movement log for one product, newest first
#[utoipa::path(
    get,
    path = "/api/products/{id}/movements",
    responses(
        (status = 200, description = "Ledger rows for the product", body = [stock_movement::Model]),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product_movements(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = state.services.movements.list_for_product(id).await?;
    Ok(success_response(movements))
}

/// Creates the router for product endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/:id", get(get_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
        .route("/:id/movements", get(get_product_movements))
}
