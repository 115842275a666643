use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, message_response, success_response, validate_input};
use crate::{
    entities::supplier,
    errors::{ErrorResponse, ServiceError},
    handlers::AppState,
    services::suppliers::{SupplierInput, SupplierWithCount},
};

/// Payload for creating or replacing a supplier
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SupplierRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Supplier name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,
}

impl From<SupplierRequest> for SupplierInput {
    fn from(payload: SupplierRequest) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        }
    }
}

/// List all suppliers with their product counts
#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses(
        (status = 200, description = "Suppliers with product counts", body = [SupplierWithCount])
    ),
    tag = "Suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state.services.suppliers.list().await?;
    Ok(success_response(suppliers))
}

/// Get a single supplier
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    responses(
        (status = 200, description = "The supplier", body = supplier::Model),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    ),
    tag = "Suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let found = state.services.suppliers.get(id).await?;
    Ok(success_response(found))
}

/// Create a new supplier
#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = supplier::Model),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "Suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state.services.suppliers.create(payload.into()).await?;
    Ok(created_response(created))
}

/// Replace an existing supplier
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = supplier::Model),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    ),
    tag = "Suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let updated = state.services.suppliers.update(id, payload.into()).await?;
    Ok(success_response(updated))
}

/// Delete a supplier. Its products survive, no longer associated.
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    responses(
        (status = 200, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found", body = ErrorResponse)
    ),
    tag = "Suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.suppliers.delete(id).await?;
    Ok(message_response("Supplier deleted successfully"))
}

/// Creates the router for supplier endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers))
        .route("/", post(create_supplier))
        .route("/:id", get(get_supplier))
        .route("/:id", put(update_supplier))
        .route("/:id", delete(delete_supplier))
}
