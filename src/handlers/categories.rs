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
    entities::category,
    errors::{ErrorResponse, ServiceError},
    handlers::AppState,
    services::categories::{CategoryInput, CategoryWithCount},
};

/// Payload for creating or replacing a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Category name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(payload: CategoryRequest) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
        }
    }
}

/// List all categories with their product counts
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with product counts", body = [CategoryWithCount])
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.categories.list().await?;
    Ok(success_response(categories))
}

/// Get a single category
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    responses(
        (status = 200, description = "The category", body = category::Model),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let found = state.services.categories.get(id).await?;
    Ok(success_response(found))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = category::Model),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let created = state.services.categories.create(payload.into()).await?;
    Ok(created_response(created))
}

/// Replace an existing category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = category::Model),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let updated = state.services.categories.update(id, payload.into()).await?;
    Ok(success_response(updated))
}

/// Delete a category. Its products survive, no longer associated.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.categories.delete(id).await?;
    Ok(message_response("Category deleted successfully"))
}

/// Creates the router for category endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/", post(create_category))
        .route("/:id", get(get_category))
        .route("/:id", put(update_category))
        .route("/:id", delete(delete_category))
}
