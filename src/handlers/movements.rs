use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::success_response;
use crate::{
    errors::ServiceError, handlers::AppState, services::movements::MovementWithProduct,
};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 500;

/// Query parameters for the movement listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct MovementsQuery {
    /// Maximum number of rows to return (default: 50)
    pub limit: Option<u64>,
}

/// Recent stock movements across all products, newest first
#[utoipa::path(
    get,
    path = "/api/stock-movements",
    params(MovementsQuery),
    responses(
        (status = 200, description = "Recent ledger rows with product names", body = [MovementWithProduct]),
        (status = 400, description = "Invalid limit", body = crate::errors::ErrorResponse)
    ),
    tag = "Stock movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(params): Query<MovementsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    if limit == 0 || limit > MAX_LIMIT {
        return Err(ServiceError::ValidationError(format!(
            "Limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let movements = state.services.movements.list_recent(limit).await?;
    Ok(success_response(movements))
}

/// Creates the router for the movement listing
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_movements))
}
