use axum::{extract::State, response::IntoResponse};

use super::common::success_response;
use crate::{errors::ServiceError, handlers::AppState, services::stats::DashboardStats};

/// Dashboard aggregation: counts, low-stock flag totals, stock value,
/// recent movements, category distribution and the 7-day trend.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    ),
    tag = "Stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let stats = state.services.stats.get_dashboard_stats().await?;
    Ok(success_response(stats))
}
