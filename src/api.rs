use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Compose the `/api` surface: resource routers plus the dashboard
/// aggregation endpoint.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::routes())
        .nest("/categories", handlers::categories::routes())
        .nest("/suppliers", handlers::suppliers::routes())
        .nest("/stock-movements", handlers::movements::routes())
        .route("/stats", get(handlers::stats::get_stats))
}
