pub mod categories;
pub mod common;
pub mod health;
pub mod movements;
pub mod products;
pub mod stats;
pub mod suppliers;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    categories::CategoryService, movements::MovementService, products::ProductService,
    stats::StatsService, suppliers::SupplierService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub suppliers: Arc<SupplierService>,
    pub products: Arc<ProductService>,
    pub movements: Arc<MovementService>,
    pub stats: Arc<StatsService>,
}

impl AppServices {
    /// Build the service container used by HTTP handlers.
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let categories = Arc::new(CategoryService::new(db_pool.clone(), event_sender.clone()));
        let suppliers = Arc::new(SupplierService::new(db_pool.clone(), event_sender.clone()));
        let products = Arc::new(ProductService::new(db_pool.clone(), event_sender));
        let movements = Arc::new(MovementService::new(db_pool.clone()));
        let stats = Arc::new(StatsService::new(db_pool));

        Self {
            categories,
            suppliers,
            products,
            movements,
            stats,
        }
    }
}
