use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        category, product,
        stock_movement::{self, MovementType},
        supplier,
    },
    errors::ServiceError,
    services::{categories, movements, movements::MovementWithProduct},
};

/// Number of ledger rows shown on the dashboard.
const RECENT_MOVEMENTS_LIMIT: u64 = 10;

/// Days covered by the stock trend chart, today included.
const TREND_WINDOW_DAYS: i64 = 7;

/// Product count for one category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySlice {
    pub name: String,
    pub value: i64,
}

/// Daily IN/OUT totals for the trend chart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockTrendPoint {
    pub date: String,
    #[serde(rename = "in")]
    pub inbound: i64,
    #[serde(rename = "out")]
    pub outbound: i64,
}

/// Aggregated dashboard payload. Field names follow the published JSON
/// contract, which is camelCase.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_suppliers: i64,
    pub low_stock_products: i64,
    pub total_stock_value: Decimal,
    pub recent_movements: Vec<MovementWithProduct>,
    pub category_distribution: Vec<CategorySlice>,
    pub stock_trends: Vec<StockTrendPoint>,
}

/// Read-only aggregation over the full store; no state of its own.
#[derive(Clone)]
pub struct StatsService {
    db_pool: Arc<DbPool>,
}

impl StatsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Compute the dashboard snapshot
    #[instrument(skip(self))]
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;

        let total_categories = category::Entity::find().count(db).await? as i64;
        let total_suppliers = supplier::Entity::find().count(db).await? as i64;

        let products = product::Entity::find().all(db).await?;
        let total_products = products.len() as i64;
        let low_stock_products = products.iter().filter(|p| p.stock < p.min_stock).count() as i64;
        let total_stock_value: Decimal = products
            .iter()
            .map(|p| p.price * Decimal::from(p.stock))
            .sum();

        let recent_movements = movements::recent_movements(db, RECENT_MOVEMENTS_LIMIT).await?;

        let category_distribution = categories::list_with_counts(db)
            .await?
            .into_iter()
            .map(|c| CategorySlice {
                name: c.name,
                value: c.product_count,
            })
            .collect();

        let stock_trends = self.get_stock_trends().await?;

        info!(
            total_products,
            low_stock_products, "dashboard stats computed"
        );

        Ok(DashboardStats {
            total_products,
            total_categories,
            total_suppliers,
            low_stock_products,
            total_stock_value,
            recent_movements,
            category_distribution,
            stock_trends,
        })
    }

    /// Per-day IN/OUT totals for the trailing trend window. Days without
    /// movements are zero-filled; ADJUSTMENT rows are not part of the
    /// IN/OUT contract and are skipped.
    async fn get_stock_trends(&self) -> Result<Vec<StockTrendPoint>, ServiceError> {
        let db = &*self.db_pool;

        let today = Utc::now().date_naive();
        let window_start = (today - Duration::days(TREND_WINDOW_DAYS - 1))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();

        let rows = stock_movement::Entity::find()
            .filter(stock_movement::Column::CreatedAt.gte(window_start))
            .all(db)
            .await?;

        let mut buckets: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for row in rows {
            let day = row.created_at.date_naive();
            match row.movement_type.parse::<MovementType>() {
                Ok(MovementType::In) => {
                    buckets.entry(day).or_default().0 += i64::from(row.quantity)
                }
                Ok(MovementType::Out) => {
                    buckets.entry(day).or_default().1 += i64::from(row.quantity).abs()
                }
                _ => {}
            }
        }

        let trends = (0..TREND_WINDOW_DAYS)
            .map(|offset| {
                let day = today - Duration::days(TREND_WINDOW_DAYS - 1 - offset);
                let (inbound, outbound) = buckets.get(&day).copied().unwrap_or((0, 0));
                StockTrendPoint {
                    date: day.format("%Y-%m-%d").to_string(),
                    inbound,
                    outbound,
                }
            })
            .collect();

        Ok(trends)
    }
}
