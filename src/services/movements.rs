use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        product,
        stock_movement::{self, MovementType},
    },
    errors::ServiceError,
};

/// Ledger row joined with the product it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct MovementWithProduct {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub movement_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
}

/// Movement direction for a stock delta. `None` means the quantity did not
/// change and no ledger row should be written.
pub fn delta_movement(delta: i32) -> Option<MovementType> {
    match delta {
        0 => None,
        d if d > 0 => Some(MovementType::In),
        _ => Some(MovementType::Out),
    }
}

/// Append one ledger row. Callers that pair this with a stock write run it
/// on the same transaction so a failed insert rolls both back.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    quantity: i32,
    movement_type: MovementType,
    notes: Option<String>,
) -> Result<stock_movement::Model, ServiceError> {
    let movement = stock_movement::ActiveModel {
        product_id: Set(product_id),
        quantity: Set(quantity),
        movement_type: Set(movement_type.as_str().to_string()),
        notes: Set(notes),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(movement.insert(conn).await?)
}

/// Most recent movements joined with product names, newest first.
pub async fn recent_movements<C: ConnectionTrait>(
    conn: &C,
    limit: u64,
) -> Result<Vec<MovementWithProduct>, ServiceError> {
    let movements = stock_movement::Entity::find()
        .column_as(product::Column::Name, "product_name")
        .join(JoinType::InnerJoin, stock_movement::Relation::Product.def())
        .order_by_desc(stock_movement::Column::CreatedAt)
        .order_by_desc(stock_movement::Column::Id)
        .limit(limit)
        .into_model::<MovementWithProduct>()
        .all(conn)
        .await?;

    Ok(movements)
}

/// Read-side service over the stock-movement ledger. The ledger itself is
/// append-only; writes happen through `record` inside product transactions.
#[derive(Clone)]
pub struct MovementService {
    db_pool: Arc<DbPool>,
}

impl MovementService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Recent movements across all products
    #[instrument(skip(self))]
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<MovementWithProduct>, ServiceError> {
        recent_movements(&*self.db_pool, limit).await
    }

    /// Full movement log for one product, newest first
    #[instrument(skip(self))]
    pub async fn list_for_product(
        &self,
        product_id: i32,
    ) -> Result<Vec<stock_movement::Model>, ServiceError> {
        let db = &*self.db_pool;

        let product = product::Entity::find_by_id(product_id).one(db).await?;
        if product.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Product with id {} not found",
                product_id
            )));
        }

        let movements = stock_movement::Entity::find()
            .filter(stock_movement::Column::ProductId.eq(product_id))
            .order_by_desc(stock_movement::Column::CreatedAt)
            .order_by_desc(stock_movement::Column::Id)
            .all(db)
            .await?;

        Ok(movements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_delta_is_inbound() {
        assert_eq!(delta_movement(7), Some(MovementType::In));
        assert_eq!(delta_movement(1), Some(MovementType::In));
    }

    #[test]
    fn negative_delta_is_outbound() {
        assert_eq!(delta_movement(-8), Some(MovementType::Out));
        assert_eq!(delta_movement(-1), Some(MovementType::Out));
    }

    #[test]
    fn zero_delta_writes_nothing() {
        assert_eq!(delta_movement(0), None);
    }
}
