use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{product, supplier},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Supplier row enriched with the number of products sourced from it.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct SupplierWithCount {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_count: i64,
}

/// Fields accepted when creating or replacing a supplier.
#[derive(Debug, Clone)]
pub struct SupplierInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// All suppliers with their product counts, ordered by name.
pub async fn list_with_counts<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<SupplierWithCount>, ServiceError> {
    let suppliers = supplier::Entity::find()
        .column_as(product::Column::Id.count(), "product_count")
        .join(JoinType::LeftJoin, supplier::Relation::Products.def())
        .group_by(supplier::Column::Id)
        .order_by_asc(supplier::Column::Name)
        .into_model::<SupplierWithCount>()
        .all(conn)
        .await?;

    Ok(suppliers)
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all suppliers with product counts
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SupplierWithCount>, ServiceError> {
        list_with_counts(&*self.db_pool).await
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier with id {} not found", id)))
    }

    /// Creates a new supplier
    #[instrument(skip(self))]
    pub async fn create(&self, input: SupplierInput) -> Result<supplier::Model, ServiceError> {
        let active = supplier::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            ..Default::default()
        };

        let created = active.insert(&*self.db_pool).await?;

        self.event_sender
            .send(Event::SupplierCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = created.id, name = %created.name, "supplier created");

        Ok(created)
    }

    /// Replaces an existing supplier
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier with id {} not found", id)))?;

        let mut active: supplier::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);

        let updated = active.update(db).await?;

        self.event_sender
            .send(Event::SupplierUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = updated.id, "supplier updated");

        Ok(updated)
    }

    /// Deletes a supplier. Products sourced from it survive with a nulled
    /// supplier reference (FK is ON DELETE SET NULL).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier with id {} not found", id)))?;

        existing.delete(db).await?;

        self.event_sender
            .send(Event::SupplierDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(supplier_id = id, "supplier deleted");

        Ok(())
    }
}
