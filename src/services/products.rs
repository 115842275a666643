use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionError, TransactionTrait,
};
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
    events::{Event, EventSender},
    services::movements,
};

/// Product row joined with the names of its category and supplier.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct ProductWithRefs {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub supplier_name: Option<String>,
}

/// Fields accepted when creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock: i32,
    pub image_url: Option<String>,
}

fn with_refs(
    select: sea_orm::Select<product::Entity>,
) -> sea_orm::Selector<sea_orm::SelectModel<ProductWithRefs>> {
    select
        .column_as(category::Column::Name, "category_name")
        .column_as(supplier::Column::Name, "supplier_name")
        .join(JoinType::LeftJoin, product::Relation::Category.def())
        .join(JoinType::LeftJoin, product::Relation::Supplier.def())
        .into_model::<ProductWithRefs>()
}

/// Service for managing products and their stock ledger
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all products with category/supplier names, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductWithRefs>, ServiceError> {
        let products = with_refs(
            product::Entity::find().order_by_desc(product::Column::CreatedAt),
        )
        .all(&*self.db_pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID with category/supplier names
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ProductWithRefs, ServiceError> {
        with_refs(product::Entity::find_by_id(id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id {} not found", id)))
    }

    /// Creates a product and its initial-stock ledger row in one
    /// transaction.
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = product::Entity::find()
            .filter(product::Column::Sku.eq(input.sku.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "A product with SKU '{}' already exists",
                input.sku
            )));
        }

        let sku_for_error = input.sku.clone();
        let (created, movement) = db
            .transaction::<_, (product::Model, stock_movement::Model), ServiceError>(move |txn| {
                Box::pin(async move {
                    let active = product::ActiveModel {
                        name: Set(input.name),
                        sku: Set(input.sku),
                        description: Set(input.description),
                        category_id: Set(input.category_id),
                        supplier_id: Set(input.supplier_id),
                        price: Set(input.price),
                        stock: Set(input.stock),
                        min_stock: Set(input.min_stock),
                        image_url: Set(input.image_url),
                        ..Default::default()
                    };

                    let created = active.insert(txn).await.map_err(|e| {
                        ServiceError::unique_violation(
                            e,
                            format!("A product with SKU '{}' already exists", sku_for_error),
                        )
                    })?;

                    let movement = movements::record(
                        txn,
                        created.id,
                        created.stock,
                        MovementType::In,
                        Some("initial stock".to_string()),
                    )
                    .await?;

                    Ok((created, movement))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        self.event_sender
            .send(Event::ProductCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;
        self.send_movement_event(&movement).await?;

        info!(product_id = created.id, sku = %created.sku, "product created");

        Ok(created)
    }

    /// Replaces a product. When the stock level changes, the signed delta
    /// is appended to the ledger inside the same transaction as the
    /// product write.
    #[instrument(skip(self, input), fields(product_id = id))]
    pub async fn update(&self, id: i32, input: ProductInput) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id {} not found", id)))?;

        let delta = input.stock - existing.stock;
        let sku_for_error = input.sku.clone();

        let (updated, movement) = db
            .transaction::<_, (product::Model, Option<stock_movement::Model>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let mut active: product::ActiveModel = existing.into();
                        active.name = Set(input.name);
                        active.sku = Set(input.sku);
                        active.description = Set(input.description);
                        active.category_id = Set(input.category_id);
                        active.supplier_id = Set(input.supplier_id);
                        active.price = Set(input.price);
                        active.stock = Set(input.stock);
                        active.min_stock = Set(input.min_stock);
                        active.image_url = Set(input.image_url);

                        let updated = active.update(txn).await.map_err(|e| {
                            ServiceError::unique_violation(
                                e,
                                format!("A product with SKU '{}' already exists", sku_for_error),
                            )
                        })?;

                        let movement = match movements::delta_movement(delta) {
                            Some(movement_type) => Some(
                                movements::record(
                                    txn,
                                    updated.id,
                                    delta,
                                    movement_type,
                                    Some("stock adjustment".to_string()),
                                )
                                .await?,
                            ),
                            None => None,
                        };

                        Ok((updated, movement))
                    })
                },
            )
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        self.event_sender
            .send(Event::ProductUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;
        if let Some(movement) = &movement {
            self.send_movement_event(movement).await?;
        }

        info!(product_id = updated.id, stock_delta = delta, "product updated");

        Ok(updated)
    }

    /// Deletes a product; its ledger rows go with it (FK cascade).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with id {} not found", id)))?;

        existing.delete(db).await?;

        self.event_sender
            .send(Event::ProductDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(product_id = id, "product deleted");

        Ok(())
    }

    async fn send_movement_event(
        &self,
        movement: &stock_movement::Model,
    ) -> Result<(), ServiceError> {
        self.event_sender
            .send(Event::StockMovementRecorded {
                product_id: movement.product_id,
                quantity: movement.quantity,
                movement_type: movement.movement_type.clone(),
                recorded_at: movement.created_at,
            })
            .await
            .map_err(ServiceError::EventError)
    }
}
