use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{category, product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Category row enriched with the number of products referencing it.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct CategoryWithCount {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub product_count: i64,
}

/// Fields accepted when creating or replacing a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// All categories with their product counts, ordered by name.
pub async fn list_with_counts<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<CategoryWithCount>, ServiceError> {
    let categories = category::Entity::find()
        .column_as(product::Column::Id.count(), "product_count")
        .join(JoinType::LeftJoin, category::Relation::Products.def())
        .group_by(category::Column::Id)
        .order_by_asc(category::Column::Name)
        .into_model::<CategoryWithCount>()
        .all(conn)
        .await?;

    Ok(categories)
}

/// Service for managing categories
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all categories with product counts
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, ServiceError> {
        list_with_counts(&*self.db_pool).await
    }

    /// Gets a category by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with id {} not found", id)))
    }

    /// Creates a new category
    #[instrument(skip(self))]
    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = category::Entity::find()
            .filter(category::Column::Name.eq(input.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(
                "A category with this name already exists".to_string(),
            ));
        }

        let active = category::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        };

        let created = active.insert(db).await.map_err(|e| {
            ServiceError::unique_violation(e, "A category with this name already exists")
        })?;

        self.event_sender
            .send(Event::CategoryCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(category_id = created.id, name = %created.name, "category created");

        Ok(created)
    }

    /// Replaces an existing category
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with id {} not found", id)))?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);

        let updated = active.update(db).await.map_err(|e| {
            ServiceError::unique_violation(e, "A category with this name already exists")
        })?;

        self.event_sender
            .send(Event::CategoryUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(category_id = updated.id, "category updated");

        Ok(updated)
    }

    /// Deletes a category. Products referencing it survive with a nulled
    /// category reference (FK is ON DELETE SET NULL).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category with id {} not found", id)))?;

        existing.delete(db).await?;

        self.event_sender
            .send(Event::CategoryDeleted(id))
            .await
            .map_err(ServiceError::EventError)?;

        info!(category_id = id, "category deleted");

        Ok(())
    }
}
