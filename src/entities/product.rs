use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Product entity
///
/// `stock` is the authoritative on-hand quantity; every change to it is
/// mirrored by a row in `stock_movements`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema)]
#[sea_orm(table_name = "products")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// SKU (Stock Keeping Unit)
    #[sea_orm(unique)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "SKU must be between 1 and 100 characters"
    ))]
    pub sku: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    /// Category reference; nulled when the category is deleted
    pub category_id: Option<i32>,

    /// Supplier reference; nulled when the supplier is deleted
    pub supplier_id: Option<i32>,

    /// Unit price
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,

    /// Current on-hand quantity
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    /// Threshold below which the product counts as low stock
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: i32,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Supplier,

    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            active_model.created_at = Set(Utc::now());
        }
        active_model.updated_at = Set(Utc::now());

        // The key is unset until the insert returns; validate on a copy
        // with a placeholder so the conversion below succeeds.
        let mut for_validation = active_model.clone();
        if let ActiveValue::NotSet = for_validation.id {
            for_validation.id = Set(0);
        }
        let model: Model = for_validation.try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Model {
        Model {
            id: 1,
            name: "Cordless drill".to_string(),
            sku: "T-100".to_string(),
            description: None,
            category_id: None,
            supplier_id: None,
            price: dec!(129.90),
            stock: 8,
            min_stock: 3,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut product = sample();
        product.price = dec!(-1.00);
        assert!(product.validate().is_err());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut product = sample();
        product.stock = -4;
        assert!(product.validate().is_err());
    }

    #[test]
    fn empty_sku_is_rejected() {
        let mut product = sample();
        product.sku = String::new();
        assert!(product.validate().is_err());
    }
}
