use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kinds of stock movement carried in the ledger.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Stock movement ledger row. Append-only: the application never updates
/// or deletes rows in this table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "stock_movements")]
#[schema(as = StockMovement)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub product_id: i32,

    /// Signed quantity delta; positive for IN, negative for OUT
    pub quantity: i32,

    pub movement_type: String,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn movement_type_round_trips_through_text() {
        assert_eq!(MovementType::In.as_str(), "IN");
        assert_eq!(MovementType::Out.as_str(), "OUT");
        assert_eq!(MovementType::Adjustment.as_str(), "ADJUSTMENT");
        assert_eq!(MovementType::from_str("IN").unwrap(), MovementType::In);
        assert!(MovementType::from_str("SIDEWAYS").is_err());
    }
}
