//! Discount entity - A price reduction guarded by zero or more requirements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    /// Unique identifier for the discount
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "10% off for German customers")
    #[sea_orm(unique)]
    pub name: String,
    /// First moment (UTC) the discount may apply; open-ended when None
    pub start_date_utc: Option<DateTime>,
    /// Last moment (UTC) the discount may apply; open-ended when None
    pub end_date_utc: Option<DateTime>,
}

/// Defines relationships between Discount and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One discount has many requirements
    #[sea_orm(has_many = "super::discount_requirement::Entity")]
    Requirements,
}

impl Related<super::discount_requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
