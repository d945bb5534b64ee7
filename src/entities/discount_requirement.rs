//! Discount requirement entity - One configurable precondition of a discount.
//!
//! The `system_name` selects the rule that evaluates the requirement. Any
//! rule-specific configuration lives in the settings table, keyed by the
//! requirement id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount requirement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_requirements")]
pub struct Model {
    /// Unique identifier for the requirement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the discount this requirement guards
    pub discount_id: i64,
    /// System name of the rule that evaluates this requirement
    pub system_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each requirement belongs to one discount
    #[sea_orm(
        belongs_to = "super::discount::Entity",
        from = "Column::DiscountId",
        to = "super::discount::Column::Id"
    )]
    Discount,
}

impl Related<super::discount::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
