//! Country entity - Reference table addresses point into.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Country database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    /// Unique identifier for the country
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Germany")
    pub name: String,
    /// ISO 3166-1 alpha-2 code (e.g., "DE")
    #[sea_orm(unique)]
    pub two_letter_iso_code: String,
    /// ISO 3166-1 alpha-3 code (e.g., "DEU")
    pub three_letter_iso_code: String,
    /// Whether the country is offered to customers
    pub published: bool,
    /// Ordering hint for country pickers
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One country is referenced by many addresses
    #[sea_orm(has_many = "super::address::Entity")]
    Addresses,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
