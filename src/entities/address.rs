//! Address entity - Postal address owned by a customer.
//!
//! Only the country reference matters for discount rules; the remaining
//! columns are kept so addresses stay recognisable in listings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Address database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    /// Unique identifier for the address
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Country this address is located in, if known
    pub country_id: Option<i64>,
    /// City name
    pub city: Option<String>,
    /// First address line
    pub address1: Option<String>,
    /// Postal code
    pub zip_postal_code: Option<String>,
    /// When the address was created
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each address belongs to at most one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
