//! Customer entity - A shopper, optionally linked to a billing address.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact email
    pub email: String,
    /// Address used for billing, None until the customer provides one
    pub billing_address_id: Option<i64>,
    /// When the customer was created
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The billing address of the customer
    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::BillingAddressId",
        to = "super::address::Column::Id"
    )]
    BillingAddress,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingAddress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
