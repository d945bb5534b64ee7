//! Setting entity - Application-wide string key/value configuration.
//! Feature-specific configuration (such as the country a discount requirement
//! is keyed on) is stored here under a derived key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Setting database model - stores key-value configuration pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized (trimmed, lower-case) setting key
    #[sea_orm(unique)]
    pub name: String,
    /// Setting value stored as string
    pub value: String,
    /// When this setting was last modified
    pub updated_at: DateTime,
}

/// `Setting` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
