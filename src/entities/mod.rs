//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod address;
pub mod country;
pub mod customer;
pub mod discount;
pub mod discount_requirement;
pub mod setting;

// Re-export specific types to avoid conflicts
pub use address::{Column as AddressColumn, Entity as Address, Model as AddressModel};
pub use country::{Column as CountryColumn, Entity as Country, Model as CountryModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use discount::{Column as DiscountColumn, Entity as Discount, Model as DiscountModel};
pub use discount_requirement::{
    Column as DiscountRequirementColumn, Entity as DiscountRequirement,
    Model as DiscountRequirementModel,
};
pub use setting::{Column as SettingColumn, Entity as Setting, Model as SettingModel};
