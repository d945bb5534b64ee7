//! Core business logic - framework-agnostic operations over the store's
//! customers, countries, discounts, and settings.

/// "Billing country is X" discount requirement rule
pub mod billing_country;
/// Country reference data
pub mod country;
/// Customers, addresses, and the customer context seen by rules
pub mod customer;
/// Discounts, requirements, and discount validation
pub mod discount;
/// The requirement rule seam
pub mod requirement;
/// Generic key/value settings store
pub mod setting;
