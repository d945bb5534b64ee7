//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        billing_country, country,
        customer::{self, NewAddress},
        discount,
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer tracing subscriber, defaulting to TRACE when `RUST_LOG` is unset.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test country.
pub async fn create_test_country(
    db: &DatabaseConnection,
    name: &str,
    two_letter_iso_code: &str,
    three_letter_iso_code: &str,
) -> Result<entities::country::Model> {
    country::create_country(
        db,
        name.to_string(),
        two_letter_iso_code,
        three_letter_iso_code,
    )
    .await
}

/// Creates a test customer whose billing address lies in `country_id`.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    email: &str,
    country_id: Option<i64>,
) -> Result<entities::customer::Model> {
    let address = customer::create_address(
        db,
        NewAddress {
            country_id,
            city: Some("Test City".to_string()),
            ..Default::default()
        },
    )
    .await?;
    customer::create_customer(db, email.to_string(), Some(address.id)).await
}

/// Creates an open-ended test discount.
pub async fn create_test_discount(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::discount::Model> {
    discount::create_discount(db, name.to_string(), None, None).await
}

/// Sets up a discount with one unconfigured billing-country requirement and a
/// customer billed in Germany.
/// Returns (requirement, customer, germany).
pub async fn setup_billing_country_scenario(
    db: &DatabaseConnection,
) -> Result<(
    entities::discount_requirement::Model,
    entities::customer::Model,
    entities::country::Model,
)> {
    let germany = create_test_country(db, "Germany", "DE", "DEU").await?;
    let customer = create_test_customer(db, "kunde@example.com", Some(germany.id)).await?;
    let discount = create_test_discount(db, "German customers").await?;
    let requirement =
        discount::add_requirement(db, discount.id, billing_country::SYSTEM_NAME).await?;
    Ok((requirement, customer, germany))
}

/// An unsaved billing-country requirement model.
#[must_use]
pub fn requirement_model(id: i64) -> entities::discount_requirement::Model {
    entities::discount_requirement::Model {
        id,
        discount_id: 1,
        system_name: billing_country::SYSTEM_NAME.to_string(),
    }
}

/// An unsaved customer model.
#[must_use]
pub fn customer_model(id: i64, billing_address_id: Option<i64>) -> entities::customer::Model {
    entities::customer::Model {
        id,
        email: format!("customer{id}@example.com"),
        billing_address_id,
        created_at: fixed_timestamp(),
    }
}

/// An unsaved address model.
#[must_use]
pub fn address_model(id: i64, country_id: Option<i64>) -> entities::address::Model {
    entities::address::Model {
        id,
        country_id,
        city: None,
        address1: None,
        zip_postal_code: None,
        created_at: fixed_timestamp(),
    }
}

fn fixed_timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
