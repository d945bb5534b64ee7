//! Catalog seed configuration loading from config.toml
//!
//! The seed file lists the countries the store ships to, the discounts it
//! offers, and known customers. A discount may name a `billing_country`;
//! seeding then attaches a billing-country requirement to it and configures
//! that country. A customer may name a `billing_country` too, which becomes
//! the country of their billing address. Seeding is idempotent: countries,
//! discounts, and customers that already exist are skipped.

use crate::{
    core::{
        billing_country, country,
        country::CountryId,
        customer::{self, NewAddress},
        discount,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Countries to seed
    #[serde(default)]
    pub countries: Vec<CountryConfig>,
    /// Discounts to seed
    #[serde(default)]
    pub discounts: Vec<DiscountConfig>,
    /// Customers to seed
    #[serde(default)]
    pub customers: Vec<CustomerConfig>,
}

/// Configuration for a single country
#[derive(Debug, Deserialize, Clone)]
pub struct CountryConfig {
    /// Display name
    pub name: String,
    /// ISO 3166-1 alpha-2 code
    pub two_letter_iso_code: String,
    /// ISO 3166-1 alpha-3 code
    pub three_letter_iso_code: String,
}

/// Configuration for a single discount
#[derive(Debug, Deserialize, Clone)]
pub struct DiscountConfig {
    /// Unique discount name
    pub name: String,
    /// ISO code of the country customers must be billed in, if any
    #[serde(default)]
    pub billing_country: Option<String>,
}

/// Configuration for a single customer
#[derive(Debug, Deserialize, Clone)]
pub struct CustomerConfig {
    /// Unique contact email
    pub email: String,
    /// ISO code of the customer's billing country; no billing address when absent
    #[serde(default)]
    pub billing_country: Option<String>,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Countries inserted
    pub countries_created: usize,
    /// Discounts inserted
    pub discounts_created: usize,
    /// Customers inserted
    pub customers_created: usize,
    /// Entries skipped because they already existed
    pub skipped: usize,
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load catalog configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses catalog configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Seeds countries and discounts from `config` in a single transaction.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedReport> {
    info!(
        "Seeding catalog: {} countries, {} discounts, {} customers from TOML.",
        config.countries.len(),
        config.discounts.len(),
        config.customers.len()
    );
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for cfg_country in &config.countries {
        if country::get_country_by_iso_code(&txn, &cfg_country.two_letter_iso_code)
            .await?
            .is_some()
        {
            warn!(
                "Country '{}' already exists. Skipping.",
                cfg_country.two_letter_iso_code
            );
            report.skipped += 1;
            continue;
        }

        country::create_country(
            &txn,
            cfg_country.name.clone(),
            &cfg_country.two_letter_iso_code,
            &cfg_country.three_letter_iso_code,
        )
        .await?;
        report.countries_created += 1;
    }

    for cfg_discount in &config.discounts {
        if discount::get_discount_by_name(&txn, &cfg_discount.name)
            .await?
            .is_some()
        {
            warn!("Discount '{}' already exists. Skipping.", cfg_discount.name);
            report.skipped += 1;
            continue;
        }

        let created = discount::create_discount(&txn, cfg_discount.name.clone(), None, None).await?;
        report.discounts_created += 1;

        if let Some(code) = &cfg_discount.billing_country {
            let country = country::get_country_by_iso_code(&txn, code)
                .await?
                .ok_or_else(|| Error::CountryNotFound { code: code.clone() })?;
            let requirement =
                discount::add_requirement(&txn, created.id, billing_country::SYSTEM_NAME).await?;
            billing_country::save_billing_country_requirement(
                &txn,
                requirement.id,
                CountryId::from(&country),
            )
            .await?;
        }
    }

    for cfg_customer in &config.customers {
        if customer::get_customer_by_email(&txn, &cfg_customer.email)
            .await?
            .is_some()
        {
            warn!("Customer '{}' already exists. Skipping.", cfg_customer.email);
            report.skipped += 1;
            continue;
        }

        let billing_address_id = match &cfg_customer.billing_country {
            Some(code) => {
                let country = country::get_country_by_iso_code(&txn, code)
                    .await?
                    .ok_or_else(|| Error::CountryNotFound { code: code.clone() })?;
                let address = customer::create_address(
                    &txn,
                    NewAddress {
                        country_id: Some(country.id),
                        ..Default::default()
                    },
                )
                .await?;
                Some(address.id)
            }
            None => None,
        };
        customer::create_customer(&txn, cfg_customer.email.clone(), billing_address_id).await?;
        report.customers_created += 1;
    }

    txn.commit().await?;
    info!("Finished seeding catalog: {:?}", report);
    Ok(report)
}
