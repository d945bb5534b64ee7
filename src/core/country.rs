//! Country business logic - Reference data that addresses and discount rules point at.

use crate::{
    entities::{Country, country},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a row in the country reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(pub i64);

impl CountryId {
    /// Returns the raw database key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&country::Model> for CountryId {
    fn from(country: &country::Model) -> Self {
        Self(country.id)
    }
}

/// Creates a new country after validating its ISO codes.
///
/// The two-letter code must be exactly two ASCII letters and the three-letter
/// code exactly three; both are stored upper-case.
pub async fn create_country<C>(
    db: &C,
    name: String,
    two_letter_iso_code: &str,
    three_letter_iso_code: &str,
) -> Result<country::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Country name cannot be empty".to_string(),
        });
    }
    let two_letter = normalize_iso_code(two_letter_iso_code, 2)?;
    let three_letter = normalize_iso_code(three_letter_iso_code, 3)?;

    let country = country::ActiveModel {
        name: Set(name.trim().to_string()),
        two_letter_iso_code: Set(two_letter),
        three_letter_iso_code: Set(three_letter),
        published: Set(true),
        display_order: Set(0),
        ..Default::default()
    };

    Ok(country.insert(db).await?)
}

fn normalize_iso_code(code: &str, expected_len: usize) -> Result<String> {
    let code = code.trim();
    if code.len() != expected_len || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Config {
            message: format!("'{code}' is not a {expected_len}-letter ISO country code"),
        });
    }
    Ok(code.to_ascii_uppercase())
}

/// Finds a country by its unique ID.
pub async fn get_country_by_id<C>(db: &C, country_id: i64) -> Result<Option<country::Model>>
where
    C: ConnectionTrait,
{
    Country::find_by_id(country_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a country by its two- or three-letter ISO code, ignoring case.
pub async fn get_country_by_iso_code<C>(db: &C, code: &str) -> Result<Option<country::Model>>
where
    C: ConnectionTrait,
{
    let code = code.trim().to_ascii_uppercase();
    let column = if code.len() == 3 {
        country::Column::ThreeLetterIsoCode
    } else {
        country::Column::TwoLetterIsoCode
    };

    Country::find()
        .filter(column.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all published countries ordered for display.
pub async fn get_published_countries<C>(db: &C) -> Result<Vec<country::Model>>
where
    C: ConnectionTrait,
{
    Country::find()
        .filter(country::Column::Published.eq(true))
        .order_by_asc(country::Column::DisplayOrder)
        .order_by_asc(country::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
