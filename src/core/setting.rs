//! Settings store - Generic string-keyed configuration values.
//!
//! Keys are normalized (trimmed, lower-cased) on every read and write, so
//! lookups are case-insensitive. Typed reads fall back to the type's default
//! value when a key is absent; callers that treat the default as "unconfigured"
//! rely on this.

use crate::{
    entities::{Setting, setting},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use std::{collections::HashMap, str::FromStr};
use tracing::{debug, info, instrument};

/// A read-only source of setting values.
///
/// Implemented by the database connection itself and by
/// [`crate::cache::SettingsCache`].
#[allow(async_fn_in_trait)] // used through generics only
pub trait SettingSource {
    /// Returns the raw value stored under `key`, or None if the key is absent.
    async fn setting_value(&self, key: &str) -> Result<Option<String>>;

    /// Returns the value under `key` parsed as `T`, or `T::default()` if the key is absent.
    ///
    /// # Errors
    /// Returns `Error::InvalidSetting` if a stored value does not parse as `T`.
    async fn setting_by_key<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr + Default,
    {
        let value = self.setting_value(key).await?;
        parse_setting(key, value)
    }
}

impl SettingSource for DatabaseConnection {
    async fn setting_value(&self, key: &str) -> Result<Option<String>> {
        get_setting_value(self, key).await
    }
}

/// Normalizes a setting key for storage and lookup.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

pub(crate) fn parse_setting<T>(key: &str, value: Option<String>) -> Result<T>
where
    T: FromStr + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidSetting {
            key: key.to_string(),
            value: raw.clone(),
        }),
    }
}

/// Retrieves the raw value stored under `key`.
///
/// # Returns
/// * `Ok(Some(value))` - The key exists
/// * `Ok(None)` - The key does not exist
#[instrument(skip(db))]
pub async fn get_setting_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let value = Setting::find()
        .filter(setting::Column::Name.eq(normalize_key(key)))
        .one(db)
        .await?
        .map(|s| s.value);
    debug!("Setting '{}': {:?}", key, value);
    Ok(value)
}

/// Retrieves the value stored under `key` parsed as `T`.
///
/// Absent keys yield `T::default()` (zero for integers, empty for strings).
///
/// # Errors
/// Returns `Error::InvalidSetting` if the stored value does not parse as `T`,
/// or a database error if the query fails.
pub async fn get_setting_by_key<T, C>(db: &C, key: &str) -> Result<T>
where
    T: FromStr + Default,
    C: ConnectionTrait,
{
    let value = get_setting_value(db, key).await?;
    parse_setting(key, value)
}

/// Loads every setting as a map of normalized key to value.
pub async fn get_all_settings<C>(db: &C) -> Result<HashMap<String, String>>
where
    C: ConnectionTrait,
{
    let settings = Setting::find().all(db).await?;
    Ok(settings.into_iter().map(|s| (s.name, s.value)).collect())
}

/// Sets or updates the value stored under `key`.
///
/// If the key already exists its value is replaced; otherwise a new row is inserted.
#[instrument(skip(db))]
pub async fn set_setting<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let name = normalize_key(key);
    if name.is_empty() {
        return Err(Error::Config {
            message: "Setting key cannot be empty".to_string(),
        });
    }
    let now = Utc::now().naive_utc();

    let existing = Setting::find()
        .filter(setting::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;

    if let Some(current) = existing {
        let mut active_model: setting::ActiveModel = current.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_setting = setting::ActiveModel {
            name: Set(name),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_setting.insert(db).await?;
    }

    info!("Set setting: {} = {}", key, value);
    Ok(())
}

/// Deletes the setting stored under `key`.
///
/// # Returns
/// * `Ok(true)` - A setting was removed
/// * `Ok(false)` - No setting existed under `key`
#[instrument(skip(db))]
pub async fn delete_setting<C>(db: &C, key: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Setting::delete_many()
        .filter(setting::Column::Name.eq(normalize_key(key)))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        info!("Deleted setting: {}", key);
    }
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_and_get_new_key() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;

        set_setting(&db, "catalog.pagesize", "24").await?;

        let value = get_setting_value(&db, "catalog.pagesize").await?;
        assert_eq!(value, Some("24".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_updates_existing_key() -> Result<()> {
        let db = setup_test_db().await?;

        set_setting(&db, "Shipping.FreeOver", "50").await?;
        set_setting(&db, "shipping.freeover", "75").await?;

        let value: i64 = get_setting_by_key(&db, "SHIPPING.FREEOVER").await?;
        assert_eq!(value, 75);

        let count = Setting::find()
            .filter(setting::Column::Name.eq("shipping.freeover"))
            .count(&db)
            .await?;
        assert_eq!(count, 1, "Re-setting a key must update the existing row");
        Ok(())
    }

    #[tokio::test]
    async fn test_keys_are_case_insensitive_and_trimmed() -> Result<()> {
        let db = setup_test_db().await?;

        set_setting(&db, "  DiscountRequirement.BillingCountry-3 ", "7").await?;

        let value = get_setting_value(&db, "discountrequirement.billingcountry-3").await?;
        assert_eq!(value, Some("7".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_yields_default() -> Result<()> {
        let db = setup_test_db().await?;

        assert_eq!(get_setting_value(&db, "does.not.exist").await?, None);
        let number: i64 = get_setting_by_key(&db, "does.not.exist").await?;
        assert_eq!(number, 0);
        let text: String = get_setting_by_key(&db, "does.not.exist").await?;
        assert!(text.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_value_is_an_error() -> Result<()> {
        let db = setup_test_db().await?;
        set_setting(&db, "orders.minimum", "lots").await?;

        let result = get_setting_by_key::<i64, _>(&db, "orders.minimum").await;
        assert!(matches!(
            result,
            Err(Error::InvalidSetting { ref value, .. }) if value == "lots"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_setting(&db, "   ", "1").await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_setting() -> Result<()> {
        let db = setup_test_db().await?;
        set_setting(&db, "temp.key", "1").await?;

        assert!(delete_setting(&db, "TEMP.KEY").await?);
        assert!(!delete_setting(&db, "temp.key").await?);
        assert_eq!(get_setting_value(&db, "temp.key").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_settings() -> Result<()> {
        let db = setup_test_db().await?;
        set_setting(&db, "A.One", "1").await?;
        set_setting(&db, "b.two", "2").await?;

        let all = get_all_settings(&db).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("a.one").map(String::as_str), Some("1"));
        assert_eq!(all.get("b.two").map(String::as_str), Some("2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_database_connection_is_a_setting_source() -> Result<()> {
        let db = setup_test_db().await?;
        set_setting(&db, "tax.rate", "19").await?;

        let rate: u32 = db.setting_by_key("Tax.Rate").await?;
        assert_eq!(rate, 19);
        Ok(())
    }
}
