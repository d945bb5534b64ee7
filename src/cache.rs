//! In-memory settings cache.
//!
//! Holds a snapshot of the whole settings table so rule evaluation does not hit
//! the database. Writes made through the cache go to the database first and
//! then update the snapshot; writes made elsewhere become visible after
//! [`SettingsCache::refresh`].

use crate::{
    core::setting::{self, SettingSource, normalize_key},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, trace};

/// Shared, cloneable snapshot of the settings table.
#[derive(Debug, Clone, Default)]
pub struct SettingsCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SettingsCache {
    /// Creates an empty cache. Call [`Self::refresh`] before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache filled from `db`.
    pub async fn load<C>(db: &C) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let cache = Self::new();
        cache.refresh(db).await?;
        Ok(cache)
    }

    /// Replaces the cached snapshot with the current contents of the settings table.
    ///
    /// Returns the number of cached settings.
    pub async fn refresh<C>(&self, db: &C) -> Result<usize>
    where
        C: ConnectionTrait,
    {
        info!("Refreshing settings cache...");
        let settings = setting::get_all_settings(db).await?;
        let mut entries = self.entries.write().await;
        *entries = settings;
        info!("Settings cache refreshed with {} items.", entries.len());
        trace!("Settings cache now contains: {:?}", entries);
        Ok(entries.len())
    }

    /// Writes a setting to the database and the cache.
    pub async fn set<C>(&self, db: &C, key: &str, value: &str) -> Result<()>
    where
        C: ConnectionTrait,
    {
        setting::set_setting(db, key, value).await?;
        self.entries
            .write()
            .await
            .insert(normalize_key(key), value.to_string());
        Ok(())
    }

    /// Deletes a setting from the database and the cache.
    pub async fn delete<C>(&self, db: &C, key: &str) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let deleted = setting::delete_setting(db, key).await?;
        self.entries.write().await.remove(&normalize_key(key));
        Ok(deleted)
    }

    /// Number of cached settings.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no settings.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl SettingSource for SettingsCache {
    async fn setting_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(&normalize_key(key)).cloned())
    }
}
