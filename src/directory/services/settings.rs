//! Settings service with load-once, explicit-reload semantics.

use crate::directory::domain::{SettingKey, SettingType, SettingsSnapshot, SystemSetting};
use crate::directory::ports::SettingsStore;
use crate::directory::services::{DirectoryServiceError, DirectoryServiceResult};
use crate::store::StoreError;
use mockable::Clock;
use std::sync::{Arc, RwLock};

/// Process-wide configuration state backed by the settings store.
///
/// Call sites read an immutable [`SettingsSnapshot`] through [`Self::current`];
/// the snapshot only changes on [`Self::reload`] or a write-through
/// [`Self::put`].
pub struct SettingsService<S, C>
where
    S: SettingsStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    snapshot: RwLock<Arc<SettingsSnapshot>>,
}

impl<S, C> SettingsService<S, C>
where
    S: SettingsStore,
    C: Clock + Send + Sync,
{
    /// Creates a settings service with an empty snapshot; call
    /// [`Self::reload`] to populate it.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            snapshot: RwLock::new(Arc::new(SettingsSnapshot::default())),
        }
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the snapshot lock
    /// is poisoned.
    pub fn current(&self) -> DirectoryServiceResult<Arc<SettingsSnapshot>> {
        let guard = self.snapshot.read().map_err(StoreError::poisoned)?;
        Ok(Arc::clone(&guard))
    }

    /// Replaces the snapshot with the current persisted settings.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the settings list
    /// cannot be read.
    pub async fn reload(&self) -> DirectoryServiceResult<Arc<SettingsSnapshot>> {
        let settings = self.store.list_settings().await?;
        let fresh = Arc::new(SettingsSnapshot::from_settings(&settings));
        let mut guard = self.snapshot.write().map_err(StoreError::poisoned)?;
        *guard = Arc::clone(&fresh);
        tracing::info!(settings = settings.len(), "settings snapshot reloaded");
        Ok(fresh)
    }

    /// Writes a setting through to the store and refreshes the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the key is invalid or the
    /// write fails.
    pub async fn put(
        &self,
        key: &str,
        value: impl Into<String>,
        data_type: Option<SettingType>,
    ) -> DirectoryServiceResult<SystemSetting> {
        let key = SettingKey::new(key).map_err(DirectoryServiceError::Domain)?;
        let setting = self
            .store
            .put_setting(key, value.into(), data_type, self.clock.utc())
            .await?;
        self.reload().await?;
        Ok(setting)
    }
}
