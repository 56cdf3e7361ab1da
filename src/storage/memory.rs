// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory configuration storage.

use parking_lot::RwLock;
use serde_json::Value;

use super::{ConfigStorage, LIGHTS_NAMESPACE, LightConfig, StorageDocument};
use crate::error::StorageError;

/// Configuration storage kept in process memory.
///
/// # Examples
///
/// ```
/// use emuhue_lib::storage::{ConfigStorage, LightConfig, MemoryStorage};
///
/// # async fn example() -> Result<(), emuhue_lib::StorageError> {
/// let storage = MemoryStorage::new()
///     .with_light("1", LightConfig::new("light.kitchen").with_throttle_ms(200));
///
/// assert_eq!(storage.light_id_for_entity("light.kitchen").await?, "1");
/// assert_eq!(storage.light_id_for_entity("light.hall").await?, "2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: RwLock<StorageDocument>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light configuration.
    #[must_use]
    pub fn with_light(self, light_id: impl Into<String>, config: LightConfig) -> Self {
        let value = serde_json::to_value(config).unwrap_or_default();
        self.document
            .write()
            .set(LIGHTS_NAMESPACE, &light_id.into(), value);
        self
    }

    /// Returns a stored value.
    #[must_use]
    pub fn value(&self, namespace: &str, key: &str) -> Option<Value> {
        self.document.read().get(namespace, key).cloned()
    }

    /// Returns the stored configuration of a light, if any.
    #[must_use]
    pub fn light(&self, light_id: &str) -> Option<LightConfig> {
        self.document.read().light_config(light_id).ok()
    }

    pub(crate) fn from_document(document: StorageDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    pub(crate) fn snapshot(&self) -> StorageDocument {
        self.document.read().clone()
    }

    pub(crate) fn allocate_light_id(&self, entity_id: &str) -> Result<(String, bool), StorageError> {
        self.document.write().light_id_for_entity(entity_id)
    }

    pub(crate) fn load_light_config(&self, light_id: &str) -> Result<LightConfig, StorageError> {
        self.document.read().light_config(light_id)
    }

    pub(crate) fn store(&self, namespace: &str, key: &str, value: Value) {
        self.document.write().set(namespace, key, value);
    }
}

impl ConfigStorage for MemoryStorage {
    async fn light_id_for_entity(&self, entity_id: &str) -> Result<String, StorageError> {
        let (light_id, created) = self.allocate_light_id(entity_id)?;
        if created {
            tracing::debug!(entity_id = %entity_id, light_id = %light_id, "Allocated light id");
        }
        Ok(light_id)
    }

    async fn light_config(&self, light_id: &str) -> Result<LightConfig, StorageError> {
        self.load_light_config(light_id)
    }

    async fn set_storage_value(
        &self,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        self.store(namespace, key, value);
        Ok(())
    }
}
