// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration storage backed by a JSON file.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

use super::{ConfigStorage, LightConfig, MemoryStorage, StorageDocument};
use crate::error::StorageError;

/// Configuration storage mirrored to a JSON file.
///
/// The whole document is held in memory and rewritten after every change.
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash never leaves a half-written file behind.
///
/// # Examples
///
/// ```no_run
/// use emuhue_lib::storage::{ConfigStorage, JsonFileStorage};
///
/// # async fn example() -> Result<(), emuhue_lib::StorageError> {
/// let storage = JsonFileStorage::open("/var/lib/emuhue/config.json").await?;
/// let light_id = storage.light_id_for_entity("light.kitchen").await?;
/// let config = storage.light_config(&light_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    memory: MemoryStorage,
    // Held across the whole update-then-write sequence so file writes land in
    // the same order as the in-memory updates.
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Opens the storage file, starting empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be read, or
    /// `StorageError::Json` if it is not a valid document.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let document = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => StorageDocument::default(),
            Ok(contents) => {
                let document = serde_json::from_str(&contents)?;
                tracing::info!(path = %path.display(), "Loaded configuration");
                document
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No configuration file, starting empty");
                StorageDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            memory: MemoryStorage::from_document(document),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a stored value.
    #[must_use]
    pub fn value(&self, namespace: &str, key: &str) -> Option<Value> {
        self.memory.value(namespace, key)
    }

    async fn flush(&self) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(&self.memory.snapshot())?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}

impl ConfigStorage for JsonFileStorage {
    async fn light_id_for_entity(&self, entity_id: &str) -> Result<String, StorageError> {
        let _guard = self.write_lock.lock().await;
        let (light_id, created) = self.memory.allocate_light_id(entity_id)?;
        if created {
            tracing::debug!(entity_id = %entity_id, light_id = %light_id, "Allocated light id");
            self.flush().await?;
        }
        Ok(light_id)
    }

    async fn light_config(&self, light_id: &str) -> Result<LightConfig, StorageError> {
        self.memory.load_light_config(light_id)
    }

    async fn set_storage_value(
        &self,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.memory.store(namespace, key, value);
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LIGHTS_NAMESPACE;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "emuhue-{name}-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ))
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let path = temp_path("missing");
        let _ = tokio::fs::remove_file(&path).await;

        let storage = JsonFileStorage::open(&path).await.unwrap();
        assert!(storage.value(LIGHTS_NAMESPACE, "1").is_none());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let path = temp_path("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        let storage = JsonFileStorage::open(&path).await.unwrap();
        let id = storage.light_id_for_entity("light.porch").await.unwrap();
        let config = LightConfig::new("light.porch").with_name("Porch");
        storage
            .set_storage_value(LIGHTS_NAMESPACE, &id, serde_json::to_value(&config).unwrap())
            .await
            .unwrap();
        drop(storage);

        let reopened = JsonFileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.light_config(&id).await.unwrap(), config);
        assert_eq!(reopened.light_id_for_entity("light.porch").await.unwrap(), id);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn invalid_file_is_json_error() {
        let path = temp_path("invalid");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = JsonFileStorage::open(&path).await;
        assert!(matches!(result, Err(StorageError::Json(_))));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
