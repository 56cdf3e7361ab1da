// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide registry of lights.
//!
//! [`LightRegistry::get_device`] returns the one [`Device`] for an entity,
//! creating it on first use: the light id is resolved through storage, the
//! variant is inferred from the entity's supported color modes, the
//! persisted state is loaded, an initial refresh is done, and a periodic
//! refresh is scheduled. Concurrent first requests for the same entity
//! share a single creation.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::capabilities::LightKind;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::scheduler::{Job, JobFuture, Scheduler};
use crate::storage::ConfigStorage;

/// Default interval between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    refresh_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl RegistryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval between background refreshes.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Returns the interval between background refreshes.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }
}

type Slot<P, S> = Arc<OnceCell<Arc<Device<P, S>>>>;

/// Creates and caches one [`Device`] per entity.
pub struct LightRegistry<P, S> {
    platform: Arc<P>,
    storage: Arc<S>,
    scheduler: Arc<dyn Scheduler>,
    config: RegistryConfig,
    devices: Mutex<HashMap<String, Slot<P, S>>>,
}

impl<P, S> std::fmt::Debug for LightRegistry<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightRegistry")
            .field("config", &self.config)
            .field("entities", &self.devices.lock().len())
            .finish_non_exhaustive()
    }
}

impl<P, S> LightRegistry<P, S>
where
    P: Platform + 'static,
    S: ConfigStorage + 'static,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(platform: Arc<P>, storage: Arc<S>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            platform,
            storage,
            scheduler,
            config: RegistryConfig::default(),
            devices: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the device for `entity_id`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the light id or configuration cannot be
    /// loaded, or `Error::PlatformUnavailable` if the entity state cannot be
    /// fetched. A failed creation is not cached; the next call retries.
    pub async fn get_device(&self, entity_id: &str) -> Result<Arc<Device<P, S>>> {
        let slot = Arc::clone(self.devices.lock().entry(entity_id.to_string()).or_default());

        slot.get_or_try_init(|| self.create_device(entity_id))
            .await
            .cloned()
    }

    /// Returns the device for `entity_id` if it was already created.
    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<Arc<Device<P, S>>> {
        self.devices
            .lock()
            .get(entity_id)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns all created devices.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device<P, S>>> {
        self.devices
            .lock()
            .values()
            .filter_map(|slot| slot.get().cloned())
            .collect()
    }

    /// Returns the number of created devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns `true` if no device was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn create_device(&self, entity_id: &str) -> Result<Arc<Device<P, S>>> {
        let light_id = self.storage.light_id_for_entity(entity_id).await?;
        let mut config = self.storage.light_config(&light_id).await?;
        if config.entity_id.is_empty() {
            config.entity_id = entity_id.to_string();
        }

        let entity = self
            .platform
            .get_entity_state(entity_id)
            .await
            .map_err(|source| Error::PlatformUnavailable {
                entity_id: entity_id.to_string(),
                source,
            })?;

        let kind = LightKind::from_color_modes(&entity.supported_color_modes());
        let device = Arc::new(Device::new(
            light_id,
            config,
            kind,
            Arc::clone(&self.platform),
            Arc::clone(&self.storage),
        ));
        device.observe(&entity).await;

        self.schedule_refresh(&device);

        tracing::info!(
            entity_id = %entity_id,
            light_id = %device.light_id(),
            kind = %kind,
            "Light registered"
        );
        Ok(device)
    }

    fn schedule_refresh(&self, device: &Arc<Device<P, S>>) {
        let device: Weak<Device<P, S>> = Arc::downgrade(device);
        let job: Job = Box::new(move || -> JobFuture {
            let device = device.clone();
            Box::pin(async move {
                let Some(device) = device.upgrade() else {
                    return;
                };
                if let Err(e) = device.refresh().await {
                    tracing::warn!(entity_id = %device.entity_id(), error = %e, "Background refresh failed");
                }
            })
        });

        self.scheduler.schedule(self.config.refresh_interval, job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_refresh_interval() {
        assert_eq!(
            RegistryConfig::default().refresh_interval(),
            Duration::from_secs(5)
        );
        let config = RegistryConfig::new().with_refresh_interval(Duration::from_secs(1));
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }
}
