// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A light bound to its platform entity and configuration record.
//!
//! [`Device`] owns one [`Light`] behind an async mutex. Every operation
//! that touches the light, whether a caller staging and executing a
//! command or the background refresh, holds that lock for its whole
//! duration, so refresh and execute never interleave on the same light.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use emuhue_lib::{FullColor, LightRegistry, OnOff, TokioScheduler};
//! use emuhue_lib::platform::HassConfig;
//! use emuhue_lib::storage::MemoryStorage;
//!
//! # async fn example() -> emuhue_lib::Result<()> {
//! let platform = Arc::new(
//!     HassConfig::new("http://homeassistant.local:8123", "token").into_client()?,
//! );
//! let registry = LightRegistry::new(
//!     platform,
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(TokioScheduler::new()),
//! );
//!
//! let device = registry.get_device("light.living_room").await?;
//! {
//!     let mut light = device.lock().await;
//!     light.turn_on();
//!     light.require_full_color_mut()?.set_rgb(255, 120, 0);
//!     light.execute().await?;
//! }
//! println!("{} is now {:?}", device.name().await, device.state().await);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, watch};
use tokio::time::Instant;

use crate::capabilities::LightKind;
use crate::error::{Error, Result, StorageError};
use crate::light::{Light, OnOff};
use crate::platform::{EntityState, Platform};
use crate::state::LightState;
use crate::storage::{ConfigStorage, LIGHTS_NAMESPACE, LightConfig};

/// A light registered with the bridge.
pub struct Device<P, S> {
    entity_id: String,
    light_id: String,
    kind: LightKind,
    platform: Arc<P>,
    storage: Arc<S>,
    inner: Mutex<DeviceInner>,
    state_tx: watch::Sender<LightState>,
}

struct DeviceInner {
    light: Light,
    config: LightConfig,
    friendly_name: Option<String>,
}

impl DeviceInner {
    fn name(&self, entity_id: &str) -> String {
        if !self.config.name.is_empty() {
            return self.config.name.clone();
        }
        self.friendly_name
            .clone()
            .unwrap_or_else(|| entity_id.to_string())
    }
}

impl<P, S> fmt::Debug for Device<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("entity_id", &self.entity_id)
            .field("light_id", &self.light_id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<P: Platform, S: ConfigStorage> Device<P, S> {
    /// Creates a device from its stored configuration.
    ///
    /// The light starts from the persisted state with an empty platform
    /// state. Call [`refresh`](Self::refresh) to observe the platform.
    #[must_use]
    pub fn new(
        light_id: impl Into<String>,
        config: LightConfig,
        kind: LightKind,
        platform: Arc<P>,
        storage: Arc<S>,
    ) -> Self {
        let light = Light::new(kind, config.hass_state.clone(), config.throttle_ms());
        let (state_tx, _) = watch::channel(light.state().clone());

        Self {
            entity_id: config.entity_id.clone(),
            light_id: light_id.into(),
            kind,
            platform,
            storage,
            inner: Mutex::new(DeviceInner {
                light,
                config,
                friendly_name: None,
            }),
            state_tx,
        }
    }

    /// Returns the platform entity id.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Returns the bridge light id.
    #[must_use]
    pub fn light_id(&self) -> &str {
        &self.light_id
    }

    /// Returns the light kind.
    #[must_use]
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Locks the light for staging and executing commands.
    ///
    /// The background refresh waits while the guard is held.
    pub async fn lock(&self) -> LightGuard<'_, P, S> {
        LightGuard {
            device: self,
            inner: self.inner.lock().await,
        }
    }

    /// Returns a snapshot of the effective state.
    pub async fn state(&self) -> LightState {
        self.inner.lock().await.light.state().clone()
    }

    /// Returns the display name.
    ///
    /// A configured name wins, then the platform's friendly name, then the
    /// entity id.
    pub async fn name(&self) -> String {
        self.inner.lock().await.name(&self.entity_id)
    }

    /// Subscribes to effective state changes.
    ///
    /// A new value is published after every reconciliation, even when the
    /// state did not change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LightState> {
        self.state_tx.subscribe()
    }

    /// Fetches the platform state and reconciles.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlatformUnavailable` if the state cannot be fetched.
    /// Nothing changes in that case.
    pub async fn refresh(&self) -> Result<()> {
        self.lock().await.refresh().await
    }

    /// Like [`refresh`](Self::refresh), with control over full extraction.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlatformUnavailable` if the state cannot be fetched.
    pub async fn refresh_with(&self, full_update: bool) -> Result<()> {
        self.lock().await.refresh_with(full_update).await
    }

    /// Sends the pending command, if any.
    ///
    /// # Errors
    ///
    /// Returns `Error::CommandFailed` if the platform rejects the command.
    pub async fn execute(&self) -> Result<()> {
        self.lock().await.execute().await
    }

    /// Reconciles against an already fetched entity state.
    pub(crate) async fn observe(&self, entity: &EntityState) {
        self.lock().await.observe(entity, true).await;
    }
}

/// Exclusive access to a device's light.
///
/// Dereferences to [`Light`], so capability setters can be called directly.
pub struct LightGuard<'a, P, S> {
    device: &'a Device<P, S>,
    inner: MutexGuard<'a, DeviceInner>,
}

impl<P, S> Deref for LightGuard<'_, P, S> {
    type Target = Light;

    fn deref(&self) -> &Light {
        &self.inner.light
    }
}

impl<P, S> DerefMut for LightGuard<'_, P, S> {
    fn deref_mut(&mut self) -> &mut Light {
        &mut self.inner.light
    }
}

impl<P, S> fmt::Debug for LightGuard<'_, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightGuard")
            .field("entity_id", &self.device.entity_id)
            .field("light", &self.inner.light)
            .finish()
    }
}

impl<P: Platform, S: ConfigStorage> LightGuard<'_, P, S> {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.name(&self.device.entity_id)
    }

    /// Fetches the platform state and reconciles.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlatformUnavailable` if the state cannot be fetched.
    pub async fn refresh(&mut self) -> Result<()> {
        self.refresh_with(true).await
    }

    /// Fetches the platform state and reconciles.
    ///
    /// With `full_update` false, capabilities re-read only their own fields
    /// on top of the previous platform state, keeping power and
    /// reachability.
    ///
    /// # Errors
    ///
    /// Returns `Error::PlatformUnavailable` if the state cannot be fetched.
    pub async fn refresh_with(&mut self, full_update: bool) -> Result<()> {
        let entity = self
            .device
            .platform
            .get_entity_state(&self.device.entity_id)
            .await
            .map_err(|source| Error::PlatformUnavailable {
                entity_id: self.device.entity_id.clone(),
                source,
            })?;

        self.observe(&entity, full_update).await;
        Ok(())
    }

    /// Sends the pending command to the platform.
    ///
    /// A throttled command is discarded without contacting the platform.
    /// Otherwise the command is sent, merged into the effective state and
    /// persisted, and the pending slot is cleared, whether or not the
    /// platform accepted it.
    ///
    /// # Errors
    ///
    /// Returns `Error::CommandFailed` if the platform rejects the command.
    pub async fn execute(&mut self) -> Result<()> {
        let device = self.device;

        if !self.inner.light.slots_mut().update_allowed(Instant::now()) {
            tracing::debug!(entity_id = %device.entity_id, "Command throttled");
            self.inner.light.slots_mut().clear_pending();
            return Ok(());
        }

        let command = self
            .inner
            .light
            .slots()
            .pending_command()
            .filter(|c| !c.is_empty())
            .cloned();

        let result = match command {
            Some(command) => self.send(&command).await,
            None => {
                tracing::warn!(entity_id = %device.entity_id, "Execute called without a pending command");
                Ok(())
            }
        };

        self.reconcile_and_persist().await;
        self.inner.light.slots_mut().clear_pending();
        result
    }

    async fn send(&self, command: &LightState) -> Result<()> {
        let device = self.device;
        let data = command.to_service_data();

        let sent = if command.power_state == Some(true) {
            tracing::debug!(entity_id = %device.entity_id, ?data, "Turning on");
            device.platform.turn_on(&device.entity_id, &data).await
        } else {
            tracing::debug!(entity_id = %device.entity_id, ?data, "Turning off");
            device.platform.turn_off(&device.entity_id, &data).await
        };

        sent.map_err(|source| {
            tracing::warn!(entity_id = %device.entity_id, error = %source, "Command failed");
            Error::CommandFailed {
                entity_id: device.entity_id.clone(),
                source,
            }
        })
    }

    async fn observe(&mut self, entity: &EntityState, full_update: bool) {
        if let Some(name) = entity.friendly_name() {
            self.inner.friendly_name = Some(name.to_string());
        }
        self.inner.light.slots_mut().observe(entity, full_update);
        tracing::debug!(
            entity_id = %self.device.entity_id,
            state = %entity.state,
            full_update,
            "Platform state observed"
        );
        self.reconcile_and_persist().await;
    }

    async fn reconcile_and_persist(&mut self) {
        let effective = self.inner.light.slots_mut().reconcile().clone();
        self.inner.config.hass_state = effective.clone();
        self.device.state_tx.send_replace(effective);

        if let Err(e) = self.persist().await {
            tracing::warn!(entity_id = %self.device.entity_id, error = %e, "Failed to persist light state");
        }
    }

    async fn persist(&self) -> Result<()> {
        let device = self.device;
        let persist_error = |source: StorageError| Error::ConfigPersist {
            light_id: device.light_id.clone(),
            source,
        };

        let value = serde_json::to_value(&self.inner.config).map_err(|e| persist_error(e.into()))?;
        device
            .storage
            .set_storage_value(LIGHTS_NAMESPACE, &device.light_id, value)
            .await
            .map_err(persist_error)
    }
}
