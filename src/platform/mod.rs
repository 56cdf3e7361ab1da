// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the home-automation platform.
//!
//! The [`Platform`] trait is the only way lights talk to Home Assistant:
//! one call to read an entity's state and two to switch it on or off with
//! optional service data. With the `http` feature enabled, [`HassClient`]
//! implements it on top of the Home Assistant REST API.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HassClient, HassConfig};

use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PlatformError;
use crate::types::ColorModes;

/// Service data sent along with `turn_on`/`turn_off`.
pub type ServiceData = Map<String, Value>;

/// Home Assistant state string for a light that is on.
pub const STATE_ON: &str = "on";

/// Home Assistant state string for a light that cannot be reached.
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// Raw state of one entity as reported by the platform.
///
/// # Examples
///
/// ```
/// use emuhue_lib::platform::EntityState;
///
/// let entity: EntityState = serde_json::from_str(r#"{
///     "entity_id": "light.kitchen",
///     "state": "on",
///     "attributes": {"brightness": 180, "supported_color_modes": ["color_temp"]}
/// }"#).unwrap();
///
/// assert!(entity.is_on());
/// assert_eq!(entity.attribute::<u8>("brightness"), Some(180));
/// assert!(entity.attribute::<u16>("color_temp").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityState {
    /// The entity identifier, e.g. `light.kitchen`.
    pub entity_id: String,
    /// The state string, e.g. `on`, `off` or `unavailable`.
    pub state: String,
    /// Entity attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    /// Creates an entity state without attributes.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the entity is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state == STATE_ON
    }

    /// Returns `true` unless the entity is unavailable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state != STATE_UNAVAILABLE
    }

    /// Reads and decodes an attribute.
    ///
    /// Returns `None` if the attribute is missing, `null`, or does not
    /// decode as `T`.
    #[must_use]
    pub fn attribute<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.attributes.get(key)? {
            Value::Null => None,
            value => T::deserialize(value).ok(),
        }
    }

    /// Reads a numeric attribute as `f64`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// Returns the `friendly_name` attribute.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes.get("friendly_name").and_then(Value::as_str)
    }

    /// Returns the `supported_color_modes` attribute.
    ///
    /// Missing or malformed metadata yields an empty set.
    #[must_use]
    pub fn supported_color_modes(&self) -> ColorModes {
        self.attributes
            .get("supported_color_modes")
            .and_then(Value::as_array)
            .map(|modes| modes.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the domain part of the entity identifier, e.g. `light`.
    #[must_use]
    pub fn domain(&self) -> &str {
        entity_domain(&self.entity_id)
    }
}

/// Returns the domain of an entity identifier.
///
/// Identifiers without a dot are treated as lights.
#[must_use]
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or("light", |(domain, _)| domain)
}

/// Trait for home-automation platform clients.
///
/// Implementations must be cheap to share: lights hold them behind an `Arc`
/// and call them from background refresh tasks.
pub trait Platform: Send + Sync {
    /// Fetches the current state of an entity.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the platform cannot be reached or the
    /// response cannot be decoded.
    fn get_entity_state(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<EntityState, PlatformError>> + Send;

    /// Turns an entity on, applying `data`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the command is rejected or cannot be sent.
    fn turn_on(
        &self,
        entity_id: &str,
        data: &ServiceData,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Turns an entity off, applying `data`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the command is rejected or cannot be sent.
    fn turn_off(
        &self,
        entity_id: &str,
        data: &ServiceData,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}
