// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-light configuration record.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::LightState;

/// Configuration stored for one light under the `lights` namespace.
///
/// Keys this library does not use are kept in [`extra`](Self::extra) and
/// written back unchanged, so other parts of a bridge can store their own
/// per-light settings in the same record.
///
/// # Examples
///
/// ```
/// use emuhue_lib::storage::LightConfig;
///
/// let config: LightConfig = serde_json::from_str(r#"{
///     "entity_id": "light.kitchen",
///     "name": "Kitchen",
///     "throttle": 250,
///     "uniqueid": "00:17:88:01:00:aa:bb:cc-0b"
/// }"#).unwrap();
///
/// assert_eq!(config.throttle_ms(), Some(250));
/// assert!(config.hass_state.is_empty());
/// assert!(config.extra.contains_key("uniqueid"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// The platform entity this light maps to.
    pub entity_id: String,
    /// User-assigned display name; empty means "use the platform name".
    #[serde(default)]
    pub name: String,
    /// Minimum interval between commands in milliseconds.
    #[serde(default)]
    pub throttle: Option<u64>,
    /// Last effective state.
    #[serde(default)]
    pub hass_state: LightState,
    /// Unrecognized keys, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LightConfig {
    /// Creates a fresh configuration for an entity.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the command throttle in milliseconds.
    #[must_use]
    pub fn with_throttle_ms(mut self, throttle: u64) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Sets the persisted state.
    #[must_use]
    pub fn with_state(mut self, state: LightState) -> Self {
        self.hass_state = state;
        self
    }

    /// Returns the throttle, treating 0 as unthrottled.
    #[must_use]
    pub fn throttle_ms(&self) -> Option<u64> {
        self.throttle.filter(|ms| *ms > 0)
    }

    /// Returns the throttle as a duration.
    #[must_use]
    pub fn throttle(&self) -> Option<Duration> {
        self.throttle_ms().map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_throttle_is_unthrottled() {
        let config = LightConfig::new("light.a").with_throttle_ms(0);
        assert_eq!(config.throttle_ms(), None);
        assert_eq!(config.throttle(), None);
    }

    #[test]
    fn throttle_duration() {
        let config = LightConfig::new("light.a").with_throttle_ms(1500);
        assert_eq!(config.throttle(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn round_trip_keeps_extra_keys() {
        let json = serde_json::json!({
            "entity_id": "light.a",
            "name": "",
            "throttle": null,
            "hass_state": {"power_state": true},
            "modelid": "LCT015"
        });
        let config: LightConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.hass_state.power_state, Some(true));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["modelid"], "LCT015");
        assert_eq!(back["entity_id"], "light.a");
    }

    #[test]
    fn minimal_record() {
        let config: LightConfig = serde_json::from_str(r#"{"entity_id": "switch.fan"}"#).unwrap();
        assert_eq!(config, LightConfig::new("switch.fan"));
    }
}
