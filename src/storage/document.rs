// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Namespaced JSON document shared by the storage backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LIGHTS_NAMESPACE, LightConfig};
use crate::error::StorageError;

/// Namespace -> key -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct StorageDocument(BTreeMap<String, BTreeMap<String, Value>>);

impl StorageDocument {
    pub fn get(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.0.get(namespace)?.get(key)
    }

    pub fn set(&mut self, namespace: &str, key: &str, value: Value) {
        self.0
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Finds the light mapped to `entity_id`.
    pub fn find_light_id(&self, entity_id: &str) -> Option<String> {
        self.0.get(LIGHTS_NAMESPACE)?.iter().find_map(|(id, value)| {
            (value.get("entity_id").and_then(Value::as_str) == Some(entity_id))
                .then(|| id.clone())
        })
    }

    /// Returns the light mapped to `entity_id`, creating one if needed.
    ///
    /// The second element is `true` when a new entry was created.
    pub fn light_id_for_entity(
        &mut self,
        entity_id: &str,
    ) -> Result<(String, bool), StorageError> {
        if let Some(id) = self.find_light_id(entity_id) {
            return Ok((id, false));
        }

        let next = self
            .0
            .get(LIGHTS_NAMESPACE)
            .into_iter()
            .flat_map(BTreeMap::keys)
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        let light_id = next.to_string();

        let config = serde_json::to_value(LightConfig::new(entity_id))?;
        self.set(LIGHTS_NAMESPACE, &light_id, config);

        Ok((light_id, true))
    }

    pub fn light_config(&self, light_id: &str) -> Result<LightConfig, StorageError> {
        let value = self
            .get(LIGHTS_NAMESPACE, light_id)
            .ok_or_else(|| StorageError::NotFound {
                namespace: LIGHTS_NAMESPACE.to_string(),
                key: light_id.to_string(),
            })?;
        Ok(LightConfig::deserialize(value)?)
    }
}
