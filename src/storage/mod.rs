// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration storage.
//!
//! Lights read their [`LightConfig`] once at construction and write it back,
//! with the new effective state in `hass_state`, after every reconciliation.
//! Storage is organized as namespaces of JSON values; light configs live in
//! [`LIGHTS_NAMESPACE`] keyed by light id.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStorage`]: in-process only, useful for tests and ephemeral bridges
//! - [`JsonFileStorage`]: the same document mirrored to a JSON file

mod document;
mod json_file;
mod light_config;
mod memory;

pub use json_file::JsonFileStorage;
pub use light_config::LightConfig;
pub use memory::MemoryStorage;

pub(crate) use document::StorageDocument;

use std::future::Future;

use serde_json::Value;

use crate::error::StorageError;

/// Namespace holding light configurations.
pub const LIGHTS_NAMESPACE: &str = "lights";

/// Trait for configuration backends.
pub trait ConfigStorage: Send + Sync {
    /// Returns the light id mapped to `entity_id`, allocating the next free
    /// numeric id (and a fresh [`LightConfig`]) if the entity is new.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be read or the new entry
    /// cannot be written.
    fn light_id_for_entity(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Loads the configuration of a light.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no configuration exists for
    /// `light_id`, or `StorageError::Json` if it is malformed.
    fn light_config(
        &self,
        light_id: &str,
    ) -> impl Future<Output = Result<LightConfig, StorageError>> + Send;

    /// Stores `value` under `namespace`/`key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set_storage_value(
        &self,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
