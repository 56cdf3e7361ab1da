// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `EmuHue` library.
//!
//! [`Error`] is what device and registry operations return. It wraps the
//! lower-level [`PlatformError`] (talking to Home Assistant) and
//! [`StorageError`] (reading and writing light configuration).

use thiserror::Error;

use crate::capabilities::Capability;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading state from the platform failed.
    #[error("platform unavailable for {entity_id}: {source}")]
    PlatformUnavailable {
        /// The entity whose state could not be read.
        entity_id: String,
        /// The underlying platform failure.
        #[source]
        source: PlatformError,
    },

    /// The platform rejected or failed to apply a command.
    #[error("command failed for {entity_id}: {source}")]
    CommandFailed {
        /// The entity the command was addressed to.
        entity_id: String,
        /// The underlying platform failure.
        #[source]
        source: PlatformError,
    },

    /// The light does not support the requested capability.
    #[error("light does not support {capability}")]
    UnsupportedCapability {
        /// The missing capability.
        capability: Capability,
    },

    /// Writing the light configuration failed.
    #[error("failed to persist config for light {light_id}: {source}")]
    ConfigPersist {
        /// The light whose configuration could not be written.
        light_id: String,
        /// The underlying storage failure.
        #[source]
        source: StorageError,
    },

    /// Reading configuration failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The platform client could not be set up.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors raised by a [`Platform`](crate::platform::Platform) implementation.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or response body.
        message: String,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The entity does not exist on the platform.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The platform response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by a [`ConfigStorage`](crate::storage::ConfigStorage) implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON for the requested type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No value is stored under the given key.
    #[error("no value stored for {namespace}/{key}")]
    NotFound {
        /// Storage namespace.
        namespace: String,
        /// Key inside the namespace.
        key: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
