// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `EmuHue` Lib - Home Assistant lights behind an emulated Hue bridge.
//!
//! This library keeps a model of every Home Assistant light exposed by the
//! bridge and reconciles three views of its state: what Home Assistant
//! reports, what the bridge has asked for, and the effective state served
//! to Hue clients.
//!
//! # Concepts
//!
//! - **Capabilities**: each light is on/off, dimmable, color temperature,
//!   color, or color plus temperature. The variant is inferred once from the
//!   entity's `supported_color_modes` and never changes.
//! - **Staging**: capability setters only record a pending command.
//!   [`LightGuard::execute`] sends it as one `turn_on`/`turn_off` call.
//! - **Reconciliation**: each field of the effective state comes from the
//!   platform state if it has one, else from the pending command, else it
//!   keeps its previous value. The result is persisted after every change.
//! - **Throttling**: a light with a throttle drops commands that change
//!   nothing or arrive too soon after the previous one.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use emuhue_lib::{ColorTemperature, Dimmable, LightRegistry, OnOff, TokioScheduler};
//! use emuhue_lib::platform::HassConfig;
//! use emuhue_lib::storage::JsonFileStorage;
//!
//! #[tokio::main]
//! async fn main() -> emuhue_lib::Result<()> {
//!     let platform = HassConfig::new("http://homeassistant.local:8123", "long-lived-token")
//!         .into_client()?;
//!     let storage = JsonFileStorage::open("emuhue.json").await?;
//!
//!     let registry = LightRegistry::new(
//!         Arc::new(platform),
//!         Arc::new(storage),
//!         Arc::new(TokioScheduler::new()),
//!     );
//!
//!     let device = registry.get_device("light.bedroom").await?;
//!     let mut light = device.lock().await;
//!     light.turn_on();
//!     if let Some(white) = light.as_color_temperature_mut() {
//!         white.set_brightness(180);
//!         white.set_color_temperature(370);
//!     }
//!     light.execute().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Watching State
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use emuhue_lib::{Device, platform::HassClient, storage::MemoryStorage};
//! # async fn example(device: Arc<Device<HassClient, MemoryStorage>>) {
//! let mut rx = device.watch();
//! while rx.changed().await.is_ok() {
//!     let state = rx.borrow_and_update().clone();
//!     println!("{}: {:?}", device.entity_id(), state.power_state);
//! }
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `http` (default): [`platform::HassClient`], a Home Assistant REST client

pub mod capabilities;
pub mod device;
pub mod error;
pub mod light;
pub mod platform;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod types;

pub use capabilities::{Capability, ExtractMode, LightKind};
pub use device::{Device, LightGuard};
pub use error::{Error, PlatformError, Result, StorageError};
pub use light::{
    ColorLight, ColorTempColorLight, ColorTempLight, ColorTemperature, Dimmable, DimmableLight,
    FullColor, Light, LightSlots, OnOff, OnOffLight,
};
pub use platform::{EntityState, Platform};
pub use registry::{LightRegistry, RegistryConfig};
pub use scheduler::{Job, JobFuture, Scheduler, TokioScheduler};
pub use state::LightState;
pub use storage::{ConfigStorage, LightConfig};
