// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state types and reconciliation.
//!
//! A light carries three [`LightState`] snapshots: what the platform
//! reported, what a pending command asks for, and the effective state that
//! results from merging both with the previous effective state. The merge
//! itself is [`reconcile`].
//!
//! # Examples
//!
//! ```
//! use emuhue_lib::state::{LightState, reconcile};
//!
//! let platform = LightState::with_power(Some(true));
//! let persisted = LightState { brightness: Some(42), ..LightState::default() };
//!
//! let effective = reconcile(&platform, None, &persisted);
//! assert_eq!(effective.power_state, Some(true));
//! assert_eq!(effective.brightness, Some(42));
//! ```

mod light_state;
mod reconcile;

pub use light_state::{LightState, StateField};
pub use reconcile::reconcile;
