// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! - [`ColorMode`] / [`ColorModes`]: capability metadata reported by Home Assistant
//! - [`HueSat`], [`XyColor`], [`RgbColor`]: color representations, stored as given

mod color;
mod color_mode;

pub use color::{HueSat, RgbColor, XyColor};
pub use color_mode::{ColorMode, ColorModes};
