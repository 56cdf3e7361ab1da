// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light capabilities and type inference.
//!
//! A light is composed of a fixed set of [`Capability`] values chosen once,
//! from the color modes Home Assistant reports, when the light is created.
//! Each capability owns a slice of [`LightState`] fields and knows how to
//! extract them from a raw [`EntityState`].
//!
//! # Inference
//!
//! [`LightKind::from_color_modes`] picks the most capable kind whose rule
//! matches, in this order:
//!
//! | Rule | Kind |
//! |---|---|
//! | a color mode and a white/temperature mode | [`LightKind::ColorTempAndColor`] |
//! | a color mode | [`LightKind::Color`] |
//! | `color_temp` | [`LightKind::ColorTemp`] |
//! | `brightness` | [`LightKind::Brightness`] |
//! | anything else | [`LightKind::OnOff`] |
//!
//! # Extraction order
//!
//! A full extraction builds the platform state from scratch. The first step
//! of every plan runs [`Capability::OnOff`] in [`ExtractMode::Base`], which
//! starts a fresh state with power and reachability. The combined
//! [`LightKind::ColorTempAndColor`] plan is the color-temperature chain in
//! base mode followed by [`Capability::FullColor`] in
//! [`ExtractMode::Overlay`], so power and reachability come from the
//! temperature chain and the color step only adds its own fields.

use std::fmt;

use crate::platform::EntityState;
use crate::state::{LightState, StateField};
use crate::types::{ColorMode, ColorModes, HueSat, RgbColor, XyColor};

/// A composable unit of light behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Power, reachability, transition and flash. Every light has it.
    OnOff,
    /// Brightness and effects.
    Brightness,
    /// Color temperature.
    ColorTemperature,
    /// Hue/saturation, XY and RGB color.
    FullColor,
}

/// How an extraction step treats the fields shared by all lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Start a fresh state and derive power and reachability.
    Base,
    /// Only add the capability's own fields to the existing state.
    Overlay,
}

impl Capability {
    /// Returns the state fields this capability owns.
    #[must_use]
    pub const fn fields(self) -> &'static [StateField] {
        match self {
            Self::OnOff => &[
                StateField::PowerState,
                StateField::Reachable,
                StateField::TransitionSeconds,
                StateField::Flash,
            ],
            Self::Brightness => &[StateField::Brightness, StateField::Effect],
            Self::ColorTemperature => &[StateField::ColorTemp],
            Self::FullColor => &[
                StateField::HueSaturation,
                StateField::XyColor,
                StateField::RgbColor,
            ],
        }
    }

    /// Returns `true` if this capability owns `field`.
    #[must_use]
    pub fn owns(self, field: StateField) -> bool {
        self.fields().contains(&field)
    }

    /// Extracts this capability's fields from `entity` into `state`.
    pub fn extract(self, entity: &EntityState, state: &mut LightState, mode: ExtractMode) {
        match (self, mode) {
            (Self::OnOff, ExtractMode::Base) => {
                *state = LightState {
                    power_state: Some(entity.is_on()),
                    reachable: Some(entity.is_available()),
                    ..LightState::default()
                };
            }
            (Self::OnOff, ExtractMode::Overlay) => {}
            (Self::Brightness, _) => {
                state.brightness = entity.number("brightness").map(clamp_brightness);
            }
            (Self::ColorTemperature, _) => {
                state.color_temp = entity.attribute::<f64>("color_temp").map(to_mireds);
            }
            (Self::FullColor, _) => {
                state.hue_saturation = entity.attribute::<HueSat>("hs_color");
                state.xy_color = entity.attribute::<XyColor>("xy_color");
                state.rgb_color = entity.attribute::<RgbColor>("rgb_color");
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnOff => "on/off",
            Self::Brightness => "brightness",
            Self::ColorTemperature => "color temperature",
            Self::FullColor => "full color",
        })
    }
}

/// Clamps a platform brightness to 0-255, truncating fractions.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_brightness(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_mireds(value: f64) -> u16 {
    value as u16
}

/// The concrete light variant, fixed for the light's lifetime.
///
/// # Examples
///
/// ```
/// use emuhue_lib::{Capability, LightKind};
/// use emuhue_lib::types::ColorModes;
///
/// let modes: ColorModes = ["hs", "color_temp"].into_iter().collect();
/// let kind = LightKind::from_color_modes(&modes);
///
/// assert_eq!(kind, LightKind::ColorTempAndColor);
/// assert!(kind.supports(Capability::ColorTemperature));
/// assert!(kind.supports(Capability::FullColor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// On/off only.
    OnOff,
    /// Dimmable.
    Brightness,
    /// Dimmable with color temperature.
    ColorTemp,
    /// Dimmable with full color.
    Color,
    /// Dimmable with both color temperature and full color.
    ColorTempAndColor,
}

const COLOR_TEMP_CHAIN: [(Capability, ExtractMode); 3] = [
    (Capability::OnOff, ExtractMode::Base),
    (Capability::Brightness, ExtractMode::Base),
    (Capability::ColorTemperature, ExtractMode::Base),
];

// The temperature chain is authoritative for power and reachability; the
// color step must not rebuild them.
const COLOR_TEMP_THEN_COLOR: [(Capability, ExtractMode); 4] = [
    (Capability::OnOff, ExtractMode::Base),
    (Capability::Brightness, ExtractMode::Base),
    (Capability::ColorTemperature, ExtractMode::Base),
    (Capability::FullColor, ExtractMode::Overlay),
];

impl LightKind {
    /// Picks the light kind for a set of supported color modes.
    #[must_use]
    pub fn from_color_modes(modes: &ColorModes) -> Self {
        if modes.any_color() && modes.any_white() {
            Self::ColorTempAndColor
        } else if modes.any_color() {
            Self::Color
        } else if modes.contains(ColorMode::ColorTemp) {
            Self::ColorTemp
        } else if modes.contains(ColorMode::Brightness) {
            Self::Brightness
        } else {
            Self::OnOff
        }
    }

    /// Returns the capabilities this kind is composed of.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::OnOff => &[Capability::OnOff],
            Self::Brightness => &[Capability::OnOff, Capability::Brightness],
            Self::ColorTemp => &[
                Capability::OnOff,
                Capability::Brightness,
                Capability::ColorTemperature,
            ],
            Self::Color => &[
                Capability::OnOff,
                Capability::Brightness,
                Capability::FullColor,
            ],
            Self::ColorTempAndColor => &[
                Capability::OnOff,
                Capability::Brightness,
                Capability::ColorTemperature,
                Capability::FullColor,
            ],
        }
    }

    /// Returns `true` if this kind includes `capability`.
    #[must_use]
    pub fn supports(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Returns `true` if any capability of this kind owns `field`.
    #[must_use]
    pub fn owns(self, field: StateField) -> bool {
        self.capabilities().iter().any(|c| c.owns(field))
    }

    /// Returns the ordered steps of a full extraction.
    #[must_use]
    pub const fn extraction_plan(self) -> &'static [(Capability, ExtractMode)] {
        match self {
            Self::OnOff => &[(Capability::OnOff, ExtractMode::Base)],
            Self::Brightness => &[
                (Capability::OnOff, ExtractMode::Base),
                (Capability::Brightness, ExtractMode::Base),
            ],
            Self::ColorTemp => &COLOR_TEMP_CHAIN,
            Self::Color => &[
                (Capability::OnOff, ExtractMode::Base),
                (Capability::Brightness, ExtractMode::Base),
                (Capability::FullColor, ExtractMode::Base),
            ],
            Self::ColorTempAndColor => &COLOR_TEMP_THEN_COLOR,
        }
    }

    /// Builds a platform state from a raw entity state.
    ///
    /// A full update follows [`extraction_plan`](Self::extraction_plan).
    /// A partial update starts from `previous` and runs every capability in
    /// overlay mode, leaving power and reachability as they were.
    #[must_use]
    pub fn extract(self, entity: &EntityState, previous: &LightState, full_update: bool) -> LightState {
        if full_update {
            let mut state = LightState::default();
            for (capability, mode) in self.extraction_plan() {
                capability.extract(entity, &mut state, *mode);
            }
            state
        } else {
            let mut state = previous.clone();
            for capability in self.capabilities() {
                capability.extract(entity, &mut state, ExtractMode::Overlay);
            }
            state
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnOff => "on/off light",
            Self::Brightness => "dimmable light",
            Self::ColorTemp => "color temperature light",
            Self::Color => "color light",
            Self::ColorTempAndColor => "extended color light",
        })
    }
}
