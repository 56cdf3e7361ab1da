// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light variants and their capability traits.
//!
//! A [`Light`] is one of five variants, picked by [`LightKind`]. Each
//! variant implements the capability traits it supports:
//!
//! | Variant | [`OnOff`] | [`Dimmable`] | [`ColorTemperature`] | [`FullColor`] |
//! |---|---|---|---|---|
//! | [`OnOffLight`] | ✓ | | | |
//! | [`DimmableLight`] | ✓ | ✓ | | |
//! | [`ColorTempLight`] | ✓ | ✓ | ✓ | |
//! | [`ColorLight`] | ✓ | ✓ | | ✓ |
//! | [`ColorTempColorLight`] | ✓ | ✓ | ✓ | ✓ |
//!
//! Callers holding a `Light` of unknown variant ask for a capability with
//! the `as_*` accessors, or the `require_*` ones when a missing capability
//! should be an error.
//!
//! # Examples
//!
//! ```
//! use emuhue_lib::{Dimmable, Light, LightKind, OnOff};
//! use emuhue_lib::state::LightState;
//!
//! let mut light = Light::new(LightKind::Brightness, LightState::new(), None);
//! light.turn_on();
//!
//! if let Some(dimmable) = light.as_dimmable_mut() {
//!     dimmable.set_brightness(128);
//! }
//! assert!(light.as_full_color().is_none());
//! assert_eq!(light.slots().pending_command().unwrap().brightness, Some(128));
//! ```

mod slots;
mod throttle;
mod traits;
mod variants;

pub use slots::{DEFAULT_TRANSITION_SECONDS, LightSlots};
pub use traits::{ColorTemperature, Dimmable, FullColor, OnOff};
pub use variants::{ColorLight, ColorTempColorLight, ColorTempLight, DimmableLight, OnOffLight};

use crate::capabilities::{Capability, LightKind};
use crate::error::{Error, Result};
use crate::state::LightState;

/// A light of any variant.
#[derive(Debug, Clone)]
pub enum Light {
    /// Switch only.
    OnOff(OnOffLight),
    /// Dimmable.
    Brightness(DimmableLight),
    /// Dimmable with white temperature.
    ColorTemp(ColorTempLight),
    /// Dimmable with color.
    Color(ColorLight),
    /// Dimmable with color and white temperature.
    ColorTempAndColor(ColorTempColorLight),
}

impl Light {
    /// Creates the variant for `kind` from its last persisted state.
    ///
    /// `throttle_ms` of `None` or `Some(0)` disables throttling.
    #[must_use]
    pub fn new(kind: LightKind, persisted: LightState, throttle_ms: Option<u64>) -> Self {
        match kind {
            LightKind::OnOff => Self::OnOff(OnOffLight::new(persisted, throttle_ms)),
            LightKind::Brightness => Self::Brightness(DimmableLight::new(persisted, throttle_ms)),
            LightKind::ColorTemp => Self::ColorTemp(ColorTempLight::new(persisted, throttle_ms)),
            LightKind::Color => Self::Color(ColorLight::new(persisted, throttle_ms)),
            LightKind::ColorTempAndColor => {
                Self::ColorTempAndColor(ColorTempColorLight::new(persisted, throttle_ms))
            }
        }
    }

    /// Returns the light kind.
    #[must_use]
    pub fn kind(&self) -> LightKind {
        self.slots().kind()
    }

    /// Returns the effective state.
    #[must_use]
    pub fn state(&self) -> &LightState {
        self.slots().effective_state()
    }

    /// Returns the light as its on/off capability.
    #[must_use]
    pub fn as_on_off(&self) -> &dyn OnOff {
        match self {
            Self::OnOff(l) => l,
            Self::Brightness(l) => l,
            Self::ColorTemp(l) => l,
            Self::Color(l) => l,
            Self::ColorTempAndColor(l) => l,
        }
    }

    /// Returns the light as its on/off capability for staging.
    pub fn as_on_off_mut(&mut self) -> &mut dyn OnOff {
        match self {
            Self::OnOff(l) => l,
            Self::Brightness(l) => l,
            Self::ColorTemp(l) => l,
            Self::Color(l) => l,
            Self::ColorTempAndColor(l) => l,
        }
    }

    /// Returns the brightness capability, if supported.
    #[must_use]
    pub fn as_dimmable(&self) -> Option<&dyn Dimmable> {
        match self {
            Self::OnOff(_) => None,
            Self::Brightness(l) => Some(l),
            Self::ColorTemp(l) => Some(l),
            Self::Color(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
        }
    }

    /// Returns the brightness capability for staging, if supported.
    pub fn as_dimmable_mut(&mut self) -> Option<&mut dyn Dimmable> {
        match self {
            Self::OnOff(_) => None,
            Self::Brightness(l) => Some(l),
            Self::ColorTemp(l) => Some(l),
            Self::Color(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
        }
    }

    /// Returns the color temperature capability, if supported.
    #[must_use]
    pub fn as_color_temperature(&self) -> Option<&dyn ColorTemperature> {
        match self {
            Self::ColorTemp(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the color temperature capability for staging, if supported.
    pub fn as_color_temperature_mut(&mut self) -> Option<&mut dyn ColorTemperature> {
        match self {
            Self::ColorTemp(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the color capability, if supported.
    #[must_use]
    pub fn as_full_color(&self) -> Option<&dyn FullColor> {
        match self {
            Self::Color(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the color capability for staging, if supported.
    pub fn as_full_color_mut(&mut self) -> Option<&mut dyn FullColor> {
        match self {
            Self::Color(l) => Some(l),
            Self::ColorTempAndColor(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the brightness capability for staging.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCapability` for on/off-only lights.
    pub fn require_dimmable_mut(&mut self) -> Result<&mut dyn Dimmable> {
        self.as_dimmable_mut()
            .ok_or(Error::UnsupportedCapability {
                capability: Capability::Brightness,
            })
    }

    /// Returns the color temperature capability for staging.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCapability` if the light has no white
    /// temperature control.
    pub fn require_color_temperature_mut(&mut self) -> Result<&mut dyn ColorTemperature> {
        self.as_color_temperature_mut()
            .ok_or(Error::UnsupportedCapability {
                capability: Capability::ColorTemperature,
            })
    }

    /// Returns the color capability for staging.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCapability` if the light has no color.
    pub fn require_full_color_mut(&mut self) -> Result<&mut dyn FullColor> {
        self.as_full_color_mut()
            .ok_or(Error::UnsupportedCapability {
                capability: Capability::FullColor,
            })
    }
}

impl OnOff for Light {
    fn slots(&self) -> &LightSlots {
        self.as_on_off().slots()
    }

    fn slots_mut(&mut self) -> &mut LightSlots {
        self.as_on_off_mut().slots_mut()
    }

    fn set_flash(&mut self, flash: &str) {
        self.as_on_off_mut().set_flash(flash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HueSat;

    #[test]
    fn variant_follows_kind() {
        for kind in [
            LightKind::OnOff,
            LightKind::Brightness,
            LightKind::ColorTemp,
            LightKind::Color,
            LightKind::ColorTempAndColor,
        ] {
            assert_eq!(Light::new(kind, LightState::new(), None).kind(), kind);
        }
    }

    #[test]
    fn capability_accessors_match_kind() {
        let mut light = Light::new(LightKind::ColorTemp, LightState::new(), None);
        assert!(light.as_dimmable().is_some());
        assert!(light.as_color_temperature().is_some());
        assert!(light.as_full_color().is_none());
        assert!(light.as_full_color_mut().is_none());

        let light = Light::new(LightKind::ColorTempAndColor, LightState::new(), None);
        assert!(light.as_color_temperature().is_some());
        assert!(light.as_full_color().is_some());

        let light = Light::new(LightKind::OnOff, LightState::new(), None);
        assert!(light.as_dimmable().is_none());
    }

    #[test]
    fn require_reports_missing_capability() {
        let mut light = Light::new(LightKind::Brightness, LightState::new(), None);
        assert!(light.require_dimmable_mut().is_ok());

        let err = light.require_full_color_mut().err().unwrap();
        assert!(matches!(
            err,
            Error::UnsupportedCapability {
                capability: Capability::FullColor
            }
        ));

        let mut light = Light::new(LightKind::OnOff, LightState::new(), None);
        assert!(matches!(
            light.require_dimmable_mut().err().unwrap(),
            Error::UnsupportedCapability {
                capability: Capability::Brightness
            }
        ));
    }

    #[test]
    fn flash_through_enum_keeps_variant_behavior() {
        let mut light = Light::new(LightKind::Color, LightState::new(), None);
        light.set_flash("short");
        assert_eq!(
            light.slots().pending_command().unwrap().hue_saturation,
            Some(HueSat::WHITE)
        );
    }
}
