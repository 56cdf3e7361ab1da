// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The five concrete light variants.

use super::LightSlots;
use super::traits::{ColorTemperature, Dimmable, FullColor, OnOff};
use crate::capabilities::LightKind;
use crate::state::LightState;

macro_rules! light_variant {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            slots: LightSlots,
        }

        impl $name {
            /// Creates the light from its last persisted state and throttle.
            #[must_use]
            pub fn new(persisted: LightState, throttle_ms: Option<u64>) -> Self {
                Self {
                    slots: LightSlots::new($kind, persisted, throttle_ms),
                }
            }
        }
    };
}

macro_rules! impl_on_off {
    ($name:ident) => {
        impl OnOff for $name {
            fn slots(&self) -> &LightSlots {
                &self.slots
            }

            fn slots_mut(&mut self) -> &mut LightSlots {
                &mut self.slots
            }
        }
    };
    // Flashing a color light always flashes white.
    ($name:ident, flash_white) => {
        impl OnOff for $name {
            fn slots(&self) -> &LightSlots {
                &self.slots
            }

            fn slots_mut(&mut self) -> &mut LightSlots {
                &mut self.slots
            }

            fn set_flash(&mut self, flash: &str) {
                self.slots.command_mut().flash = Some(flash.to_string());
                self.set_hue_sat(0.0, 0.0);
            }
        }
    };
}

light_variant!(
    /// A light that can only be switched.
    OnOffLight,
    LightKind::OnOff
);
light_variant!(
    /// A dimmable light.
    DimmableLight,
    LightKind::Brightness
);
light_variant!(
    /// A dimmable light with adjustable white temperature.
    ColorTempLight,
    LightKind::ColorTemp
);
light_variant!(
    /// A dimmable color light.
    ColorLight,
    LightKind::Color
);
light_variant!(
    /// A dimmable light with both color and white temperature.
    ColorTempColorLight,
    LightKind::ColorTempAndColor
);

impl_on_off!(OnOffLight);
impl_on_off!(DimmableLight);
impl_on_off!(ColorTempLight);
impl_on_off!(ColorLight, flash_white);
impl_on_off!(ColorTempColorLight, flash_white);

impl Dimmable for DimmableLight {}
impl Dimmable for ColorTempLight {}
impl Dimmable for ColorLight {}
impl Dimmable for ColorTempColorLight {}

impl ColorTemperature for ColorTempLight {}
impl ColorTemperature for ColorTempColorLight {}

impl FullColor for ColorLight {}
impl FullColor for ColorTempColorLight {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HueSat;

    #[test]
    fn brightness_is_clamped() {
        let mut light = DimmableLight::new(LightState::new(), None);

        light.set_brightness(300);
        assert_eq!(light.slots().pending_command().unwrap().brightness, Some(255));

        light.set_brightness(-5);
        assert_eq!(light.slots().pending_command().unwrap().brightness, Some(0));
    }

    #[test]
    fn setters_do_not_touch_effective_state() {
        let mut light = ColorTempLight::new(LightState::with_power(Some(false)), None);
        light.set_color_temperature(250);
        light.turn_on();

        assert_eq!(light.power_state(), Some(false));
        assert!(light.color_temp().is_none());

        let pending = light.slots().pending_command().unwrap();
        assert_eq!(pending.power_state, Some(true));
        assert_eq!(pending.color_temp, Some(250));
        assert_eq!(pending.transition_seconds, Some(0.4));
    }

    #[test]
    fn turn_on_keeps_staged_fields() {
        let mut light = DimmableLight::new(LightState::new(), None);
        light.set_brightness(80);
        light.set_effect("colorloop");
        light.turn_on();

        let pending = light.slots().pending_command().unwrap();
        assert_eq!(pending.brightness, Some(80));
        assert_eq!(pending.effect.as_deref(), Some("colorloop"));
        assert_eq!(pending.power_state, Some(true));
    }

    #[test]
    fn flash_on_color_light_forces_white() {
        let mut light = ColorLight::new(LightState::new(), None);
        light.set_hue_sat(120.0, 80.0);
        light.set_flash("short");

        let pending = light.slots().pending_command().unwrap();
        assert_eq!(pending.flash.as_deref(), Some("short"));
        assert_eq!(pending.hue_saturation, Some(HueSat::WHITE));
    }

    #[test]
    fn flash_on_combined_light_forces_white() {
        let mut light = ColorTempColorLight::new(LightState::new(), None);
        light.set_flash("long");
        assert_eq!(
            light.slots().pending_command().unwrap().hue_saturation,
            Some(HueSat::WHITE)
        );
    }

    #[test]
    fn flash_on_white_light_sets_flash_only() {
        let mut light = ColorTempLight::new(LightState::new(), None);
        light.set_flash("short");

        let pending = light.slots().pending_command().unwrap();
        assert_eq!(pending.flash.as_deref(), Some("short"));
        assert!(pending.hue_saturation.is_none());
    }

    #[test]
    fn transition_seconds_converted() {
        let mut light = OnOffLight::new(LightState::new(), None);
        light.set_transition_seconds(1.5);
        assert_eq!(
            light.slots().pending_command().unwrap().transition_seconds,
            Some(1.5)
        );

        light.set_transition_seconds(-2.0);
        assert_eq!(
            light.slots().pending_command().unwrap().transition_seconds,
            Some(0.0)
        );
    }

    #[test]
    fn color_setters_are_independent() {
        let mut light = ColorLight::new(LightState::new(), None);
        light.set_rgb(255, 0, 0);
        light.set_xy(0.3, 0.4);

        let pending = light.slots().pending_command().unwrap();
        assert!(pending.hue_saturation.is_none());
        assert!(pending.rgb_color.is_some());
        assert!(pending.xy_color.is_some());
    }
}
