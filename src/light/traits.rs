// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability traits implemented by the light variants.
//!
//! Getters read the effective state. Setters only stage a change in the
//! pending command; nothing reaches the platform until the owning device
//! executes.

use super::LightSlots;
use crate::capabilities::clamp_brightness;
use crate::types::{HueSat, RgbColor, XyColor};

// ===== On/Off =====

/// Power, reachability, transition and flash.
pub trait OnOff {
    /// Returns the light's state slots.
    fn slots(&self) -> &LightSlots;

    /// Returns the light's state slots for staging.
    fn slots_mut(&mut self) -> &mut LightSlots;

    /// Returns whether the light is on.
    fn power_state(&self) -> Option<bool> {
        self.slots().effective_state().power_state
    }

    /// Returns whether the platform can reach the light.
    fn reachable(&self) -> Option<bool> {
        self.slots().effective_state().reachable
    }

    /// Returns the transition duration in seconds.
    fn transition_seconds(&self) -> Option<f64> {
        self.slots().effective_state().transition_seconds
    }

    /// Returns the flash mode.
    fn flash_state(&self) -> Option<&str> {
        self.slots().effective_state().flash.as_deref()
    }

    /// Stages power on with the default transition.
    fn turn_on(&mut self) {
        self.slots_mut().stage_power(true);
    }

    /// Stages power off with the default transition.
    fn turn_off(&mut self) {
        self.slots_mut().stage_power(false);
    }

    /// Stages a transition in milliseconds.
    ///
    /// Values shorter than the light's throttle are raised to it.
    fn set_transition_ms(&mut self, transition_ms: u64) {
        self.slots_mut().stage_transition_ms(transition_ms);
    }

    /// Stages a transition in seconds. Negative values count as zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_transition_seconds(&mut self, seconds: f64) {
        self.set_transition_ms((seconds * 1000.0) as u64);
    }

    /// Stages a flash mode, `short` or `long`.
    fn set_flash(&mut self, flash: &str) {
        self.slots_mut().command_mut().flash = Some(flash.to_string());
    }
}

// ===== Brightness =====

/// Brightness and effects.
pub trait Dimmable: OnOff {
    /// Returns the brightness (0-255).
    fn brightness(&self) -> Option<u8> {
        self.slots().effective_state().brightness
    }

    /// Stages a brightness, clamped to 0-255.
    fn set_brightness(&mut self, brightness: i32) {
        self.slots_mut().command_mut().brightness = Some(clamp_brightness(f64::from(brightness)));
    }

    /// Returns the active effect.
    fn effect(&self) -> Option<&str> {
        self.slots().effective_state().effect.as_deref()
    }

    /// Stages an effect such as `colorloop`.
    fn set_effect(&mut self, effect: &str) {
        self.slots_mut().command_mut().effect = Some(effect.to_string());
    }
}

// ===== Color temperature =====

/// Color temperature in mireds.
pub trait ColorTemperature: Dimmable {
    /// Returns the color temperature in mireds.
    fn color_temp(&self) -> Option<u16> {
        self.slots().effective_state().color_temp
    }

    /// Stages a color temperature in mireds.
    fn set_color_temperature(&mut self, mireds: u16) {
        self.slots_mut().command_mut().color_temp = Some(mireds);
    }
}

// ===== Full color =====

/// Hue/saturation, xy and RGB color.
///
/// The three representations are independent; staging one leaves the
/// others untouched.
pub trait FullColor: Dimmable {
    /// Returns the hue and saturation.
    fn hue_sat(&self) -> Option<HueSat> {
        self.slots().effective_state().hue_saturation
    }

    /// Stages a hue (degrees) and saturation (percent), truncated to integers.
    fn set_hue_sat(&mut self, hue: f64, saturation: f64) {
        self.slots_mut().command_mut().hue_saturation = Some(HueSat::new(hue, saturation));
    }

    /// Returns the xy color.
    fn xy_color(&self) -> Option<XyColor> {
        self.slots().effective_state().xy_color
    }

    /// Stages an xy color.
    fn set_xy(&mut self, x: f64, y: f64) {
        self.slots_mut().command_mut().xy_color = Some(XyColor::new(x, y));
    }

    /// Returns the RGB color.
    fn rgb_color(&self) -> Option<RgbColor> {
        self.slots().effective_state().rgb_color
    }

    /// Stages an RGB color.
    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.slots_mut().command_mut().rgb_color = Some(RgbColor::new(red, green, blue));
    }
}
