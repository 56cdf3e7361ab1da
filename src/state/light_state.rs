// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{HueSat, RgbColor, XyColor};

/// One snapshot of a light's attributes.
///
/// Every field is optional. `None` means "no opinion", which is distinct from
/// any explicit value such as `Some(false)` or `Some(0)`. The reconciliation
/// in [`reconcile`](super::reconcile) relies on this distinction, so missing
/// values must never be defaulted.
///
/// The serialized form is the `hass_state` block stored in each light's
/// configuration.
///
/// # Examples
///
/// ```
/// use emuhue_lib::state::LightState;
///
/// let state = LightState {
///     power_state: Some(true),
///     brightness: Some(128),
///     ..LightState::default()
/// };
/// assert!(!state.is_empty());
/// assert_eq!(LightState::default(), LightState::new());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightState {
    /// Whether the light is on.
    pub power_state: Option<bool>,
    /// Whether the platform can currently reach the light.
    pub reachable: Option<bool>,
    /// Brightness (0-255).
    pub brightness: Option<u8>,
    /// Color temperature in mireds.
    pub color_temp: Option<u16>,
    /// Hue and saturation.
    pub hue_saturation: Option<HueSat>,
    /// CIE xy color.
    pub xy_color: Option<XyColor>,
    /// RGB color.
    pub rgb_color: Option<RgbColor>,
    /// Named effect, e.g. `colorloop`.
    pub effect: Option<String>,
    /// Flash mode, `short` or `long`.
    pub flash: Option<String>,
    /// Transition duration in seconds.
    pub transition_seconds: Option<f64>,
}

/// Names a single [`LightState`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    /// [`LightState::power_state`]
    PowerState,
    /// [`LightState::reachable`]
    Reachable,
    /// [`LightState::brightness`]
    Brightness,
    /// [`LightState::color_temp`]
    ColorTemp,
    /// [`LightState::hue_saturation`]
    HueSaturation,
    /// [`LightState::xy_color`]
    XyColor,
    /// [`LightState::rgb_color`]
    RgbColor,
    /// [`LightState::effect`]
    Effect,
    /// [`LightState::flash`]
    Flash,
    /// [`LightState::transition_seconds`]
    TransitionSeconds,
}

impl StateField {
    /// Every field, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::PowerState,
        Self::Reachable,
        Self::Brightness,
        Self::ColorTemp,
        Self::HueSaturation,
        Self::XyColor,
        Self::RgbColor,
        Self::Effect,
        Self::Flash,
        Self::TransitionSeconds,
    ];
}

impl LightState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state that only carries a power value.
    #[must_use]
    pub fn with_power(power_state: Option<bool>) -> Self {
        Self {
            power_state,
            ..Self::default()
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StateField::ALL.iter().all(|f| !self.has(*f))
    }

    /// Returns `true` if `field` is set.
    #[must_use]
    pub fn has(&self, field: StateField) -> bool {
        match field {
            StateField::PowerState => self.power_state.is_some(),
            StateField::Reachable => self.reachable.is_some(),
            StateField::Brightness => self.brightness.is_some(),
            StateField::ColorTemp => self.color_temp.is_some(),
            StateField::HueSaturation => self.hue_saturation.is_some(),
            StateField::XyColor => self.xy_color.is_some(),
            StateField::RgbColor => self.rgb_color.is_some(),
            StateField::Effect => self.effect.is_some(),
            StateField::Flash => self.flash.is_some(),
            StateField::TransitionSeconds => self.transition_seconds.is_some(),
        }
    }

    /// Resets `field` to unknown.
    pub fn clear(&mut self, field: StateField) {
        match field {
            StateField::PowerState => self.power_state = None,
            StateField::Reachable => self.reachable = None,
            StateField::Brightness => self.brightness = None,
            StateField::ColorTemp => self.color_temp = None,
            StateField::HueSaturation => self.hue_saturation = None,
            StateField::XyColor => self.xy_color = None,
            StateField::RgbColor => self.rgb_color = None,
            StateField::Effect => self.effect = None,
            StateField::Flash => self.flash = None,
            StateField::TransitionSeconds => self.transition_seconds = None,
        }
    }

    /// Keeps only the fields for which `owned` returns `true`.
    pub fn retain(&mut self, mut owned: impl FnMut(StateField) -> bool) {
        for field in StateField::ALL {
            if !owned(field) {
                self.clear(field);
            }
        }
    }

    /// Converts this state to Home Assistant `light.turn_on`/`turn_off`
    /// service data.
    ///
    /// Power is left out since it is expressed by which service is called.
    /// Unset fields are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use emuhue_lib::state::LightState;
    /// use emuhue_lib::types::HueSat;
    ///
    /// let state = LightState {
    ///     power_state: Some(true),
    ///     brightness: Some(200),
    ///     hue_saturation: Some(HueSat::new(120.0, 80.0)),
    ///     transition_seconds: Some(0.4),
    ///     ..LightState::default()
    /// };
    /// let data = state.to_service_data();
    /// assert_eq!(data["brightness"], 200);
    /// assert_eq!(data["hs_color"], serde_json::json!([120, 80]));
    /// assert_eq!(data["transition"], 0.4);
    /// assert!(!data.contains_key("power_state"));
    /// ```
    #[must_use]
    pub fn to_service_data(&self) -> Map<String, Value> {
        let mut data = Map::new();

        macro_rules! put {
            ($key:literal, $field:expr) => {
                if let Some(value) = &$field {
                    // Every field type serializes infallibly.
                    if let Ok(value) = serde_json::to_value(value) {
                        data.insert($key.to_string(), value);
                    }
                }
            };
        }

        put!("brightness", self.brightness);
        put!("color_temp", self.color_temp);
        put!("hs_color", self.hue_saturation);
        put!("xy_color", self.xy_color);
        put!("rgb_color", self.rgb_color);
        put!("effect", self.effect);
        put!("flash", self.flash);
        put!("transition", self.transition_seconds);

        data
    }
}
