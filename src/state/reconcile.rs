// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Three-way state merge.

use super::LightState;

/// Computes the effective state of a light.
///
/// For every field the result takes the first value present in:
///
/// 1. `platform` - what Home Assistant last reported
/// 2. `pending` - what the last command asked for
/// 3. `persisted` - the previous effective state
///
/// A field absent from all three stays absent.
///
/// # Examples
///
/// ```
/// use emuhue_lib::state::{LightState, reconcile};
///
/// let platform = LightState { power_state: Some(true), ..LightState::default() };
/// let pending = LightState { power_state: Some(false), brightness: Some(10), ..LightState::default() };
/// let persisted = LightState { brightness: Some(99), color_temp: Some(300), ..LightState::default() };
///
/// let effective = reconcile(&platform, Some(&pending), &persisted);
/// assert_eq!(effective.power_state, Some(true));
/// assert_eq!(effective.brightness, Some(10));
/// assert_eq!(effective.color_temp, Some(300));
/// ```
#[must_use]
pub fn reconcile(
    platform: &LightState,
    pending: Option<&LightState>,
    persisted: &LightState,
) -> LightState {
    macro_rules! pick {
        ($field:ident) => {
            platform
                .$field
                .clone()
                .or_else(|| pending.and_then(|p| p.$field.clone()))
                .or_else(|| persisted.$field.clone())
        };
    }

    LightState {
        power_state: pick!(power_state),
        reachable: pick!(reachable),
        brightness: pick!(brightness),
        color_temp: pick!(color_temp),
        hue_saturation: pick!(hue_saturation),
        xy_color: pick!(xy_color),
        rgb_color: pick!(rgb_color),
        effect: pick!(effect),
        flash: pick!(flash),
        transition_seconds: pick!(transition_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HueSat, RgbColor};

    fn full(brightness: u8, effect: &str) -> LightState {
        LightState {
            power_state: Some(true),
            reachable: Some(true),
            brightness: Some(brightness),
            color_temp: Some(u16::from(brightness) + 150),
            hue_saturation: Some(HueSat::new(f64::from(brightness), 50.0)),
            xy_color: None,
            rgb_color: Some(RgbColor::new(brightness, 0, 0)),
            effect: Some(effect.to_string()),
            flash: Some("short".to_string()),
            transition_seconds: Some(1.0),
        }
    }

    #[test]
    fn platform_wins_over_everything() {
        let platform = full(1, "platform");
        let pending = full(2, "pending");
        let persisted = full(3, "persisted");

        assert_eq!(reconcile(&platform, Some(&pending), &persisted), platform);
    }

    #[test]
    fn pending_fills_platform_gaps() {
        let pending = full(2, "pending");
        let persisted = full(3, "persisted");

        assert_eq!(
            reconcile(&LightState::new(), Some(&pending), &persisted),
            pending
        );
    }

    #[test]
    fn persisted_is_last_resort() {
        let persisted = full(3, "persisted");

        assert_eq!(reconcile(&LightState::new(), None, &persisted), persisted);
        assert_eq!(
            reconcile(&LightState::new(), Some(&LightState::new()), &persisted),
            persisted
        );
    }

    #[test]
    fn priority_is_per_field() {
        let platform = LightState {
            reachable: Some(false),
            ..LightState::default()
        };
        let pending = LightState {
            power_state: Some(true),
            brightness: Some(40),
            ..LightState::default()
        };
        let persisted = LightState {
            power_state: Some(false),
            reachable: Some(true),
            brightness: Some(200),
            effect: Some("colorloop".to_string()),
            ..LightState::default()
        };

        let effective = reconcile(&platform, Some(&pending), &persisted);
        assert_eq!(effective.reachable, Some(false));
        assert_eq!(effective.power_state, Some(true));
        assert_eq!(effective.brightness, Some(40));
        assert_eq!(effective.effect.as_deref(), Some("colorloop"));
        assert!(effective.color_temp.is_none());
    }

    #[test]
    fn explicit_false_from_platform_is_kept() {
        let platform = LightState::with_power(Some(false));
        let persisted = LightState::with_power(Some(true));

        let effective = reconcile(&platform, None, &persisted);
        assert_eq!(effective.power_state, Some(false));
    }

    #[test]
    fn all_absent_stays_absent() {
        let effective = reconcile(&LightState::new(), None, &LightState::new());
        assert!(effective.is_empty());
    }
}
