// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The three state slots of a light.

use std::time::Duration;

use tokio::time::Instant;

use super::throttle::Throttle;
use crate::capabilities::LightKind;
use crate::platform::EntityState;
use crate::state::{LightState, reconcile};

/// Transition applied by `turn_on`/`turn_off` when nothing longer is needed.
pub const DEFAULT_TRANSITION_SECONDS: f64 = 0.4;

/// Platform, pending and effective state of one light, plus its throttle.
///
/// Only the light variant owning a `LightSlots` writes to it. Reads are
/// public so the bridge layer can inspect all three snapshots.
#[derive(Debug, Clone)]
pub struct LightSlots {
    kind: LightKind,
    platform: LightState,
    pending: Option<LightState>,
    effective: LightState,
    throttle: Throttle,
    default_transition: f64,
}

impl LightSlots {
    /// Creates the slots of a light whose last persisted state is `persisted`.
    ///
    /// Fields `kind` does not own are dropped from `persisted`.
    #[must_use]
    pub fn new(kind: LightKind, persisted: LightState, throttle_ms: Option<u64>) -> Self {
        let throttle = Throttle::new(throttle_ms.map(Duration::from_millis));

        #[allow(clippy::cast_precision_loss)]
        let default_transition = throttle_ms
            .map(|ms| ms as f64 / 1000.0)
            .map_or(DEFAULT_TRANSITION_SECONDS, |t| {
                t.max(DEFAULT_TRANSITION_SECONDS)
            });

        let mut effective = persisted;
        effective.retain(|f| kind.owns(f));

        Self {
            kind,
            platform: LightState::default(),
            pending: None,
            effective,
            throttle,
            default_transition,
        }
    }

    /// Returns the light kind.
    #[must_use]
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Returns the last state observed from the platform.
    #[must_use]
    pub fn platform_state(&self) -> &LightState {
        &self.platform
    }

    /// Returns the command staged since the last execute, if any.
    #[must_use]
    pub fn pending_command(&self) -> Option<&LightState> {
        self.pending.as_ref()
    }

    /// Returns the reconciled state.
    #[must_use]
    pub fn effective_state(&self) -> &LightState {
        &self.effective
    }

    /// Returns the command throttle.
    #[must_use]
    pub fn throttle(&self) -> Option<Duration> {
        self.throttle.interval()
    }

    /// Returns when the last command was let through.
    #[must_use]
    pub fn last_update(&self) -> Option<Instant> {
        self.throttle.last_update()
    }

    /// Returns the transition used by `turn_on`/`turn_off`.
    #[must_use]
    pub fn default_transition_seconds(&self) -> f64 {
        self.default_transition
    }

    /// Returns the pending command, starting one if none is staged.
    ///
    /// A fresh command carries the last known power state and nothing else.
    pub(crate) fn command_mut(&mut self) -> &mut LightState {
        let power_state = self.effective.power_state;
        self.pending
            .get_or_insert_with(|| LightState::with_power(power_state))
    }

    pub(crate) fn stage_power(&mut self, on: bool) {
        let transition = self.default_transition;
        let command = self.command_mut();
        command.power_state = Some(on);
        command.transition_seconds = Some(transition);
    }

    /// Stages a transition, never shorter than the throttle.
    pub(crate) fn stage_transition_ms(&mut self, transition_ms: u64) {
        #[allow(clippy::cast_possible_truncation)]
        let floor = self.throttle().map_or(0, |t| t.as_millis() as u64);

        #[allow(clippy::cast_precision_loss)]
        let seconds = transition_ms.max(floor) as f64 / 1000.0;
        self.command_mut().transition_seconds = Some(seconds);
    }

    /// Replaces the platform state with one extracted from `entity`.
    pub(crate) fn observe(&mut self, entity: &EntityState, full_update: bool) {
        let mut platform = self.kind.extract(entity, &self.platform, full_update);
        platform.retain(|f| self.kind.owns(f));
        self.platform = platform;
    }

    /// Recomputes the effective state from the three slots.
    pub(crate) fn reconcile(&mut self) -> &LightState {
        let mut effective = reconcile(&self.platform, self.pending.as_ref(), &self.effective);
        effective.retain(|f| self.kind.owns(f));
        self.effective = effective;
        &self.effective
    }

    /// Consults the throttle for the pending command.
    pub(crate) fn update_allowed(&mut self, now: Instant) -> bool {
        self.throttle.allow(&self.effective, self.pending.as_ref(), now)
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_state_is_masked() {
        let persisted = LightState {
            power_state: Some(true),
            color_temp: Some(300),
            ..LightState::default()
        };
        let slots = LightSlots::new(LightKind::Brightness, persisted, None);
        assert_eq!(slots.effective_state().power_state, Some(true));
        assert!(slots.effective_state().color_temp.is_none());
    }

    #[test]
    fn fresh_command_carries_power_only() {
        let persisted = LightState {
            power_state: Some(false),
            brightness: Some(77),
            ..LightState::default()
        };
        let mut slots = LightSlots::new(LightKind::Brightness, persisted, None);

        slots.command_mut().brightness = Some(10);

        let pending = slots.pending_command().unwrap();
        assert_eq!(pending.power_state, Some(false));
        assert_eq!(pending.brightness, Some(10));
        assert!(pending.reachable.is_none());
    }

    #[test]
    fn default_transition_follows_throttle() {
        let slots = LightSlots::new(LightKind::OnOff, LightState::new(), None);
        assert!((slots.default_transition_seconds() - 0.4).abs() < f64::EPSILON);

        let slots = LightSlots::new(LightKind::OnOff, LightState::new(), Some(100));
        assert!((slots.default_transition_seconds() - 0.4).abs() < f64::EPSILON);

        let slots = LightSlots::new(LightKind::OnOff, LightState::new(), Some(1500));
        assert!((slots.default_transition_seconds() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn transition_floored_at_throttle() {
        let mut slots = LightSlots::new(LightKind::OnOff, LightState::new(), Some(800));
        slots.stage_transition_ms(100);
        assert_eq!(
            slots.pending_command().unwrap().transition_seconds,
            Some(0.8)
        );

        slots.stage_transition_ms(2000);
        assert_eq!(
            slots.pending_command().unwrap().transition_seconds,
            Some(2.0)
        );
    }

    #[test]
    fn observe_masks_unowned_fields() {
        let mut slots = LightSlots::new(LightKind::OnOff, LightState::new(), None);
        let entity = EntityState::new("light.a", "on").with_attribute("brightness", 100);
        slots.observe(&entity, true);
        assert_eq!(slots.platform_state().power_state, Some(true));
        assert!(slots.platform_state().brightness.is_none());
    }

    #[test]
    fn reconcile_uses_pending_then_persisted() {
        let persisted = LightState {
            brightness: Some(50),
            effect: Some("none".to_string()),
            ..LightState::default()
        };
        let mut slots = LightSlots::new(LightKind::Brightness, persisted, None);
        slots.command_mut().effect = Some("colorloop".to_string());

        let effective = slots.reconcile().clone();
        assert_eq!(effective.brightness, Some(50));
        assert_eq!(effective.effect.as_deref(), Some("colorloop"));
    }
}
