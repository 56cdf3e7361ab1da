// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-light command throttling.

use std::time::Duration;

use tokio::time::Instant;

use crate::state::LightState;

/// Rate limiter for outbound commands.
///
/// A command is let through when the light is unthrottled, or when it
/// changes something and the previous command is at least `interval` old.
/// A light that never sent a command is not time-limited.
#[derive(Debug, Clone)]
pub(crate) struct Throttle {
    interval: Option<Duration>,
    // Unset until the first command, which is never time-limited.
    last_update: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|d| !d.is_zero()),
            last_update: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// Decides whether a command may be sent at `now`, recording `now` as the
    /// last update when it may.
    pub fn allow(
        &mut self,
        effective: &LightState,
        pending: Option<&LightState>,
        now: Instant,
    ) -> bool {
        let Some(interval) = self.interval else {
            return true;
        };

        if pending == Some(effective) {
            return false;
        }

        if let Some(last) = self.last_update
            && now.saturating_duration_since(last) < interval
        {
            return false;
        }

        self.last_update = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change() -> LightState {
        LightState {
            brightness: Some(10),
            ..LightState::default()
        }
    }

    #[test]
    fn unthrottled_always_allows() {
        let mut throttle = Throttle::new(None);
        let now = Instant::now();
        let state = change();
        assert!(throttle.allow(&state, Some(&state), now));
        assert!(throttle.allow(&state, Some(&state), now));
        assert!(throttle.last_update().is_none());
    }

    #[test]
    fn zero_interval_is_unthrottled() {
        let throttle = Throttle::new(Some(Duration::ZERO));
        assert!(throttle.interval().is_none());
    }

    #[test]
    fn unchanged_command_denied() {
        let mut throttle = Throttle::new(Some(Duration::from_millis(100)));
        let state = change();
        assert!(!throttle.allow(&state, Some(&state), Instant::now()));
    }

    #[test]
    fn first_command_allowed() {
        let mut throttle = Throttle::new(Some(Duration::from_secs(1)));
        let now = Instant::now();
        assert!(throttle.allow(&LightState::new(), Some(&change()), now));
        assert_eq!(throttle.last_update(), Some(now));
    }

    #[test]
    fn command_within_interval_denied() {
        let mut throttle = Throttle::new(Some(Duration::from_secs(1)));
        let start = Instant::now();
        assert!(throttle.allow(&LightState::new(), Some(&change()), start));

        let later = start + Duration::from_millis(500);
        assert!(!throttle.allow(&LightState::new(), Some(&change()), later));
        assert_eq!(throttle.last_update(), Some(start));

        let much_later = start + Duration::from_millis(1000);
        assert!(throttle.allow(&LightState::new(), Some(&change()), much_later));
        assert_eq!(throttle.last_update(), Some(much_later));
    }
}
