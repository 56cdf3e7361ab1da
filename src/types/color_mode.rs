// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant color modes.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A color mode reported in a light's `supported_color_modes` attribute.
///
/// # Examples
///
/// ```
/// use emuhue_lib::types::ColorMode;
///
/// let mode: ColorMode = "color_temp".parse().unwrap();
/// assert_eq!(mode, ColorMode::ColorTemp);
/// assert!(!mode.is_color());
/// assert!(mode.is_white());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// On/off only.
    Onoff,
    /// Dimmable.
    Brightness,
    /// Dimmable with adjustable color temperature.
    ColorTemp,
    /// Hue/saturation color.
    Hs,
    /// CIE xy color.
    Xy,
    /// RGB color.
    Rgb,
    /// RGB with a white channel.
    Rgbw,
    /// RGB with cold and warm white channels.
    Rgbww,
    /// White mode on an otherwise color-capable light.
    White,
    /// Any mode this library does not know about.
    #[serde(other)]
    Unknown,
}

impl ColorMode {
    /// Returns `true` for modes that allow setting an arbitrary color.
    #[must_use]
    pub const fn is_color(self) -> bool {
        matches!(
            self,
            Self::Hs | Self::Xy | Self::Rgb | Self::Rgbw | Self::Rgbww
        )
    }

    /// Returns `true` for modes that carry a white or temperature channel.
    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(
            self,
            Self::ColorTemp | Self::Rgbw | Self::Rgbww | Self::White
        )
    }

    /// Returns the Home Assistant name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onoff => "onoff",
            Self::Brightness => "brightness",
            Self::ColorTemp => "color_temp",
            Self::Hs => "hs",
            Self::Xy => "xy",
            Self::Rgb => "rgb",
            Self::Rgbw => "rgbw",
            Self::Rgbww => "rgbww",
            Self::White => "white",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "onoff" => Self::Onoff,
            "brightness" => Self::Brightness,
            "color_temp" => Self::ColorTemp,
            "hs" => Self::Hs,
            "xy" => Self::Xy,
            "rgb" => Self::Rgb,
            "rgbw" => Self::Rgbw,
            "rgbww" => Self::Rgbww,
            "white" => Self::White,
            _ => Self::Unknown,
        })
    }
}

/// The unordered set of color modes a light supports.
///
/// # Examples
///
/// ```
/// use emuhue_lib::types::{ColorMode, ColorModes};
///
/// let modes: ColorModes = ["hs", "color_temp"].into_iter().collect();
/// assert!(modes.contains(ColorMode::Hs));
/// assert!(modes.any_color());
/// assert!(modes.any_white());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorModes(BTreeSet<ColorMode>);

impl ColorModes {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `mode` is in the set.
    #[must_use]
    pub fn contains(&self, mode: ColorMode) -> bool {
        self.0.contains(&mode)
    }

    /// Returns `true` if any color mode is in the set.
    #[must_use]
    pub fn any_color(&self) -> bool {
        self.0.iter().any(|m| m.is_color())
    }

    /// Returns `true` if any white or temperature mode is in the set.
    #[must_use]
    pub fn any_white(&self) -> bool {
        self.0.iter().any(|m| m.is_white())
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the modes in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = ColorMode> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ColorMode> for ColorModes {
    fn from_iter<I: IntoIterator<Item = ColorMode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ColorModes {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .map(|s| s.parse().unwrap_or(ColorMode::Unknown))
            .collect()
    }
}
