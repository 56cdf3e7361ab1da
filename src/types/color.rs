// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color representations for light control.
//!
//! Each representation is stored exactly as it was reported or requested.
//! Nothing here converts between color spaces.
//!
//! All three types serialize as JSON arrays, the shape Home Assistant uses
//! for `hs_color`, `xy_color` and `rgb_color`. Deserialization accepts any
//! JSON number so that floats reported by the platform are coerced the same
//! way the setters coerce them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hue and saturation as integers.
///
/// Hue is in degrees (0-360) and saturation in percent (0-100), as reported
/// by Home Assistant's `hs_color` attribute.
///
/// # Examples
///
/// ```
/// use emuhue_lib::types::HueSat;
///
/// let white = HueSat::new(0.0, 0.0);
/// assert_eq!(white, HueSat::WHITE);
///
/// // Fractional values are truncated
/// let orange = HueSat::new(30.7, 99.9);
/// assert_eq!((orange.hue(), orange.saturation()), (30, 99));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[u16; 2]")]
pub struct HueSat {
    hue: u16,
    saturation: u16,
}

impl HueSat {
    /// Zero hue and zero saturation, i.e. white.
    pub const WHITE: Self = Self {
        hue: 0,
        saturation: 0,
    };

    /// Creates a hue/saturation pair, truncating both to integers.
    ///
    /// Negative values become 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(hue: f64, saturation: f64) -> Self {
        Self {
            hue: hue as u16,
            saturation: saturation as u16,
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation in percent.
    #[must_use]
    pub const fn saturation(&self) -> u16 {
        self.saturation
    }
}

impl From<[f64; 2]> for HueSat {
    fn from([hue, saturation]: [f64; 2]) -> Self {
        Self::new(hue, saturation)
    }
}

impl From<HueSat> for [u16; 2] {
    fn from(value: HueSat) -> Self {
        [value.hue, value.saturation]
    }
}

impl fmt::Display for HueSat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.hue, self.saturation)
    }
}

/// CIE 1931 x/y chromaticity coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct XyColor {
    x: f64,
    y: f64,
}

impl XyColor {
    /// Creates a new XY color.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Returns the y coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

impl From<[f64; 2]> for XyColor {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<XyColor> for [f64; 2] {
    fn from(value: XyColor) -> Self {
        [value.x, value.y]
    }
}

impl fmt::Display for XyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// An RGB color with 8 bits per channel.
///
/// # Examples
///
/// ```
/// use emuhue_lib::types::RgbColor;
///
/// let color: RgbColor = serde_json::from_str("[255, 127.6, 0]").unwrap();
/// assert_eq!(color, RgbColor::new(255, 127, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[u8; 3]")]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl From<[f64; 3]> for RgbColor {
    // Float to int casts saturate, so out-of-range channels land on 0 or 255.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from([red, green, blue]: [f64; 3]) -> Self {
        Self::new(red as u8, green as u8, blue as u8)
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(value: RgbColor) -> Self {
        [value.red, value.green, value.blue]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
