// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of the air conditioner.
//!
//! The device reports its mode as an index (`Mod`) into a fixed list. The
//! list keeps `Off` at index 5 so that every host-facing mode has an index,
//! even though the unit itself is switched off through `Pow`, never by
//! selecting that index.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Host-facing hvac mode.
///
/// # Examples
///
/// ```
/// use gree_climate::types::HvacMode;
///
/// assert_eq!(HvacMode::from_index(2), Some(HvacMode::Dry));
/// assert_eq!(HvacMode::Heat.index(), 4);
/// assert_eq!(HvacMode::from_index(9), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    /// Automatic heating or cooling.
    Auto,
    /// Cooling.
    Cool,
    /// Dehumidification.
    Dry,
    /// Fan only, no compressor.
    FanOnly,
    /// Heating.
    Heat,
    /// Unit is off.
    #[default]
    Off,
}

/// Index-to-variant table for the device `Mod` option.
pub const HVAC_MODES: [HvacMode; 6] = [
    HvacMode::Auto,
    HvacMode::Cool,
    HvacMode::Dry,
    HvacMode::FanOnly,
    HvacMode::Heat,
    HvacMode::Off,
];

impl HvacMode {
    /// Returns the mode for a raw `Mod` value, if it is a valid index.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| HVAC_MODES.get(i).copied())
    }

    /// Returns the raw `Mod` value for this mode.
    #[must_use]
    pub const fn index(&self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Cool => 1,
            Self::Dry => 2,
            Self::FanOnly => 3,
            Self::Heat => 4,
            Self::Off => 5,
        }
    }

    /// Returns the host-facing name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cool => "cool",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
            Self::Heat => "heat",
            Self::Off => "off",
        }
    }

    /// Returns `true` for every mode except [`HvacMode::Off`].
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HVAC_MODES
            .iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ValueError::InvalidMode(s.to_string()))
    }
}

impl TryFrom<i64> for HvacMode {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or(ValueError::OutOfRange {
            min: 0,
            max: 5,
            actual: value,
        })
    }
}
