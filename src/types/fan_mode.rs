// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed of the air conditioner (`WdSpd` option).

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Host-facing fan mode.
///
/// # Examples
///
/// ```
/// use gree_climate::types::FanMode;
///
/// assert_eq!(FanMode::from_index(3), Some(FanMode::Medium));
/// assert_eq!(FanMode::MediumLow.as_str(), "medium-low");
/// assert_eq!(FanMode::from_index(7), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FanMode {
    /// Device picks the speed.
    #[default]
    Auto,
    /// Lowest speed.
    Low,
    /// Between low and medium.
    MediumLow,
    /// Medium speed.
    Medium,
    /// Between medium and high.
    MediumHigh,
    /// Highest speed.
    High,
}

/// Index-to-variant table for the device `WdSpd` option.
pub const FAN_MODES: [FanMode; 6] = [
    FanMode::Auto,
    FanMode::Low,
    FanMode::MediumLow,
    FanMode::Medium,
    FanMode::MediumHigh,
    FanMode::High,
];

impl FanMode {
    /// Returns the fan mode for a raw `WdSpd` value, if it is a valid index.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| FAN_MODES.get(i).copied())
    }

    /// Returns the raw `WdSpd` value for this fan mode.
    #[must_use]
    pub const fn index(&self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Low => 1,
            Self::MediumLow => 2,
            Self::Medium => 3,
            Self::MediumHigh => 4,
            Self::High => 5,
        }
    }

    /// Returns the host-facing name of the fan mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Low => "low",
            Self::MediumLow => "medium-low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FAN_MODES
            .iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ValueError::InvalidMode(s.to_string()))
    }
}
