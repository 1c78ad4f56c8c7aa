// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preset mode (sleep).

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Host-facing preset mode, derived from the `SwhSlp` option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PresetMode {
    /// No preset active.
    #[default]
    None,
    /// Sleep mode.
    Sleep,
}

/// All preset modes offered to the host.
pub const PRESET_MODES: [PresetMode; 2] = [PresetMode::None, PresetMode::Sleep];

impl PresetMode {
    /// Derives the preset from a raw `SwhSlp` value.
    #[must_use]
    pub const fn from_sleep_flag(value: i64) -> Self {
        if value == 0 { Self::None } else { Self::Sleep }
    }

    /// Returns the host-facing name of the preset.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "sleep" => Ok(Self::Sleep),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_flag() {
        assert_eq!(PresetMode::from_sleep_flag(0), PresetMode::None);
        assert_eq!(PresetMode::from_sleep_flag(1), PresetMode::Sleep);
        assert_eq!(PresetMode::from_sleep_flag(3), PresetMode::Sleep);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Sleep".parse::<PresetMode>().unwrap(), PresetMode::Sleep);
        assert!("eco".parse::<PresetMode>().is_err());
    }
}
