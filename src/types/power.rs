// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of the air conditioner (`Pow` option).

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of the unit.
///
/// # Examples
///
/// ```
/// use gree_climate::types::PowerState;
///
/// assert_eq!(PowerState::from_option(0), PowerState::Off);
/// assert_eq!(PowerState::from_option(1), PowerState::On);
/// assert_eq!(PowerState::On.as_option(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum PowerState {
    /// Power is off.
    #[default]
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Interprets a raw `Pow` value. Any nonzero value means on.
    #[must_use]
    pub const fn from_option(value: i64) -> Self {
        if value == 0 { Self::Off } else { Self::On }
    }

    /// Returns the raw `Pow` value.
    #[must_use]
    pub const fn as_option(&self) -> i64 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns `true` if the unit is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidMode(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_treats_nonzero_as_on() {
        assert_eq!(PowerState::from_option(0), PowerState::Off);
        assert_eq!(PowerState::from_option(1), PowerState::On);
        assert_eq!(PowerState::from_option(-1), PowerState::On);
    }

    #[test]
    fn parse_strings() {
        assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("0".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!("blink".parse::<PowerState>().is_err());
    }

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }
}
