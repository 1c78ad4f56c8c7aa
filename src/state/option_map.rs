// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw device option map.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{DEFAULT_SET_TEMP, HvacMode, PowerState};

/// Option keys used by the device protocol.
pub mod keys {
    /// Power (0 = off, nonzero = on).
    pub const POW: &str = "Pow";
    /// Operating mode index.
    pub const MOD: &str = "Mod";
    /// Whole part of the set point.
    pub const SET_TEM: &str = "SetTem";
    /// Literal first fractional digit of the set point.
    pub const ADD_TENTH: &str = "Add0.1";
    /// Fan speed index.
    pub const WD_SPD: &str = "WdSpd";
    /// Sleep mode flag.
    pub const SWH_SLP: &str = "SwhSlp";
    /// Quiet mode flag.
    pub const QUIET: &str = "Quiet";
    /// Fresh air valve.
    pub const AIR: &str = "Air";
    /// X-Fan (blow dry after cooling).
    pub const BLO: &str = "Blo";
    /// Health (anion) mode.
    pub const HEALTH: &str = "Health";
    /// Horizontal swing.
    pub const SWING_LF_RIG: &str = "SwingLfRig";
    /// Energy saving mode.
    pub const SV_ST: &str = "SvSt";
}

/// Mapping from device option key to its integer value.
///
/// This is the single source of truth for the device state. Keys are only
/// ever inserted or overwritten, never removed. Unknown keys are kept so
/// that newer firmware fields survive a merge.
///
/// # Examples
///
/// ```
/// use gree_climate::state::{OptionMap, keys};
///
/// let mut options = OptionMap::new();
/// assert_eq!(options.get(keys::POW), Some(0));
///
/// options.merge([(keys::POW.to_string(), 1), ("Lig".to_string(), 1)]);
/// assert_eq!(options.get(keys::POW), Some(1));
/// assert_eq!(options.get("Lig"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMap {
    values: BTreeMap<String, i64>,
}

impl OptionMap {
    /// Creates the initial option map of a device that has not reported yet.
    ///
    /// Contains exactly `Pow`, `Mod` (index of off), `WdSpd`, `SetTem` and
    /// `SwhSlp`.
    #[must_use]
    pub fn new() -> Self {
        let values = [
            (keys::POW, PowerState::Off.as_option()),
            (keys::MOD, HvacMode::Off.index()),
            (keys::WD_SPD, 0),
            (keys::SET_TEM, DEFAULT_SET_TEMP),
            (keys::SWH_SLP, 0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { values }
    }

    /// Returns the value of an option, if known.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    /// Returns `true` if the option has been seen.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the power state. An absent `Pow` counts as off.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.get(keys::POW)
            .map_or(PowerState::Off, PowerState::from_option)
    }

    /// Returns `true` if the unit is powered on.
    #[must_use]
    pub fn is_powered(&self) -> bool {
        self.power().is_on()
    }

    /// Inserts or overwrites every pair, in order.
    ///
    /// Returns the number of options whose value actually changed.
    pub fn merge<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut changed = 0;
        for (key, value) in pairs {
            if self.values.insert(key, value) != Some(value) {
                changed += 1;
            }
        }
        changed
    }

    /// Returns the number of known options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no option is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for OptionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
