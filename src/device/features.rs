// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host feature flags.

use serde::{Deserialize, Serialize};

/// A climate capability advertised to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateFeature {
    /// Target temperature can be set.
    TargetTemperature,
    /// Fan mode can be set.
    FanMode,
    /// Preset mode can be set.
    PresetMode,
    /// Supports explicit turn on.
    TurnOn,
    /// Supports explicit turn off.
    TurnOff,
}

/// Everything a Gree unit supports.
pub const SUPPORTED_FEATURES: [ClimateFeature; 5] = [
    ClimateFeature::TargetTemperature,
    ClimateFeature::FanMode,
    ClimateFeature::PresetMode,
    ClimateFeature::TurnOn,
    ClimateFeature::TurnOff,
];

impl ClimateFeature {
    /// Host bit for this feature.
    #[must_use]
    pub const fn bit(&self) -> u32 {
        match self {
            Self::TargetTemperature => 1,
            Self::FanMode => 8,
            Self::PresetMode => 16,
            Self::TurnOff => 128,
            Self::TurnOn => 256,
        }
    }

    /// Combines features into the host's bitmask.
    #[must_use]
    pub fn mask(features: &[Self]) -> u32 {
        features.iter().fold(0, |acc, f| acc | f.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_mask() {
        assert_eq!(ClimateFeature::mask(&SUPPORTED_FEATURES), 1 | 8 | 16 | 128 | 256);
    }
}
