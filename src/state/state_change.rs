// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes describe how the host-facing [`ClimateState`](super::ClimateState)
//! moved after a packet merge or a sensor reading. They are produced by the
//! model itself and handed to subscribers; the host never applies them to
//! the option map.
//!
//! # Examples
//!
//! ```
//! use gree_climate::state::{ClimateState, StateChange};
//! use gree_climate::types::HvacMode;
//!
//! let mut state = ClimateState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::HvacMode(HvacMode::Cool)));
//! assert!(!state.apply(&StateChange::HvacMode(HvacMode::Cool)));
//! ```

use crate::types::{FanMode, HvacMode, PowerState, PresetMode};

/// Represents a change in host-facing climate state.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Unit was switched on or off.
    Power(PowerState),

    /// Hvac mode changed.
    HvacMode(HvacMode),

    /// Fan mode changed.
    FanMode(FanMode),

    /// Target temperature changed.
    TargetTemperature(f64),

    /// Preset mode changed.
    PresetMode(PresetMode),

    /// Sensor temperature changed, in the configured unit.
    CurrentTemperature(f64),

    /// Device became available.
    Available(bool),
}

impl StateChange {
    /// Returns `true` if this change came from the device option map.
    #[must_use]
    pub fn is_device(&self) -> bool {
        matches!(
            self,
            Self::Power(_)
                | Self::HvacMode(_)
                | Self::FanMode(_)
                | Self::TargetTemperature(_)
                | Self::PresetMode(_)
        )
    }

    /// Returns `true` if this is a sensor reading.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::CurrentTemperature(_))
    }
}
