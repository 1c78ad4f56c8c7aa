// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! The [`OptionMap`] holds the raw option values reported by the unit and is
//! the single source of truth. [`ClimateState`] is the host-facing view,
//! recomputed from the option map by the `derive_*` functions after every
//! merge. [`StateChange`] describes how that view moved.
//!
//! # Examples
//!
//! ```
//! use gree_climate::state::{ClimateState, OptionMap, StateChange, keys};
//! use gree_climate::types::HvacMode;
//!
//! let mut options = OptionMap::new();
//! let mut state = ClimateState::new();
//!
//! options.merge([(keys::POW.to_string(), 1), (keys::MOD.to_string(), 4)]);
//! let changes = state.rederive(&options);
//!
//! assert!(changes.contains(&StateChange::HvacMode(HvacMode::Heat)));
//! ```

mod climate_state;
mod option_map;
mod state_change;

pub use climate_state::{
    ClimateState, derive_fan_mode, derive_hvac_mode, derive_preset_mode,
    derive_target_temperature,
};
pub use option_map::{OptionMap, keys};
pub use state_change::StateChange;
