// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for air-conditioner control.
//!
//! The device encodes modes as positional indices into fixed lists. Each
//! type here carries an explicit index-to-variant table so that raw option
//! values are validated when they are decoded instead of being used as
//! unchecked list indices.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off (`Pow`)
//! - [`HvacMode`] - Operating mode (`Mod`)
//! - [`FanMode`] - Fan speed (`WdSpd`)
//! - [`PresetMode`] - Sleep preset (`SwhSlp`)
//! - [`TargetTemperature`] - Set point (`SetTem` + `Add0.1`)
//! - [`TemperatureUnit`] - Celsius/Fahrenheit with conversion

mod fan_mode;
mod hvac_mode;
mod power;
mod preset;
mod temperature;

pub use fan_mode::{FAN_MODES, FanMode};
pub use hvac_mode::{HVAC_MODES, HvacMode};
pub use power::PowerState;
pub use preset::{PRESET_MODES, PresetMode};
pub use temperature::{
    DEFAULT_SET_TEMP, MAX_TEMP, MIN_TEMP, TargetTemperature, TemperatureUnit,
};
