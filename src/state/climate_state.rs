// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing climate state derived from the option map.

use crate::types::{
    DEFAULT_SET_TEMP, FanMode, HvacMode, PowerState, PresetMode, TargetTemperature,
};

use super::option_map::keys;
use super::{OptionMap, StateChange};

/// Host-facing state of the air conditioner.
///
/// Every device field is recomputed from the [`OptionMap`] after each merge;
/// none of them is written by command issuance. `current_temperature` comes
/// only from the external sensor, and `available` flips to `true` on the
/// first status packet and stays there.
///
/// # Examples
///
/// ```
/// use gree_climate::state::{ClimateState, OptionMap, keys};
/// use gree_climate::types::{FanMode, HvacMode};
///
/// let mut options = OptionMap::new();
/// options.merge([
///     (keys::POW.to_string(), 1),
///     (keys::MOD.to_string(), 1),
///     (keys::WD_SPD.to_string(), 5),
/// ]);
///
/// let mut state = ClimateState::new();
/// state.rederive(&options);
/// assert_eq!(state.hvac_mode(), HvacMode::Cool);
/// assert_eq!(state.fan_mode(), FanMode::High);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClimateState {
    power: PowerState,
    hvac_mode: HvacMode,
    fan_mode: FanMode,
    target_temperature: f64,
    preset_mode: PresetMode,
    current_temperature: Option<f64>,
    available: bool,
}

impl ClimateState {
    /// Creates the state of a device that has not reported yet.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new() -> Self {
        Self {
            power: PowerState::Off,
            hvac_mode: HvacMode::Off,
            fan_mode: FanMode::Auto,
            target_temperature: DEFAULT_SET_TEMP as f64,
            preset_mode: PresetMode::None,
            current_temperature: None,
            available: false,
        }
    }

    /// Power state of the unit.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Current hvac mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.hvac_mode
    }

    /// Current fan mode.
    #[must_use]
    pub fn fan_mode(&self) -> FanMode {
        self.fan_mode
    }

    /// Temperature the unit tries to reach.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Current preset mode.
    #[must_use]
    pub fn preset_mode(&self) -> PresetMode {
        self.preset_mode
    }

    /// Last sensor reading, in the configured unit.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.current_temperature
    }

    /// Whether a status packet has been received.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        macro_rules! update {
            ($field:ident, $value:expr) => {
                if self.$field == $value {
                    false
                } else {
                    self.$field = $value;
                    true
                }
            };
        }

        match change {
            StateChange::Power(power) => update!(power, *power),
            StateChange::HvacMode(mode) => update!(hvac_mode, *mode),
            StateChange::FanMode(mode) => update!(fan_mode, *mode),
            StateChange::TargetTemperature(t) => update!(target_temperature, *t),
            StateChange::PresetMode(preset) => update!(preset_mode, *preset),
            StateChange::CurrentTemperature(t) => update!(current_temperature, Some(*t)),
            StateChange::Available(available) => update!(available, *available),
        }
    }

    /// Recomputes every device-derived field from `options`.
    ///
    /// Returns the changes that actually moved the state, in derivation order.
    pub fn rederive(&mut self, options: &OptionMap) -> Vec<StateChange> {
        let mut candidates = vec![StateChange::Power(options.power())];

        if let Some(t) = derive_target_temperature(options) {
            candidates.push(StateChange::TargetTemperature(t));
        }
        candidates.push(StateChange::HvacMode(derive_hvac_mode(options)));
        if let Some(fan) = derive_fan_mode(options) {
            candidates.push(StateChange::FanMode(fan));
        }
        candidates.push(StateChange::PresetMode(derive_preset_mode(options)));

        let changes: Vec<StateChange> = candidates
            .into_iter()
            .filter(|change| self.apply(change))
            .collect();

        if !changes.is_empty() {
            tracing::info!(
                hvac_mode = %self.hvac_mode,
                fan_mode = %self.fan_mode,
                target_temperature = self.target_temperature,
                preset_mode = %self.preset_mode,
                "Host state updated from device options"
            );
        }
        changes
    }
}

impl Default for ClimateState {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the target temperature from `SetTem` and `Add0.1`.
///
/// Returns `None` while `SetTem` is unknown.
#[must_use]
pub fn derive_target_temperature(options: &OptionMap) -> Option<f64> {
    let whole = options.get(keys::SET_TEM)?;
    let tenths = options.get(keys::ADD_TENTH).unwrap_or(0);
    Some(TargetTemperature::from_options(whole, tenths).value())
}

/// Derives the hvac mode from `Pow` and `Mod`.
///
/// Returns [`HvacMode::Off`] exactly when the unit is powered off. A powered
/// unit whose `Mod` is unknown, out of range, or the off slot of the mode
/// table falls back to [`HvacMode::Auto`].
#[must_use]
pub fn derive_hvac_mode(options: &OptionMap) -> HvacMode {
    if !options.is_powered() {
        return HvacMode::Off;
    }

    match options.get(keys::MOD).map(|m| (m, HvacMode::from_index(m))) {
        Some((_, Some(mode))) if mode.is_running() => mode,
        Some((raw, _)) => {
            tracing::warn!(mode = raw, "Powered unit reports no running mode, assuming auto");
            HvacMode::Auto
        }
        None => HvacMode::Auto,
    }
}

/// Derives the fan mode from `WdSpd`.
///
/// Returns `None` when the index is unknown or out of range, in which case
/// the previous fan mode is kept.
#[must_use]
pub fn derive_fan_mode(options: &OptionMap) -> Option<FanMode> {
    let raw = options.get(keys::WD_SPD)?;
    let mode = FanMode::from_index(raw);
    if mode.is_none() {
        tracing::warn!(wd_spd = raw, "Fan speed index out of range, keeping previous fan mode");
    }
    mode
}

/// Derives the preset from `SwhSlp`.
#[must_use]
pub fn derive_preset_mode(options: &OptionMap) -> PresetMode {
    options
        .get(keys::SWH_SLP)
        .map_or(PresetMode::None, PresetMode::from_sleep_flag)
}
