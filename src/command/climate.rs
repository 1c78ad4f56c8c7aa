// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate control commands.

use crate::command::{Command, Guard, OptionChanges};
use crate::state::keys;
use crate::types::{FanMode, HvacMode, PowerState, PresetMode, TargetTemperature};

/// Command to switch the unit on or off.
///
/// # Examples
///
/// ```
/// use gree_climate::command::{Command, PowerCommand};
///
/// let on = PowerCommand::On.options();
/// assert_eq!(on.get("Pow"), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Switch on.
    On,
    /// Switch off.
    Off,
}

impl From<PowerState> for PowerCommand {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
        }
    }
}

impl Command for PowerCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::On => "turn_on",
            Self::Off => "turn_off",
        }
    }

    fn options(&self) -> OptionChanges {
        let state = match self {
            Self::On => PowerState::On,
            Self::Off => PowerState::Off,
        };
        OptionChanges::new().with(keys::POW, state.as_option())
    }
}

/// Command to change the hvac mode.
///
/// Selecting [`HvacMode::Off`] powers the unit down; any other mode selects
/// the mode and forces power on.
///
/// # Examples
///
/// ```
/// use gree_climate::command::{Command, HvacModeCommand};
/// use gree_climate::types::HvacMode;
///
/// let cool = HvacModeCommand(HvacMode::Cool).options();
/// assert_eq!(cool.keys().collect::<Vec<_>>(), ["Mod", "Pow"]);
///
/// let off = HvacModeCommand(HvacMode::Off).options();
/// assert_eq!(off.keys().collect::<Vec<_>>(), ["Pow"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HvacModeCommand(pub HvacMode);

impl Command for HvacModeCommand {
    fn name(&self) -> &'static str {
        "set_hvac_mode"
    }

    fn options(&self) -> OptionChanges {
        match self.0 {
            HvacMode::Off => OptionChanges::new().with(keys::POW, PowerState::Off.as_option()),
            mode => OptionChanges::new()
                .with(keys::MOD, mode.index())
                .with(keys::POW, PowerState::On.as_option()),
        }
    }
}

/// Command to change the fan speed. Requires the unit to be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanModeCommand(pub FanMode);

impl Command for FanModeCommand {
    fn name(&self) -> &'static str {
        "set_fan_mode"
    }

    fn guard(&self) -> Guard {
        Guard::RequiresPower
    }

    fn options(&self) -> OptionChanges {
        OptionChanges::new().with(keys::WD_SPD, self.0.index())
    }
}

/// Command to change the set point. Requires the unit to be on.
///
/// # Examples
///
/// ```
/// use gree_climate::command::{Command, TargetTemperatureCommand};
///
/// let cmd = TargetTemperatureCommand("24.5".parse().unwrap());
/// let options = cmd.options();
/// assert_eq!(options.get("SetTem"), Some(24));
/// assert_eq!(options.get("Add0.1"), Some(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTemperatureCommand(pub TargetTemperature);

impl Command for TargetTemperatureCommand {
    fn name(&self) -> &'static str {
        "set_temperature"
    }

    fn guard(&self) -> Guard {
        Guard::RequiresPower
    }

    fn options(&self) -> OptionChanges {
        OptionChanges::new()
            .with(keys::SET_TEM, self.0.whole())
            .with(keys::ADD_TENTH, self.0.tenths())
    }
}

/// Command to change the preset. Requires the unit to be on.
///
/// Sleep also enables quiet mode; leaving sleep disables both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetCommand(pub PresetMode);

impl Command for PresetCommand {
    fn name(&self) -> &'static str {
        "set_preset_mode"
    }

    fn guard(&self) -> Guard {
        Guard::RequiresPower
    }

    fn options(&self) -> OptionChanges {
        let flag = i64::from(self.0 == PresetMode::Sleep);
        OptionChanges::new()
            .with(keys::SWH_SLP, flag)
            .with(keys::QUIET, flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OptionMap;

    fn powered() -> OptionMap {
        let mut options = OptionMap::new();
        options.merge([(keys::POW.to_string(), 1)]);
        options
    }

    #[test]
    fn power_commands() {
        assert_eq!(PowerCommand::On.options().get(keys::POW), Some(1));
        assert_eq!(PowerCommand::Off.options().get(keys::POW), Some(0));
        assert_eq!(PowerCommand::On.guard(), Guard::None);
        assert_eq!(PowerCommand::from(PowerState::Off), PowerCommand::Off);
    }

    #[test]
    fn hvac_mode_forces_power_on() {
        let options = HvacModeCommand(HvacMode::Heat).options();
        assert_eq!(options.iter().collect::<Vec<_>>(), [("Mod", 4), ("Pow", 1)]);
    }

    #[test]
    fn hvac_mode_off_only_powers_down() {
        let options = HvacModeCommand(HvacMode::Off).options();
        assert_eq!(options.iter().collect::<Vec<_>>(), [("Pow", 0)]);
        assert!(HvacModeCommand(HvacMode::Off).guard().check(&OptionMap::new()).is_ok());
    }

    #[test]
    fn fan_mode_requires_power() {
        let cmd = FanModeCommand(FanMode::High);
        assert_eq!(cmd.options().get(keys::WD_SPD), Some(5));
        assert!(cmd.guard().check(&OptionMap::new()).is_err());
        assert!(cmd.guard().check(&powered()).is_ok());
    }

    #[test]
    fn preset_sleep_sets_quiet() {
        let sleep = PresetCommand(PresetMode::Sleep).options();
        assert_eq!(sleep.iter().collect::<Vec<_>>(), [("SwhSlp", 1), ("Quiet", 1)]);

        let none = PresetCommand(PresetMode::None).options();
        assert_eq!(none.iter().collect::<Vec<_>>(), [("SwhSlp", 0), ("Quiet", 0)]);
    }

    #[test]
    fn temperature_keeps_literal_digit() {
        let cmd = TargetTemperatureCommand(TargetTemperature::from_options(23, 7));
        assert_eq!(
            cmd.options().iter().collect::<Vec<_>>(),
            [("SetTem", 23), ("Add0.1", 7)]
        );
    }
}
