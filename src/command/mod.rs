// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air-conditioner command definitions.
//!
//! Each host setter maps to a typed command that knows which options it
//! changes and which precondition (a [`Guard`]) must hold before it may be
//! sent. Commands are encoded into a [`CommandMessage`] for the bridge.
//!
//! # Available Commands
//!
//! | Command Type | Options sent | Guard |
//! |-------------|---------|---------|
//! | [`PowerCommand`] | `Pow` | none |
//! | [`HvacModeCommand`] | `Pow` (off) or `Mod`, `Pow` | none |
//! | [`FanModeCommand`] | `WdSpd` | unit on |
//! | [`TargetTemperatureCommand`] | `SetTem`, `Add0.1` | unit on |
//! | [`PresetCommand`] | `SwhSlp`, `Quiet` | unit on |
//!
//! # Examples
//!
//! ```
//! use gree_climate::command::{Command, CommandMessage, PresetCommand};
//! use gree_climate::types::PresetMode;
//!
//! let cmd = PresetCommand(PresetMode::Sleep);
//! let msg = CommandMessage::encode(&cmd.options(), "f4911e000001");
//! assert_eq!(msg.options(), ["SwhSlp", "Quiet"]);
//! assert_eq!(msg.values(), [1, 1]);
//! ```

mod climate;
mod message;

pub use climate::{
    FanModeCommand, HvacModeCommand, PowerCommand, PresetCommand, TargetTemperatureCommand,
};
pub use message::{
    CommandMessage, OptionChanges, OutboundMessage, STATUS_COLUMNS, StatusRequest,
};

use crate::error::ValueError;
use crate::state::OptionMap;

/// A command that can be sent to the air conditioner.
pub trait Command {
    /// Returns the host-facing name of the operation, for logging.
    fn name(&self) -> &'static str;

    /// Returns the options this command requests, in wire order.
    fn options(&self) -> OptionChanges;

    /// Returns the precondition for sending this command.
    fn guard(&self) -> Guard {
        Guard::None
    }

    /// Encodes the command for the device identified by `mac`.
    fn encode(&self, mac: &str) -> CommandMessage {
        CommandMessage::encode(&self.options(), mac)
    }
}

/// Precondition checked against the option map before a command is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Always allowed.
    None,
    /// Only allowed while `Pow != 0`.
    RequiresPower,
}

impl Guard {
    /// Checks the guard against the current options.
    ///
    /// # Errors
    ///
    /// Returns the reason the command must not be sent.
    pub fn check(&self, options: &OptionMap) -> Result<(), SkipReason> {
        match self {
            Self::None => Ok(()),
            Self::RequiresPower if options.is_powered() => Ok(()),
            Self::RequiresPower => Err(SkipReason::PoweredOff),
        }
    }
}

/// Outcome of a host setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The command was handed to the bridge.
    Sent,
    /// The command was dropped before encoding.
    Skipped(SkipReason),
}

impl Dispatch {
    /// Returns `true` if the command was handed to the bridge.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Why a host setter did not send anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The unit is powered off and the command needs it on.
    PoweredOff,
    /// No temperature was supplied.
    MissingTemperature,
    /// The supplied temperature cannot be encoded.
    InvalidTemperature(ValueError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PoweredOff => f.write_str("unit is powered off"),
            Self::MissingTemperature => f.write_str("no temperature supplied"),
            Self::InvalidTemperature(e) => write!(f, "{e}"),
        }
    }
}
