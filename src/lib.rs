// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `gree_climate` - Keeps a home-automation climate entity in sync with a
//! Gree air conditioner.
//!
//! The air conditioner reports its settings as a flat map of named integer
//! options (`Pow`, `Mod`, `SetTem`, `WdSpd`, ...). This library merges the
//! packets the unit sends into that map, derives the host-facing climate
//! state from it, and turns host requests into option-change commands.
//!
//! # Supported Features
//!
//! - **State sync**: Status snapshots and command responses are merged and
//!   the hvac mode, fan mode, target temperature and preset are recomputed
//! - **Commands**: Power, hvac mode, fan speed, target temperature (including
//!   the unit's tenth-of-a-degree option) and sleep preset
//! - **External sensor**: Room temperature fed from a separate sensor entity,
//!   with unit conversion
//! - **Notifications**: Per-attribute callbacks, `watch` channels and a
//!   manager-wide event bus
//!
//! The network transport is not part of this crate. Anything implementing
//! [`protocol::Bridge`] can carry outbound messages;
//! [`protocol::ChannelBridge`] hands them to a tokio channel.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use gree_climate::{ClimateConfig, ClimateDevice};
//! use gree_climate::protocol::{ChannelBridge, ResponsePacket, StatusPacket};
//! use gree_climate::types::HvacMode;
//!
//! # fn main() -> gree_climate::Result<()> {
//! let (bridge, mut outbound) = ChannelBridge::new();
//! let device = ClimateDevice::new(
//!     ClimateConfig::new("f4911e000001").with_name("Living Room"),
//!     Arc::new(bridge),
//! )?;
//!
//! device.request_status()?;
//! device.apply_status_packet(&StatusPacket::new(["Pow", "Mod", "SetTem"], vec![0, 1, 24]));
//! assert_eq!(device.hvac_mode(), HvacMode::Off);
//!
//! // Host asks for heating; the command goes out, the state waits for the unit.
//! device.set_hvac_mode(HvacMode::Heat)?;
//! assert_eq!(device.hvac_mode(), HvacMode::Off);
//!
//! device.apply_response_packet(&ResponsePacket::new(["Mod", "Pow"], vec![4, 1]));
//! assert_eq!(device.hvac_mode(), HvacMode::Heat);
//! # let _ = outbound.try_recv();
//! # Ok(())
//! # }
//! ```
//!
//! ## Callbacks
//!
//! ```
//! use std::sync::Arc;
//! use gree_climate::{ClimateConfig, ClimateDevice, Subscribable};
//! use gree_climate::protocol::ChannelBridge;
//!
//! # fn main() -> gree_climate::Result<()> {
//! let (bridge, _outbound) = ChannelBridge::new();
//! let device = ClimateDevice::new(ClimateConfig::new("f4911e000001"), Arc::new(bridge))?;
//!
//! device.on_target_temperature_changed(|t| println!("target is now {t}"));
//! device.on_available(|_| println!("unit reported"));
//! # Ok(())
//! # }
//! ```

mod config;
mod device;
pub mod command;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod sensor;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, Dispatch, SkipReason};
pub use config::ClimateConfig;
pub use device::{ClimateDevice, ClimateFeature, SUPPORTED_FEATURES};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use manager::DeviceManager;
pub use state::{ClimateState, OptionMap, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{FanMode, HvacMode, PowerState, PresetMode, TemperatureUnit};
