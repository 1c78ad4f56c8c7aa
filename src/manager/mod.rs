// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager for coordinating several air conditioners on one bridge.
//!
//! The [`DeviceManager`] owns every registered [`ClimateDevice`] and routes
//! inbound packets to them by MAC address. It is also the error boundary
//! for the transport: malformed packets are logged and dropped, never
//! propagated.
//!
//! # Examples
//!
//! ## Routing packets
//!
//! ```
//! use std::sync::Arc;
//! use gree_climate::ClimateConfig;
//! use gree_climate::manager::DeviceManager;
//! use gree_climate::protocol::ChannelBridge;
//! use gree_climate::types::HvacMode;
//!
//! # fn main() -> gree_climate::Result<()> {
//! let (bridge, _outbound) = ChannelBridge::new();
//! let manager = DeviceManager::new(Arc::new(bridge));
//!
//! let device = manager.add_device(ClimateConfig::new("f4911e000001"))?;
//!
//! manager.handle_json(r#"{"t":"status","mac":"f4911e000001","cols":["Pow","Mod"],"dat":[1,4]}"#);
//! assert_eq!(device.hvac_mode(), HvacMode::Heat);
//!
//! // Garbage is logged and ignored.
//! assert!(!manager.handle_json("{not json"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Event Subscription
//!
//! ```no_run
//! use std::sync::Arc;
//! use gree_climate::event::DeviceEvent;
//! use gree_climate::manager::DeviceManager;
//! use gree_climate::protocol::ChannelBridge;
//!
//! # fn example() {
//! let (bridge, _outbound) = ChannelBridge::new();
//! let manager = DeviceManager::new(Arc::new(bridge));
//! let mut events = manager.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             DeviceEvent::StateChanged { device_id, change, .. } => {
//!                 println!("{device_id}: {change:?}");
//!             }
//!             DeviceEvent::AvailabilityChanged { device_id, available } => {
//!                 println!("{device_id} available: {available}");
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! [`ClimateDevice`]: crate::ClimateDevice

mod device_manager;
mod managed_device;

pub use device_manager::DeviceManager;
