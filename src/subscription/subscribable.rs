// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for climate entities.

use crate::state::{ClimateState, StateChange};
use crate::subscription::SubscriptionId;
use crate::types::{FanMode, HvacMode, PowerState, PresetMode};

/// Trait for types that publish climate state changes to callbacks.
///
/// Callbacks run synchronously on the task that applied the change, after
/// the device has released its state lock. They should return quickly.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use gree_climate::{ClimateConfig, ClimateDevice};
/// use gree_climate::protocol::{ChannelBridge, StatusPacket};
/// use gree_climate::subscription::Subscribable;
///
/// # fn main() -> gree_climate::Result<()> {
/// let (bridge, _rx) = ChannelBridge::new();
/// let device = ClimateDevice::new(ClimateConfig::new("f4911e000001"), Arc::new(bridge))?;
///
/// let sub_id = device.on_hvac_mode_changed(|mode| {
///     println!("hvac mode is now {mode}");
/// });
///
/// device.apply_status_packet(&StatusPacket::new(["Pow", "Mod"], vec![1, 1]));
///
/// device.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to power changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to hvac mode changes.
    fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static;

    /// Subscribes to fan mode changes.
    fn on_fan_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanMode) + Send + Sync + 'static;

    /// Subscribes to target temperature changes.
    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static;

    /// Subscribes to preset changes.
    fn on_preset_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PresetMode) + Send + Sync + 'static;

    /// Subscribes to room temperature updates.
    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static;

    /// Subscribes to availability changes.
    ///
    /// The callback fires once, when the first status packet arrives.
    fn on_available<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    ///
    /// The callback receives every change and the state it produced.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, &ClimateState) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
