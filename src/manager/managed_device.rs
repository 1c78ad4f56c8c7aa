// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry entry for a device owned by the manager.

use crate::device::ClimateDevice;
use crate::event::{DeviceEvent, EventBus};
use crate::state::StateChange;
use crate::subscription::{Subscribable, SubscriptionId};

/// A device plus the subscription that forwards its changes to the bus.
#[derive(Debug)]
pub(crate) struct ManagedDevice {
    pub device: ClimateDevice,
    forwarder: SubscriptionId,
}

impl ManagedDevice {
    /// Wraps `device` and starts forwarding its changes to `event_bus`.
    pub fn new(device: ClimateDevice, event_bus: &EventBus) -> Self {
        let bus = event_bus.clone();
        let device_id = device.id().clone();

        let forwarder = device.on_state_changed(move |change, state| {
            let event = match change {
                StateChange::Available(available) => DeviceEvent::AvailabilityChanged {
                    device_id: device_id.clone(),
                    available: *available,
                },
                other => DeviceEvent::state_changed(device_id.clone(), other.clone(), state.clone()),
            };
            bus.publish(event);
        });

        Self { device, forwarder }
    }

    /// Stops forwarding and hands the device back.
    pub fn detach(self) -> ClimateDevice {
        self.device.unsubscribe(self.forwarder);
        self.device
    }
}
