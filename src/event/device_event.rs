// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use serde::Serialize;

use crate::state::{ClimateState, StateChange};

use super::DeviceId;

/// Events emitted by the device manager.
///
/// # Examples
///
/// ```
/// use gree_climate::event::{DeviceEvent, DeviceId};
///
/// let event = DeviceEvent::device_added(DeviceId::new("f4911e000001"));
/// assert!(event.is_lifecycle());
/// assert_eq!(event.device_id().as_str(), "f4911e000001");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A device was added to the manager.
    DeviceAdded {
        /// The ID of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the manager.
    DeviceRemoved {
        /// The ID of the removed device.
        device_id: DeviceId,
    },

    /// The device reported its first status and became available.
    AvailabilityChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// New availability.
        available: bool,
    },

    /// A host-visible attribute changed.
    StateChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The specific change that occurred.
        change: StateChange,
        /// The state after the change.
        new_state: ClimateState,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::AvailabilityChanged { device_id, .. }
            | Self::StateChanged { device_id, .. } => device_id,
        }
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(device_id: DeviceId, change: StateChange, new_state: ClimateState) -> Self {
        Self::StateChanged {
            device_id,
            change,
            new_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HvacMode;

    #[test]
    fn device_id_accessor() {
        let id = DeviceId::new("ac01");
        let event = DeviceEvent::AvailabilityChanged {
            device_id: id.clone(),
            available: true,
        };
        assert_eq!(event.device_id(), &id);
        assert!(!event.is_lifecycle());
        assert!(!event.is_state_change());
    }

    #[test]
    fn state_changed_serializes_with_tag() {
        let event = DeviceEvent::state_changed(
            DeviceId::new("ac01"),
            StateChange::HvacMode(HvacMode::Cool),
            ClimateState::new(),
        );
        assert!(event.is_state_change());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "state_changed");
        assert_eq!(json["device_id"], "ac01");
        assert_eq!(json["new_state"]["available"], false);
    }
}
