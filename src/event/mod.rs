// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manager-level device events.
//!
//! A [`DeviceManager`](crate::manager::DeviceManager) publishes a
//! [`DeviceEvent`] on its [`EventBus`] whenever a device is added or
//! removed, becomes available, or changes a host-visible attribute.
//!
//! # Examples
//!
//! ```
//! use gree_climate::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::device_added(DeviceId::new("f4911e000001")));
//! assert!(rx.try_recv().unwrap().is_lifecycle());
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
