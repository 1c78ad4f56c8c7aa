// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager for coordinating multiple air conditioners.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::ClimateConfig;
use crate::device::ClimateDevice;
use crate::error::{DeviceError, Error};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::protocol::{Bridge, InboundPacket};

use super::managed_device::ManagedDevice;

/// Manager for the air conditioners behind one bridge.
///
/// Devices share the manager's bridge. Every host-visible change of a
/// managed device is also published on the manager's event bus.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use gree_climate::ClimateConfig;
/// use gree_climate::manager::DeviceManager;
/// use gree_climate::protocol::ChannelBridge;
///
/// #[tokio::main]
/// async fn main() -> gree_climate::Result<()> {
///     let (bridge, mut outbound) = ChannelBridge::new();
///     let manager = Arc::new(DeviceManager::new(Arc::new(bridge)));
///     manager.add_device(ClimateConfig::new("f4911e000001").with_name("Bedroom"))?;
///
///     // The transport forwards outbound messages to the unit...
///     tokio::spawn(async move {
///         while let Some(message) = outbound.recv().await {
///             println!("-> {}", message.to_json().unwrap_or_default());
///         }
///     });
///
///     // ...and feeds raw inbound packets back.
///     let (inbound_tx, inbound_rx) = tokio::sync::mpsc::channel(64);
///     let packet_loop = manager.spawn_packet_loop(inbound_rx);
///     inbound_tx
///         .send(r#"{"t":"status","mac":"f4911e000001","cols":["Pow"],"dat":[1]}"#.to_string())
///         .await
///         .ok();
///
///     drop(inbound_tx);
///     packet_loop.await.ok();
///     Ok(())
/// }
/// ```
pub struct DeviceManager {
    bridge: Arc<dyn Bridge>,
    devices: RwLock<HashMap<DeviceId, ManagedDevice>>,
    event_bus: EventBus,
}

impl DeviceManager {
    /// Creates a manager whose devices send through `bridge`.
    #[must_use]
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self::with_event_bus(bridge, EventBus::new())
    }

    /// Creates a manager with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(bridge: Arc<dyn Bridge>, event_capacity: usize) -> Self {
        Self::with_event_bus(bridge, EventBus::with_capacity(event_capacity))
    }

    fn with_event_bus(bridge: Arc<dyn Bridge>, event_bus: EventBus) -> Self {
        Self {
            bridge,
            devices: RwLock::new(HashMap::new()),
            event_bus,
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to events for all managed devices.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    // =========================================================================
    // Device management
    // =========================================================================

    /// Registers a device and asks it for its first status.
    ///
    /// A failed status request is logged; the device stays registered and
    /// becomes available once a status packet arrives.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` for an invalid config and
    /// `DeviceError::DuplicateDevice` if the MAC is already registered.
    pub fn add_device(&self, config: ClimateConfig) -> Result<ClimateDevice, Error> {
        let device = ClimateDevice::new(config, Arc::clone(&self.bridge))?;
        let device_id = device.id().clone();

        {
            let mut devices = self.devices.write();
            if devices.contains_key(&device_id) {
                return Err(DeviceError::DuplicateDevice(device_id.to_string()).into());
            }
            devices.insert(
                device_id.clone(),
                ManagedDevice::new(device.clone(), &self.event_bus),
            );
        }

        tracing::info!(%device_id, name = %device.name(), "Device added");
        self.event_bus
            .publish(DeviceEvent::device_added(device_id.clone()));

        if let Err(e) = device.request_status() {
            tracing::warn!(%device_id, error = %e, "Failed to request initial status");
        }
        Ok(device)
    }

    /// Unregisters a device.
    ///
    /// The returned handle keeps working but no longer receives packets or
    /// publishes events.
    pub fn remove_device(&self, mac: &str) -> Option<ClimateDevice> {
        let device_id = DeviceId::new(mac);
        let managed = self.devices.write().remove(&device_id)?;
        let device = managed.detach();

        tracing::info!(%device_id, "Device removed");
        self.event_bus.publish(DeviceEvent::device_removed(device_id));
        Some(device)
    }

    /// Looks up a device by MAC in any notation.
    #[must_use]
    pub fn device(&self, mac: &str) -> Option<ClimateDevice> {
        self.devices
            .read()
            .get(&DeviceId::new(mac))
            .map(|m| m.device.clone())
    }

    /// Returns handles to all managed devices.
    #[must_use]
    pub fn devices(&self) -> Vec<ClimateDevice> {
        self.devices
            .read()
            .values()
            .map(|m| m.device.clone())
            .collect()
    }

    /// Returns the identifiers of all managed devices.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().keys().cloned().collect()
    }

    /// Returns the number of managed devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if no devices are managed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Asks every device for a fresh status. Returns how many requests were
    /// handed to the bridge.
    pub fn request_status_all(&self) -> usize {
        self.devices()
            .iter()
            .filter(|device| match device.request_status() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(device_id = %device.id(), error = %e, "Status request failed");
                    false
                }
            })
            .count()
    }

    // =========================================================================
    // Inbound packets
    // =========================================================================

    /// Delivers a packet to the device it belongs to.
    ///
    /// A packet without a MAC is delivered to the only managed device, if
    /// there is exactly one.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::UnknownDevice` if no device matches.
    pub fn route(&self, packet: &InboundPacket) -> Result<(), DeviceError> {
        let device = {
            let devices = self.devices.read();
            match packet.mac() {
                Some(mac) => devices.get(&DeviceId::new(mac)).map(|m| m.device.clone()),
                None if devices.len() == 1 => devices.values().next().map(|m| m.device.clone()),
                None => None,
            }
        };

        let device = device.ok_or_else(|| {
            DeviceError::UnknownDevice(packet.mac().unwrap_or("<none>").to_string())
        })?;
        device.apply_packet(packet);
        Ok(())
    }

    /// Parses and routes a raw JSON packet.
    ///
    /// Returns `true` if the packet was applied. Malformed packets, `null`
    /// and packets for unknown devices are logged and dropped.
    pub fn handle_json(&self, json: &str) -> bool {
        let packet = match InboundPacket::from_json(json) {
            Ok(Some(packet)) => packet,
            Ok(None) => {
                tracing::debug!("Ignoring null packet");
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, payload = %json, "Dropping malformed packet");
                return false;
            }
        };

        match self.route(&packet) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping packet");
                false
            }
        }
    }

    /// Spawns a task that feeds raw JSON packets from the transport to
    /// [`handle_json`](Self::handle_json).
    ///
    /// The task ends when all senders are dropped.
    pub fn spawn_packet_loop(self: &Arc<Self>, mut packets: mpsc::Receiver<String>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            tracing::debug!("Packet loop started");
            while let Some(payload) = packets.recv().await {
                tracing::trace!(payload = %payload, "Processing packet");
                manager.handle_json(&payload);
            }
            tracing::debug!("Packet loop stopped");
        })
    }
}

impl std::fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceManager")
            .field("devices", &self.device_ids())
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}
