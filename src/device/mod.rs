// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing climate entity for one Gree air conditioner.
//!
//! A [`ClimateDevice`] owns the device's [`OptionMap`] and the
//! [`ClimateState`] derived from it. Inbound packets are merged into the
//! option map and the state is recomputed; host setters are turned into
//! command messages and handed to the [`Bridge`] without waiting for an
//! answer. The device confirms the change later with a response packet,
//! which is merged like any other.
//!
//! ```
//! use std::sync::Arc;
//! use gree_climate::{ClimateConfig, ClimateDevice};
//! use gree_climate::protocol::{ChannelBridge, StatusPacket};
//! use gree_climate::types::{FanMode, HvacMode};
//!
//! # fn main() -> gree_climate::Result<()> {
//! let (bridge, mut outbound) = ChannelBridge::new();
//! let device = ClimateDevice::new(ClimateConfig::new("f4911e000001"), Arc::new(bridge))?;
//!
//! device.apply_status_packet(&StatusPacket::new(["Pow", "Mod", "WdSpd"], vec![1, 1, 3]));
//! assert!(device.is_available());
//! assert_eq!(device.hvac_mode(), HvacMode::Cool);
//! assert_eq!(device.fan_mode(), FanMode::Medium);
//!
//! assert!(device.set_fan_mode(FanMode::High)?.is_sent());
//! let msg = outbound.try_recv().unwrap();
//! assert_eq!(msg.as_command().unwrap().options(), ["WdSpd"]);
//! # Ok(())
//! # }
//! ```

mod features;

pub use features::{ClimateFeature, SUPPORTED_FEATURES};

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::command::{
    Command, CommandMessage, Dispatch, FanModeCommand, HvacModeCommand, OptionChanges, PowerCommand,
    PresetCommand, SkipReason, StatusRequest, TargetTemperatureCommand,
};
use crate::config::ClimateConfig;
use crate::error::{Error, ValueError};
use crate::event::DeviceId;
use crate::protocol::{Bridge, DecodedOptions, InboundPacket, ResponsePacket, StatusPacket};
use crate::sensor::SensorReading;
use crate::state::{ClimateState, OptionMap, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{
    FAN_MODES, FanMode, HVAC_MODES, HvacMode, MAX_TEMP, MIN_TEMP, PRESET_MODES, PowerState,
    PresetMode, TargetTemperature, TemperatureUnit,
};

/// Which kind of packet is being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PacketSource {
    Status,
    Response,
}

/// State guarded by the device lock.
#[derive(Debug)]
struct Model {
    options: OptionMap,
    state: ClimateState,
}

struct Inner {
    id: DeviceId,
    config: ClimateConfig,
    bridge: Arc<dyn Bridge>,
    /// Held from commit through notification so subscribers see changes in
    /// commit order. Taken before `model`. Reentrant so a callback may feed
    /// the same device again.
    delivery: ReentrantMutex<()>,
    model: Mutex<Model>,
    state_tx: watch::Sender<ClimateState>,
    callbacks: CallbackRegistry,
    span: tracing::Span,
}

/// A Gree air conditioner exposed as a host climate entity.
///
/// Cloning is cheap; clones share the same state, bridge and callbacks.
///
/// All merges and guard checks for one device are serialized by a single
/// lock. Callbacks run after that lock is released but before the next merge
/// or sensor update of the same device commits, so they observe changes in
/// the order they were applied.
#[derive(Clone)]
pub struct ClimateDevice {
    inner: Arc<Inner>,
}

impl ClimateDevice {
    /// Creates a device in its initial, unavailable state.
    ///
    /// Nothing is sent to the bridge; call
    /// [`request_status`](Self::request_status) to ask for the first
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if `config` is invalid.
    pub fn new(config: ClimateConfig, bridge: Arc<dyn Bridge>) -> Result<Self, Error> {
        config.validate()?;

        let id = DeviceId::new(&config.mac);
        let span = tracing::info_span!("climate", mac = %id);
        let state = ClimateState::new();
        let (state_tx, _) = watch::channel(state.clone());

        span.in_scope(|| tracing::debug!(name = %config.name, "Climate device created"));

        Ok(Self {
            inner: Arc::new(Inner {
                id,
                config,
                bridge,
                delivery: ReentrantMutex::new(()),
                model: Mutex::new(Model {
                    options: OptionMap::new(),
                    state,
                }),
                state_tx,
                callbacks: CallbackRegistry::new(),
                span,
            }),
        })
    }

    // =========================================================================
    // Identity and host metadata
    // =========================================================================

    /// Returns the normalized device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.inner.id
    }

    /// Returns the MAC as configured, used to address the unit on the bridge.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.inner.config.mac
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &ClimateConfig {
        &self.inner.config
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Returns the stable identifier for the host entity registry.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.inner.config.unique_id()
    }

    /// Lowest settable target temperature.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn min_temp(&self) -> f64 {
        MIN_TEMP as f64
    }

    /// Highest settable target temperature.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_temp(&self) -> f64 {
        MAX_TEMP as f64
    }

    /// Step offered to the host for target temperature changes.
    #[must_use]
    pub fn target_temperature_step(&self) -> f64 {
        self.inner.config.target_temperature_step
    }

    /// Unit the host displays temperatures in.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.inner.config.temperature_unit
    }

    /// Hvac modes offered to the host.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HVAC_MODES
    }

    /// Fan modes offered to the host.
    #[must_use]
    pub fn fan_modes(&self) -> &'static [FanMode] {
        &FAN_MODES
    }

    /// Presets offered to the host.
    #[must_use]
    pub fn preset_modes(&self) -> &'static [PresetMode] {
        &PRESET_MODES
    }

    /// Capabilities advertised to the host.
    #[must_use]
    pub fn supported_features(&self) -> &'static [ClimateFeature] {
        &SUPPORTED_FEATURES
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    /// Returns a snapshot of the host-facing state.
    #[must_use]
    pub fn state(&self) -> ClimateState {
        self.inner.model.lock().state.clone()
    }

    /// Returns a snapshot of the option map.
    #[must_use]
    pub fn options(&self) -> OptionMap {
        self.inner.model.lock().options.clone()
    }

    /// Returns a receiver that observes every state change.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ClimateState> {
        self.inner.state_tx.subscribe()
    }

    /// Whether a status packet has been received.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.model.lock().state.available()
    }

    /// The host hides the entity until the unit has reported.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        !self.is_available()
    }

    /// Current power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.inner.model.lock().state.power()
    }

    /// Current hvac mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.inner.model.lock().state.hvac_mode()
    }

    /// Current fan mode.
    #[must_use]
    pub fn fan_mode(&self) -> FanMode {
        self.inner.model.lock().state.fan_mode()
    }

    /// Current target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.inner.model.lock().state.target_temperature()
    }

    /// Current preset.
    #[must_use]
    pub fn preset_mode(&self) -> PresetMode {
        self.inner.model.lock().state.preset_mode()
    }

    /// Last room temperature reported by the external sensor.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.inner.model.lock().state.current_temperature()
    }

    // =========================================================================
    // Inbound packets
    // =========================================================================

    /// Merges a status snapshot and marks the device available.
    pub fn apply_status_packet(&self, packet: &StatusPacket) {
        self.merge(packet.decode(), PacketSource::Status);
    }

    /// Merges a command acknowledgement.
    ///
    /// Responses do not change availability.
    pub fn apply_response_packet(&self, packet: &ResponsePacket) {
        self.merge(packet.decode(), PacketSource::Response);
    }

    /// Merges a packet of either kind.
    pub fn apply_packet(&self, packet: &InboundPacket) {
        match packet {
            InboundPacket::Status(p) => self.apply_status_packet(p),
            InboundPacket::Response(p) => self.apply_response_packet(p),
        }
    }

    fn merge(&self, decoded: DecodedOptions, source: PacketSource) {
        let _span = self.inner.span.enter();
        let _delivery = self.inner.delivery.lock();

        let (changes, snapshot) = {
            let mut guard = self.inner.model.lock();
            let model = &mut *guard;

            let changed_options = model.options.merge(decoded.pairs);
            let mut changes = Vec::new();
            if source == PacketSource::Status
                && model.state.apply(&StateChange::Available(true))
            {
                tracing::info!("Device available");
                changes.push(StateChange::Available(true));
            }
            changes.extend(model.state.rederive(&model.options));

            tracing::debug!(
                ?source,
                changed_options,
                skipped = decoded.skipped,
                options = %model.options,
                "Merged packet"
            );

            let snapshot = model.state.clone();
            if !changes.is_empty() {
                self.inner.state_tx.send_replace(snapshot.clone());
            }
            (changes, snapshot)
        };

        self.notify(&changes, &snapshot);
    }

    fn notify(&self, changes: &[StateChange], snapshot: &ClimateState) {
        for change in changes {
            self.inner.callbacks.dispatch(change, snapshot);
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Checks the command's guard and hands it to the bridge.
    ///
    /// Returns `Dispatch::Skipped` if the guard rejects the command; nothing
    /// is sent in that case. The guard check and the hand-off happen under
    /// the device lock, so a packet merged concurrently cannot slip between
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn send<C: Command>(&self, command: &C) -> Result<Dispatch, Error> {
        let _span = self.inner.span.enter();

        let model = self.inner.model.lock();
        if let Err(reason) = command.guard().check(&model.options) {
            tracing::debug!(command = command.name(), %reason, "Command skipped");
            return Ok(Dispatch::Skipped(reason));
        }

        let message = command.encode(self.mac());
        tracing::info!(
            command = command.name(),
            options = ?message.options(),
            values = ?message.values(),
            "Sending command"
        );
        self.inner.bridge.sync_status(message.into())?;
        drop(model);
        Ok(Dispatch::Sent)
    }

    /// Sends arbitrary option changes without any guard.
    ///
    /// An empty change set sends nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn request_change(&self, changes: &OptionChanges) -> Result<(), Error> {
        let _span = self.inner.span.enter();

        if changes.is_empty() {
            tracing::debug!("Empty option change ignored");
            return Ok(());
        }
        let message = CommandMessage::encode(changes, self.mac());
        tracing::info!(options = ?message.options(), values = ?message.values(), "Requesting change");
        self.inner.bridge.sync_status(message.into())?;
        Ok(())
    }

    /// Asks the unit for a full status snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn request_status(&self) -> Result<(), Error> {
        let _span = self.inner.span.enter();
        tracing::debug!("Requesting status");
        self.inner
            .bridge
            .sync_status(StatusRequest::new(self.mac()).into())?;
        Ok(())
    }

    /// Turns the unit on.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn turn_on(&self) -> Result<Dispatch, Error> {
        self.send(&PowerCommand::On)
    }

    /// Turns the unit off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn turn_off(&self) -> Result<Dispatch, Error> {
        self.send(&PowerCommand::Off)
    }

    /// Sets the hvac mode. [`HvacMode::Off`] powers the unit down; any other
    /// mode selects it and powers the unit up.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn set_hvac_mode(&self, mode: HvacMode) -> Result<Dispatch, Error> {
        self.send(&HvacModeCommand(mode))
    }

    /// Sets the fan speed. Skipped while the unit is off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn set_fan_mode(&self, mode: FanMode) -> Result<Dispatch, Error> {
        self.send(&FanModeCommand(mode))
    }

    /// Sets the target temperature. Skipped while the unit is off.
    ///
    /// The whole part is sent as `SetTem` and the first fractional digit as
    /// `Add0.1`, so `24.5` becomes `SetTem=24, Add0.1=5`. A missing value is
    /// skipped, and so is a value the unit cannot represent: non-numbers,
    /// and numbers written without a fractional digit.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn set_target_temperature(&self, temperature: Option<f64>) -> Result<Dispatch, Error> {
        let Some(temperature) = temperature else {
            self.inner
                .span
                .in_scope(|| tracing::debug!("No temperature supplied"));
            return Ok(Dispatch::Skipped(SkipReason::MissingTemperature));
        };
        self.set_target(TargetTemperature::try_from(temperature))
    }

    /// Sets the target temperature from its textual form, as hosts pass it
    /// through service calls.
    ///
    /// `"24.5"` sends `SetTem=24, Add0.1=5`. `"24"` and `"warm"` are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn set_target_temperature_str(&self, temperature: &str) -> Result<Dispatch, Error> {
        self.set_target(temperature.parse())
    }

    fn set_target(
        &self,
        parsed: Result<TargetTemperature, ValueError>,
    ) -> Result<Dispatch, Error> {
        match parsed {
            Ok(target) => self.send(&TargetTemperatureCommand(target)),
            Err(e) => {
                self.inner
                    .span
                    .in_scope(|| tracing::warn!(error = %e, "Target temperature dropped"));
                Ok(Dispatch::Skipped(SkipReason::InvalidTemperature(e)))
            }
        }
    }

    /// Sets the preset. Skipped while the unit is off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the bridge cannot accept the message.
    pub fn set_preset_mode(&self, preset: PresetMode) -> Result<Dispatch, Error> {
        self.send(&PresetCommand(preset))
    }

    // =========================================================================
    // External sensor
    // =========================================================================

    /// Updates the room temperature from a sensor reading.
    ///
    /// Readings from an entity other than the configured sensor, and
    /// readings that are not numeric, are ignored. Returns `true` if the
    /// current temperature changed.
    pub fn update_current_temperature(&self, reading: &SensorReading) -> bool {
        let _span = self.inner.span.enter();

        if let (Some(expected), Some(actual)) =
            (self.inner.config.temp_sensor.as_deref(), reading.entity_id.as_deref())
            && expected != actual
        {
            tracing::trace!(entity = actual, "Reading from another sensor ignored");
            return false;
        }

        let Some(value) = reading.temperature_in(self.inner.config.temperature_unit) else {
            return false;
        };

        let change = StateChange::CurrentTemperature(value);
        let _delivery = self.inner.delivery.lock();
        let snapshot = {
            let mut model = self.inner.model.lock();
            if !model.state.apply(&change) {
                return false;
            }
            let snapshot = model.state.clone();
            self.inner.state_tx.send_replace(snapshot.clone());
            snapshot
        };

        tracing::debug!(current_temperature = value, "Room temperature updated");
        self.notify(std::slice::from_ref(&change), &snapshot);
        true
    }

    /// Spawns a task that applies every reading from `readings`.
    ///
    /// The task ends when all senders are dropped.
    pub fn spawn_sensor_listener(&self, mut readings: mpsc::Receiver<SensorReading>) -> JoinHandle<()> {
        let device = self.clone();
        let span = self.inner.span.clone();
        tokio::spawn(
            async move {
                tracing::debug!("Sensor listener started");
                while let Some(reading) = readings.recv().await {
                    device.update_current_temperature(&reading);
                }
                tracing::debug!("Sensor listener stopped");
            }
            .instrument(span),
        )
    }

    pub(crate) fn callbacks(&self) -> &CallbackRegistry {
        &self.inner.callbacks
    }
}

impl std::fmt::Debug for ClimateDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClimateDevice")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}

impl Subscribable for ClimateDevice {
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks().on_power_changed(callback)
    }

    fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static,
    {
        self.callbacks().on_hvac_mode_changed(callback)
    }

    fn on_fan_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanMode) + Send + Sync + 'static,
    {
        self.callbacks().on_fan_mode_changed(callback)
    }

    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.callbacks().on_target_temperature_changed(callback)
    }

    fn on_preset_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PresetMode) + Send + Sync + 'static,
    {
        self.callbacks().on_preset_changed(callback)
    }

    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.callbacks().on_current_temperature_changed(callback)
    }

    fn on_available<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks().on_available(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, &ClimateState) + Send + Sync + 'static,
    {
        self.callbacks().on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks().unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::command::OutboundMessage;
    use crate::protocol::ChannelBridge;

    fn device() -> (ClimateDevice, UnboundedReceiver<OutboundMessage>) {
        let (bridge, rx) = ChannelBridge::new();
        let device = ClimateDevice::new(ClimateConfig::new("ac01"), Arc::new(bridge)).unwrap();
        (device, rx)
    }

    fn powered_device() -> (ClimateDevice, UnboundedReceiver<OutboundMessage>) {
        let (device, rx) = device();
        device.apply_status_packet(&StatusPacket::new(["Pow", "Mod"], vec![1, 1]));
        (device, rx)
    }

    fn sent(rx: &mut UnboundedReceiver<OutboundMessage>) -> (Vec<String>, Vec<i64>) {
        let msg = rx.try_recv().unwrap();
        let cmd = msg.as_command().unwrap();
        (cmd.options().to_vec(), cmd.values().to_vec())
    }

    #[test]
    fn initial_state() {
        let (device, _rx) = device();
        assert!(!device.is_available());
        assert!(device.is_hidden());
        assert_eq!(device.hvac_mode(), HvacMode::Off);
        assert_eq!(device.options(), OptionMap::new());
        assert_eq!(device.unique_id(), "com.gree2.ac01");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let (bridge, _rx) = ChannelBridge::new();
        let result = ClimateDevice::new(ClimateConfig::new(""), Arc::new(bridge));
        assert!(result.is_err());
    }

    #[test]
    fn status_packet_marks_available_and_derives() {
        let (device, _rx) = device();
        device.apply_status_packet(&StatusPacket::new(
            ["Pow", "Mod", "SetTem", "WdSpd", "SwhSlp", "Add0.1"],
            vec![1, 4, 22, 2, 1, 5],
        ));

        let state = device.state();
        assert!(state.available());
        assert_eq!(state.hvac_mode(), HvacMode::Heat);
        assert_eq!(state.fan_mode(), FanMode::MediumLow);
        assert!((state.target_temperature() - 22.5).abs() < f64::EPSILON);
        assert_eq!(state.preset_mode(), PresetMode::Sleep);
    }

    #[test]
    fn response_packet_does_not_mark_available() {
        let (device, _rx) = device();
        device.apply_response_packet(&ResponsePacket::new(["Pow"], vec![1]));
        assert!(!device.is_available());
        assert_eq!(device.power(), PowerState::On);
    }

    #[test]
    fn turn_off_then_fan_mode_is_skipped() {
        let (device, mut rx) = powered_device();
        device.apply_response_packet(&ResponsePacket::new(["Pow"], vec![0]));

        let dispatch = device.set_fan_mode(FanMode::High).unwrap();
        assert_eq!(dispatch, Dispatch::Skipped(SkipReason::PoweredOff));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hvac_mode_encoding() {
        let (device, mut rx) = device();

        device.set_hvac_mode(HvacMode::Dry).unwrap();
        assert_eq!(sent(&mut rx), (vec!["Mod".into(), "Pow".into()], vec![2, 1]));

        device.set_hvac_mode(HvacMode::Off).unwrap();
        assert_eq!(sent(&mut rx), (vec!["Pow".into()], vec![0]));
    }

    #[test]
    fn target_temperature_sends_tenths() {
        let (device, mut rx) = powered_device();
        assert!(device.set_target_temperature(Some(24.5)).unwrap().is_sent());
        assert_eq!(sent(&mut rx), (vec!["SetTem".into(), "Add0.1".into()], vec![24, 5]));
    }

    #[test]
    fn target_temperature_skips() {
        let (device, mut rx) = powered_device();

        assert_eq!(
            device.set_target_temperature(None).unwrap(),
            Dispatch::Skipped(SkipReason::MissingTemperature)
        );
        assert!(matches!(
            device.set_target_temperature_str("24").unwrap(),
            Dispatch::Skipped(SkipReason::InvalidTemperature(ValueError::MissingFraction(_)))
        ));
        assert!(matches!(
            device.set_target_temperature_str("warm").unwrap(),
            Dispatch::Skipped(SkipReason::InvalidTemperature(
                ValueError::NonNumericTemperature(_)
            ))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn target_temperature_requires_power() {
        let (device, mut rx) = device();
        assert_eq!(
            device.set_target_temperature(Some(24.5)).unwrap(),
            Dispatch::Skipped(SkipReason::PoweredOff)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn setters_do_not_touch_local_state() {
        let (device, mut rx) = powered_device();
        let before = device.state();

        device.set_fan_mode(FanMode::High).unwrap();
        device.set_preset_mode(PresetMode::Sleep).unwrap();

        assert_eq!(device.state(), before);
        assert_eq!(sent(&mut rx), (vec!["WdSpd".into()], vec![5]));
        assert_eq!(sent(&mut rx), (vec!["SwhSlp".into(), "Quiet".into()], vec![1, 1]));
    }

    #[test]
    fn request_change_ignores_empty() {
        let (device, mut rx) = device();
        device.request_change(&OptionChanges::new()).unwrap();
        assert!(rx.try_recv().is_err());

        device
            .request_change(&OptionChanges::new().with("Lig", 1))
            .unwrap();
        assert_eq!(sent(&mut rx), (vec!["Lig".into()], vec![1]));
    }

    #[test]
    fn request_status_sends_columns() {
        let (device, mut rx) = device();
        device.request_status().unwrap();
        let msg = rx.try_recv().unwrap();
        assert!(matches!(msg, OutboundMessage::StatusRequest(_)));
        assert_eq!(msg.target(), "ac01");
    }

    #[test]
    fn closed_bridge_is_an_error() {
        let (device, rx) = device();
        drop(rx);
        assert!(device.turn_on().is_err());
    }

    #[test]
    fn callbacks_fire_once_per_change() {
        let (device, _rx) = device();
        let available = Arc::new(AtomicU32::new(0));
        let modes = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let (a, m) = (available.clone(), modes.clone());

        device.on_available(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });
        device.on_hvac_mode_changed(move |mode| m.lock().push(mode));

        let packet = StatusPacket::new(["Pow", "Mod"], vec![1, 0]);
        device.apply_status_packet(&packet);
        device.apply_status_packet(&packet);

        assert_eq!(available.load(Ordering::SeqCst), 1);
        assert_eq!(*modes.lock(), vec![HvacMode::Auto]);
    }

    #[test]
    fn sensor_reading_filtering() {
        let (bridge, _rx) = ChannelBridge::new();
        let config = ClimateConfig::new("ac01").with_temp_sensor("sensor.room");
        let device = ClimateDevice::new(config, Arc::new(bridge)).unwrap();

        assert!(!device.update_current_temperature(
            &SensorReading::new("20.0").with_entity("sensor.other")
        ));
        assert!(!device.update_current_temperature(&SensorReading::new("unknown")));
        assert!(device.update_current_temperature(
            &SensorReading::new("21.5").with_entity("sensor.room")
        ));
        assert!(!device.update_current_temperature(&SensorReading::new("21.5")));
        assert_eq!(device.current_temperature(), Some(21.5));
    }

    #[test]
    fn non_numeric_reading_keeps_last_temperature() {
        let (device, _rx) = device();
        assert!(device.update_current_temperature(&SensorReading::new("22.0")));

        assert!(!device.update_current_temperature(&SensorReading::new("unknown")));
        assert!(!device.update_current_temperature(&SensorReading::new("unavailable")));
        assert_eq!(device.current_temperature(), Some(22.0));
    }

    #[test]
    fn callbacks_see_changes_in_commit_order() {
        use std::sync::atomic::AtomicBool;
        use std::sync::mpsc as std_mpsc;
        use std::time::Duration;

        let (device, _rx) = device();
        let targets = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = targets.clone();
        device.on_target_temperature_changed(move |t| sink.lock().push(t));

        // The first power notification stalls until released.
        let (entered_tx, entered_rx) = std_mpsc::channel();
        let (release_tx, release_rx) = std_mpsc::channel::<()>();
        let release_rx = parking_lot::Mutex::new(release_rx);
        let stalled = AtomicBool::new(false);
        device.on_power_changed(move |_| {
            if !stalled.swap(true, Ordering::SeqCst) {
                entered_tx.send(()).unwrap();
                release_rx.lock().recv().unwrap();
            }
        });

        let first = {
            let device = device.clone();
            std::thread::spawn(move || {
                device.apply_status_packet(&StatusPacket::new(["Pow", "SetTem"], vec![1, 20]));
            })
        };
        entered_rx.recv().unwrap();

        let second = {
            let device = device.clone();
            std::thread::spawn(move || {
                device.apply_response_packet(&ResponsePacket::new(["SetTem"], vec![21]));
            })
        };
        std::thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();

        first.join().unwrap();
        second.join().unwrap();

        assert!((device.target_temperature() - 21.0).abs() < f64::EPSILON);
        assert_eq!(*targets.lock(), vec![20.0, 21.0]);
    }

    #[test]
    fn command_is_handed_over_under_device_lock() {
        struct LockProbe {
            device: parking_lot::Mutex<Option<ClimateDevice>>,
            held: AtomicU32,
        }

        impl Bridge for LockProbe {
            fn sync_status(&self, _message: OutboundMessage) -> Result<(), crate::error::ProtocolError> {
                if let Some(device) = self.device.lock().as_ref()
                    && device.inner.model.is_locked()
                {
                    self.held.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        }

        let bridge = Arc::new(LockProbe {
            device: parking_lot::Mutex::new(None),
            held: AtomicU32::new(0),
        });
        let device = ClimateDevice::new(ClimateConfig::new("ac01"), bridge.clone()).unwrap();
        *bridge.device.lock() = Some(device.clone());

        device.apply_status_packet(&StatusPacket::new(["Pow"], vec![1]));
        assert!(device.set_fan_mode(FanMode::High).unwrap().is_sent());
        assert_eq!(bridge.held.load(Ordering::SeqCst), 1);

        // Break the cycle.
        bridge.device.lock().take();
    }

    #[tokio::test]
    async fn watch_state_sees_merges() {
        let (device, _rx) = device();
        let mut watcher = device.watch_state();

        device.apply_status_packet(&StatusPacket::new(["Pow", "Mod"], vec![1, 3]));

        watcher.changed().await.unwrap();
        assert_eq!(watcher.borrow().hvac_mode(), HvacMode::FanOnly);
    }

    #[tokio::test]
    async fn sensor_listener_applies_readings() {
        let (device, _rx) = device();
        let (tx, rx) = mpsc::channel(4);
        let handle = device.spawn_sensor_listener(rx);

        tx.send(SensorReading::new("19.0")).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(device.current_temperature(), Some(19.0));
    }

    #[test]
    fn metadata() {
        let (device, _rx) = device();
        assert!((device.min_temp() - 16.0).abs() < f64::EPSILON);
        assert!((device.max_temp() - 30.0).abs() < f64::EPSILON);
        assert_eq!(device.hvac_modes().len(), 6);
        assert_eq!(device.fan_modes().len(), 6);
        assert_eq!(device.preset_modes(), [PresetMode::None, PresetMode::Sleep]);
        assert_eq!(device.supported_features().len(), 5);
    }
}
