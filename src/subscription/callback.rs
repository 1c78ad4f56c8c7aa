// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for climate state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{ClimateState, StateChange};
use crate::types::{FanMode, HvacMode, PowerState, PresetMode};

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type HvacModeCallback = Arc<dyn Fn(HvacMode) + Send + Sync>;
type FanModeCallback = Arc<dyn Fn(FanMode) + Send + Sync>;
type PresetCallback = Arc<dyn Fn(PresetMode) + Send + Sync>;
/// Shared by target and current temperature callbacks.
type TemperatureCallback = Arc<dyn Fn(f64) + Send + Sync>;
type AvailableCallback = Arc<dyn Fn(bool) + Send + Sync>;
/// Receives every change with the state it produced.
type StateChangedCallback = Arc<dyn Fn(&StateChange, &ClimateState) + Send + Sync>;

/// One family of callbacks keyed by subscription.
struct Slot<C> {
    callbacks: RwLock<HashMap<SubscriptionId, C>>,
}

impl<C: Clone> Slot<C> {
    fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, id: SubscriptionId, callback: C) -> SubscriptionId {
        self.callbacks.write().insert(id, callback);
        id
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        self.callbacks.write().remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    fn clear(&self) {
        self.callbacks.write().clear();
    }

    /// Clones the callbacks out so none run while the lock is held.
    fn snapshot(&self) -> Vec<C> {
        self.callbacks.read().values().cloned().collect()
    }
}

/// Registry for climate subscription callbacks.
///
/// Callbacks are stored behind `parking_lot::RwLock`s and invoked
/// synchronously by [`dispatch`](Self::dispatch). The registry snapshots the
/// callbacks before invoking them, so a callback may subscribe or
/// unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power: Slot<PowerCallback>,
    hvac_mode: Slot<HvacModeCallback>,
    fan_mode: Slot<FanModeCallback>,
    target_temperature: Slot<TemperatureCallback>,
    preset: Slot<PresetCallback>,
    current_temperature: Slot<TemperatureCallback>,
    available: Slot<AvailableCallback>,
    state_changed: Slot<StateChangedCallback>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power: Slot::new(),
            hvac_mode: Slot::new(),
            fan_mode: Slot::new(),
            target_temperature: Slot::new(),
            preset: Slot::new(),
            current_temperature: Slot::new(),
            available: Slot::new(),
            state_changed: Slot::new(),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.power.insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for hvac mode changes.
    pub fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static,
    {
        self.hvac_mode.insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for fan mode changes.
    pub fn on_fan_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(FanMode) + Send + Sync + 'static,
    {
        self.fan_mode.insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for target temperature changes.
    pub fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.target_temperature
            .insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for preset changes.
    pub fn on_preset_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PresetMode) + Send + Sync + 'static,
    {
        self.preset.insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for room temperature updates from the sensor.
    pub fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.current_temperature
            .insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for availability changes.
    pub fn on_available<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.available.insert(self.next_id(), Arc::new(callback))
    }

    /// Registers a callback for every state change.
    ///
    /// The callback also receives the state snapshot the change produced.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, &ClimateState) + Send + Sync + 'static,
    {
        self.state_changed.insert(self.next_id(), Arc::new(callback))
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power.remove(id)
            || self.hvac_mode.remove(id)
            || self.fan_mode.remove(id)
            || self.target_temperature.remove(id)
            || self.preset.remove(id)
            || self.current_temperature.remove(id)
            || self.available.remove(id)
            || self.state_changed.remove(id)
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.power.clear();
        self.hvac_mode.clear();
        self.fan_mode.clear();
        self.target_temperature.clear();
        self.preset.clear();
        self.current_temperature.clear();
        self.available.clear();
        self.state_changed.clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a state change to the matching callbacks.
    ///
    /// `on_state_changed` callbacks run first, then the attribute callbacks.
    pub fn dispatch(&self, change: &StateChange, state: &ClimateState) {
        for callback in self.state_changed.snapshot() {
            callback(change, state);
        }

        match change {
            StateChange::Power(power) => {
                for callback in self.power.snapshot() {
                    callback(*power);
                }
            }
            StateChange::HvacMode(mode) => {
                for callback in self.hvac_mode.snapshot() {
                    callback(*mode);
                }
            }
            StateChange::FanMode(mode) => {
                for callback in self.fan_mode.snapshot() {
                    callback(*mode);
                }
            }
            StateChange::TargetTemperature(t) => {
                for callback in self.target_temperature.snapshot() {
                    callback(*t);
                }
            }
            StateChange::PresetMode(preset) => {
                for callback in self.preset.snapshot() {
                    callback(*preset);
                }
            }
            StateChange::CurrentTemperature(t) => {
                for callback in self.current_temperature.snapshot() {
                    callback(*t);
                }
            }
            StateChange::Available(available) => {
                for callback in self.available.snapshot() {
                    callback(*available);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.power.len()
            + self.hvac_mode.len()
            + self.fan_mode.len()
            + self.target_temperature.len()
            + self.preset.len()
            + self.current_temperature.len()
            + self.available.len()
            + self.state_changed.len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn state() -> ClimateState {
        ClimateState::new()
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn hvac_mode_callback_and_unsubscribe() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(Vec::new()));
        let sink = received.clone();

        let id = registry.on_hvac_mode_changed(move |mode| sink.write().push(mode));
        registry.dispatch(&StateChange::HvacMode(HvacMode::Cool), &state());
        assert_eq!(*received.read(), vec![HvacMode::Cool]);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&StateChange::HvacMode(HvacMode::Heat), &state());
        assert_eq!(received.read().len(), 1);
    }

    #[test]
    fn temperature_callbacks_are_separate() {
        let registry = CallbackRegistry::new();
        let target = Arc::new(AtomicU32::new(0));
        let current = Arc::new(AtomicU32::new(0));
        let (t, c) = (target.clone(), current.clone());

        registry.on_target_temperature_changed(move |_| {
            t.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_current_temperature_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::TargetTemperature(24.5), &state());
        registry.dispatch(&StateChange::CurrentTemperature(21.0), &state());
        registry.dispatch(&StateChange::CurrentTemperature(21.5), &state());

        assert_eq!(target.load(Ordering::SeqCst), 1);
        assert_eq!(current.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn state_changed_receives_snapshot() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(RwLock::new(None));
        let sink = seen.clone();

        registry.on_state_changed(move |_, state| {
            *sink.write() = Some(state.available());
        });

        let mut snapshot = state();
        snapshot.apply(&StateChange::Available(true));
        registry.dispatch(&StateChange::Available(true), &snapshot);

        assert_eq!(*seen.read(), Some(true));
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let id_cell = Arc::new(RwLock::new(None::<SubscriptionId>));
        let (reg, cell) = (registry.clone(), id_cell.clone());

        let id = registry.on_available(move |_| {
            if let Some(id) = *cell.read() {
                reg.unsubscribe(id);
            }
        });
        *id_cell.write() = Some(id);

        registry.dispatch(&StateChange::Available(true), &state());
        assert!(registry.is_empty());
    }

    #[test]
    fn unique_ids_and_clear() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_power_changed(|_| {});
        let id2 = registry.on_fan_mode_changed(|_| {});
        let id3 = registry.on_preset_changed(|_| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.unsubscribe(id1));
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_power_changed(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("callback_count"));
    }
}
