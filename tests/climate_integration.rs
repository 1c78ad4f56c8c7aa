// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests driving a device through a channel bridge.

use std::sync::Arc;
use std::time::Duration;

use gree_climate::command::OutboundMessage;
use gree_climate::protocol::{ChannelBridge, InboundPacket, ResponsePacket, StatusPacket};
use gree_climate::types::{FanMode, HvacMode, PowerState, PresetMode};
use gree_climate::{ClimateConfig, ClimateDevice, Dispatch, SkipReason};
use tokio::sync::mpsc::UnboundedReceiver;

fn device() -> (ClimateDevice, UnboundedReceiver<OutboundMessage>) {
    let (bridge, rx) = ChannelBridge::new();
    let device = ClimateDevice::new(ClimateConfig::new("f4911e000001"), Arc::new(bridge))
        .expect("valid config");
    (device, rx)
}

fn powered_device() -> (ClimateDevice, UnboundedReceiver<OutboundMessage>) {
    let (device, rx) = device();
    device.apply_status_packet(&StatusPacket::new(["Pow", "Mod"], vec![1, 1]));
    (device, rx)
}

/// Returns the options and values of the next outbound command.
fn next_command(rx: &mut UnboundedReceiver<OutboundMessage>) -> (Vec<String>, Vec<i64>) {
    let msg = rx.try_recv().expect("a message was sent");
    let cmd = msg.as_command().expect("message is a command");
    (cmd.options().to_vec(), cmd.values().to_vec())
}

// ============================================================================
// Derivation
// ============================================================================

mod derivation {
    use super::*;

    #[test]
    fn off_iff_powered_off_over_packet_sequences() {
        let (device, _rx) = device();

        // Small LCG so the sequence is reproducible.
        let mut seed: u64 = 0x5eed;
        let mut next = |bound: i64| {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            i64::try_from((seed >> 33) % u64::try_from(bound).unwrap()).unwrap()
        };

        for round in 0..500 {
            let pow = next(2);
            let mode = next(8) - 1;
            let packet_is_status = round % 3 != 0;

            if packet_is_status {
                device.apply_status_packet(&StatusPacket::new(["Pow", "Mod"], vec![pow, mode]));
            } else if next(2) == 0 {
                device.apply_response_packet(&ResponsePacket::new(["Pow"], vec![pow]));
            } else {
                device.apply_response_packet(&ResponsePacket::new(["Mod"], vec![mode]));
            }

            let options = device.options();
            let powered = options.get("Pow").unwrap_or(0) != 0;
            assert_eq!(
                device.hvac_mode() == HvacMode::Off,
                !powered,
                "round {round}: options {options}"
            );
        }
    }

    #[test]
    fn status_snapshot_derives_every_attribute() {
        let (device, _rx) = device();
        device.apply_status_packet(&StatusPacket::new(
            ["Pow", "Mod", "SetTem", "WdSpd", "SwhSlp"],
            vec![1, 2, 24, 3, 0],
        ));

        let state = device.state();
        assert_eq!(state.hvac_mode(), HvacMode::Dry);
        assert_eq!(state.fan_mode(), FanMode::Medium);
        assert!((state.target_temperature() - 24.0).abs() < f64::EPSILON);
        assert_eq!(state.preset_mode(), PresetMode::None);
        assert!(state.available());
    }

    #[test]
    fn out_of_range_fan_speed_keeps_previous_mode() {
        let (device, _rx) = powered_device();
        device.apply_response_packet(&ResponsePacket::new(["WdSpd"], vec![2]));
        assert_eq!(device.fan_mode(), FanMode::MediumLow);

        device.apply_response_packet(&ResponsePacket::new(["WdSpd"], vec![7]));
        assert_eq!(device.fan_mode(), FanMode::MediumLow);
        assert_eq!(device.options().get("WdSpd"), Some(7));
    }

    #[test]
    fn same_status_twice_is_idempotent() {
        let (device, _rx) = device();
        let packet = StatusPacket::new(
            ["Pow", "Mod", "SetTem", "Add0.1", "WdSpd", "SwhSlp"],
            vec![1, 4, 21, 5, 1, 1],
        );

        device.apply_status_packet(&packet);
        let first = device.state();
        device.apply_status_packet(&packet);

        assert_eq!(device.state(), first);
        assert!((first.target_temperature() - 21.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_options_are_kept() {
        let (device, _rx) = device();
        device.apply_status_packet(&StatusPacket::new(["Pow", "Lig", "Tur"], vec![1, 1, 0]));

        let options = device.options();
        assert_eq!(options.get("Lig"), Some(1));
        assert_eq!(options.get("Tur"), Some(0));
        assert_eq!(options.get("SetTem"), Some(26));
    }

    #[test]
    fn mismatched_arrays_merge_the_common_prefix() {
        let (device, _rx) = device();
        let packet = InboundPacket::from_json(r#"{"t":"status","cols":["Pow","Mod","WdSpd"],"dat":[1,4]}"#)
            .unwrap()
            .unwrap();
        device.apply_packet(&packet);

        assert_eq!(device.hvac_mode(), HvacMode::Heat);
        assert_eq!(device.options().get("WdSpd"), Some(0));
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[test]
    fn set_temperature_with_tenths_when_powered() {
        let (device, mut rx) = powered_device();
        assert_eq!(device.set_target_temperature(Some(24.5)).unwrap(), Dispatch::Sent);
        assert_eq!(
            next_command(&mut rx),
            (vec!["SetTem".to_string(), "Add0.1".to_string()], vec![24, 5])
        );
    }

    #[test]
    fn set_temperature_when_off_sends_nothing() {
        let (device, mut rx) = device();
        assert_eq!(
            device.set_target_temperature(Some(24.5)).unwrap(),
            Dispatch::Skipped(SkipReason::PoweredOff)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hvac_off_is_sent_regardless_of_power() {
        let (device, mut rx) = device();
        device.set_hvac_mode(HvacMode::Off).unwrap();
        assert_eq!(next_command(&mut rx), (vec!["Pow".to_string()], vec![0]));

        device.apply_status_packet(&StatusPacket::new(["Pow"], vec![1]));
        device.set_hvac_mode(HvacMode::Off).unwrap();
        assert_eq!(next_command(&mut rx), (vec!["Pow".to_string()], vec![0]));
    }

    #[test]
    fn sleep_preset_requires_power() {
        let (device, mut rx) = device();
        assert!(!device.set_preset_mode(PresetMode::Sleep).unwrap().is_sent());
        assert!(rx.try_recv().is_err());

        device.apply_status_packet(&StatusPacket::new(["Pow"], vec![1]));
        assert!(device.set_preset_mode(PresetMode::Sleep).unwrap().is_sent());
        assert_eq!(
            next_command(&mut rx),
            (vec!["SwhSlp".to_string(), "Quiet".to_string()], vec![1, 1])
        );
    }

    #[test]
    fn clearing_preset_requires_power() {
        let (device, mut rx) = device();
        assert_eq!(
            device.set_preset_mode(PresetMode::None).unwrap(),
            Dispatch::Skipped(SkipReason::PoweredOff)
        );
        assert!(rx.try_recv().is_err());

        device.apply_status_packet(&StatusPacket::new(["Pow"], vec![1]));
        assert!(device.set_preset_mode(PresetMode::None).unwrap().is_sent());
        assert_eq!(
            next_command(&mut rx),
            (vec!["SwhSlp".to_string(), "Quiet".to_string()], vec![0, 0])
        );
    }

    #[test]
    fn turn_on_and_off() {
        let (device, mut rx) = device();
        device.turn_on().unwrap();
        device.turn_off().unwrap();
        assert_eq!(next_command(&mut rx), (vec!["Pow".to_string()], vec![1]));
        assert_eq!(next_command(&mut rx), (vec!["Pow".to_string()], vec![0]));
    }

    #[test]
    fn command_waits_for_acknowledgement() {
        let (device, mut rx) = powered_device();

        device.set_fan_mode(FanMode::Low).unwrap();
        assert_eq!(device.fan_mode(), FanMode::Auto);

        let (opt, val) = next_command(&mut rx);
        let ack = ResponsePacket::new(opt, val).with_mac("f4911e000001");
        device.apply_response_packet(&ack);
        assert_eq!(device.fan_mode(), FanMode::Low);
    }

    #[test]
    fn outbound_json_shape() {
        let (device, mut rx) = powered_device();
        device.set_target_temperature_str("22.5").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&rx.try_recv().unwrap().to_json().unwrap()).unwrap();
        assert_eq!(json["t"], "cmd");
        assert_eq!(json["sub"], "f4911e000001");
        assert_eq!(json["opt"], serde_json::json!(["SetTem", "Add0.1"]));
        assert_eq!(json["p"], serde_json::json!([22, 5]));
    }
}

// ============================================================================
// Notifications
// ============================================================================

mod notifications {
    use super::*;
    use gree_climate::Subscribable;
    use gree_climate::sensor::SensorReading;
    use gree_climate::types::TemperatureUnit;
    use parking_lot::Mutex;

    #[test]
    fn power_callback_follows_packets() {
        let (device, _rx) = device();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        device.on_power_changed(move |p| sink.lock().push(p));

        device.apply_status_packet(&StatusPacket::new(["Pow"], vec![1]));
        device.apply_response_packet(&ResponsePacket::new(["Pow"], vec![1]));
        device.apply_response_packet(&ResponsePacket::new(["Pow"], vec![0]));

        assert_eq!(*seen.lock(), vec![PowerState::On, PowerState::Off]);
    }

    #[tokio::test]
    async fn watch_receives_sensor_updates() {
        let (bridge, _rx) = ChannelBridge::new();
        let config = ClimateConfig::new("f4911e000001")
            .with_temp_sensor("sensor.room")
            .with_temperature_unit(TemperatureUnit::Celsius);
        let device = ClimateDevice::new(config, Arc::new(bridge)).unwrap();
        let mut watcher = device.watch_state();

        let (tx, readings) = tokio::sync::mpsc::channel(8);
        let listener = device.spawn_sensor_listener(readings);

        tx.send(SensorReading::new("unavailable").with_entity("sensor.room"))
            .await
            .unwrap();
        tx.send(
            SensorReading::new("77")
                .with_entity("sensor.room")
                .with_unit(TemperatureUnit::Fahrenheit),
        )
        .await
        .unwrap();

        tokio::time::timeout(Duration::from_secs(1), watcher.changed())
            .await
            .expect("state changed in time")
            .unwrap();
        let current = watcher.borrow().current_temperature().unwrap();
        assert!((current - 25.0).abs() < 1e-9);

        drop(tx);
        listener.await.unwrap();
    }

    #[test]
    fn unreadable_sensor_keeps_last_temperature() {
        let (bridge, _rx) = ChannelBridge::new();
        let config = ClimateConfig::new("f4911e000001").with_temp_sensor("sensor.room");
        let device = ClimateDevice::new(config, Arc::new(bridge)).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        device.on_current_temperature_changed(move |t| sink.lock().push(t));

        device.update_current_temperature(&SensorReading::new("23.5").with_entity("sensor.room"));
        device.update_current_temperature(&SensorReading::new("unknown").with_entity("sensor.room"));

        assert_eq!(device.current_temperature(), Some(23.5));
        assert_eq!(*seen.lock(), vec![23.5]);
    }

    #[tokio::test]
    async fn concurrent_packets_converge() {
        let (device, _rx) = device();
        let mut tasks = Vec::new();
        for i in 0..16_i64 {
            let device = device.clone();
            tasks.push(tokio::spawn(async move {
                device.apply_status_packet(&StatusPacket::new(["Pow", "SetTem"], vec![1, 16 + i]));
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let options = device.options();
        let set_tem = options.get("SetTem").unwrap();
        #[allow(clippy::cast_precision_loss)]
        let expected = set_tem as f64;
        assert!((device.target_temperature() - expected).abs() < f64::EPSILON);
        assert!(device.is_available());
    }
}
