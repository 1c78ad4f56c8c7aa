// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate device configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Error, ParseError};
use crate::types::TemperatureUnit;

const DEFAULT_NAME: &str = "Gree Climate";
const DEFAULT_TEMPERATURE_STEP: f64 = 1.0;

/// Configuration for one air conditioner.
///
/// # Examples
///
/// ```
/// use gree_climate::ClimateConfig;
/// use gree_climate::types::TemperatureUnit;
///
/// let config = ClimateConfig::new("f4911e000001")
///     .with_name("Bedroom AC")
///     .with_temp_sensor("sensor.bedroom_temperature")
///     .with_target_temperature_step(0.5)
///     .with_temperature_unit(TemperatureUnit::Celsius);
///
/// assert_eq!(config.unique_id(), "com.gree2.f4911e000001");
/// assert!(config.validate().is_ok());
/// ```
///
/// Configurations can also be loaded from JSON; everything but `mac` has a
/// default:
///
/// ```
/// use gree_climate::ClimateConfig;
///
/// let config = ClimateConfig::from_json(r#"{"mac": "f4911e000001"}"#).unwrap();
/// assert_eq!(config.name, "Gree Climate");
/// assert!((config.target_temperature_step - 1.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// MAC address identifying the unit on the bridge.
    pub mac: String,
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Entity id of the external temperature sensor, if any.
    #[serde(default)]
    pub temp_sensor: Option<String>,
    /// Step offered to the host for target temperature changes.
    #[serde(default = "default_step")]
    pub target_temperature_step: f64,
    /// Unit the host displays temperatures in.
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_step() -> f64 {
    DEFAULT_TEMPERATURE_STEP
}

impl ClimateConfig {
    /// Creates a configuration for the unit with the given MAC.
    #[must_use]
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            name: default_name(),
            temp_sensor: None,
            target_temperature_step: DEFAULT_TEMPERATURE_STEP,
            temperature_unit: TemperatureUnit::default(),
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the configuration is
    /// invalid.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the external temperature sensor entity.
    #[must_use]
    pub fn with_temp_sensor(mut self, entity_id: impl Into<String>) -> Self {
        self.temp_sensor = Some(entity_id.into());
        self
    }

    /// Sets the target temperature step.
    #[must_use]
    pub fn with_target_temperature_step(mut self, step: f64) -> Self {
        self.target_temperature_step = step;
        self
    }

    /// Sets the host temperature unit.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Stable identifier for the host entity registry.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("com.gree2.{}", self.mac)
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` for an empty MAC or a
    /// non-positive temperature step.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.mac.trim().is_empty() {
            return Err(DeviceError::InvalidConfiguration(
                "mac must not be empty".to_string(),
            ));
        }
        if !(self.target_temperature_step.is_finite() && self.target_temperature_step > 0.0) {
            return Err(DeviceError::InvalidConfiguration(format!(
                "target temperature step must be positive, got {}",
                self.target_temperature_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClimateConfig::new("ac01");
        assert_eq!(config.name, "Gree Climate");
        assert!(config.temp_sensor.is_none());
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn empty_mac_is_invalid() {
        let err = ClimateConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, DeviceError::InvalidConfiguration(_)));
    }

    #[test]
    fn non_positive_step_is_invalid() {
        assert!(
            ClimateConfig::new("ac01")
                .with_target_temperature_step(0.0)
                .validate()
                .is_err()
        );
        assert!(
            ClimateConfig::new("ac01")
                .with_target_temperature_step(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn from_json_full() {
        let json = r#"{
            "mac": "f4911e000001",
            "name": "Office",
            "temp_sensor": "sensor.office",
            "target_temperature_step": 0.5,
            "temperature_unit": "°F"
        }"#;
        let config = ClimateConfig::from_json(json).unwrap();
        assert_eq!(config.name, "Office");
        assert_eq!(config.temp_sensor.as_deref(), Some("sensor.office"));
        assert_eq!(config.temperature_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn from_json_rejects_invalid() {
        assert!(matches!(
            ClimateConfig::from_json(r#"{"mac": ""}"#),
            Err(Error::Device(DeviceError::InvalidConfiguration(_)))
        ));
        assert!(matches!(
            ClimateConfig::from_json("{"),
            Err(Error::Parse(ParseError::Json(_)))
        ));
    }
}
