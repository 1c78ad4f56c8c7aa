// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External temperature sensor readings.
//!
//! The unit does not report the room temperature itself; the host feeds it
//! from a separate sensor entity. Readings arrive as raw state strings
//! (hosts report `"unknown"` or `"unavailable"` as well as numbers) with an
//! optional unit of measurement.

use crate::types::TemperatureUnit;

/// A state update from the external temperature sensor.
///
/// # Examples
///
/// ```
/// use gree_climate::sensor::SensorReading;
/// use gree_climate::types::TemperatureUnit;
///
/// let reading = SensorReading::new("68.0").with_unit(TemperatureUnit::Fahrenheit);
/// let celsius = reading.temperature_in(TemperatureUnit::Celsius).unwrap();
/// assert!((celsius - 20.0).abs() < 1e-9);
///
/// assert!(SensorReading::new("unavailable")
///     .temperature_in(TemperatureUnit::Celsius)
///     .is_none());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SensorReading {
    /// Entity that produced the reading.
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Raw state string.
    pub state: String,
    /// Unit of measurement, if the sensor reports one.
    #[serde(default)]
    pub unit: Option<TemperatureUnit>,
}

impl SensorReading {
    /// Creates a reading without a unit.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            entity_id: None,
            state: state.into(),
            unit: None,
        }
    }

    /// Sets the unit of measurement.
    #[must_use]
    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the producing entity.
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Parses the reading and converts it to `target`.
    ///
    /// A reading without a unit is assumed to already be in `target`.
    /// Returns `None` (and logs) for non-numeric states.
    #[must_use]
    pub fn temperature_in(&self, target: TemperatureUnit) -> Option<f64> {
        match self.state.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                Some(target.convert(value, self.unit.unwrap_or(target)))
            }
            _ => {
                tracing::debug!(
                    entity = self.entity_id.as_deref().unwrap_or("-"),
                    state = %self.state,
                    "Ignoring non-numeric sensor state"
                );
                None
            }
        }
    }
}
