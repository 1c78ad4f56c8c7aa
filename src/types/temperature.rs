// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature types.
//!
//! # Target temperature encoding
//!
//! The unit stores its set point as a whole number (`SetTem`) plus a separate
//! `Add0.1` option. `Add0.1` is not a boolean: it carries the literal first
//! fractional digit of the requested value, so `24.5` is sent as
//! `{SetTem: 24, Add0.1: 5}`. Only one decimal digit is representable, and
//! no negative fraction exists in the protocol. [`TargetTemperature`]
//! reproduces this encoding exactly.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Lowest target temperature offered by the remote control and app.
pub const MIN_TEMP: i64 = 16;

/// Highest target temperature offered by the remote control and app.
pub const MAX_TEMP: i64 = 30;

/// Default set point of a freshly created model.
pub const DEFAULT_SET_TEMP: i64 = 26;

/// Temperature unit used by the host or a sensor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    #[serde(alias = "°C", alias = "C", alias = "celsius")]
    Celsius,
    /// Degrees Fahrenheit.
    #[serde(alias = "°F", alias = "F", alias = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Converts `value` expressed in `from` into this unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use gree_climate::types::TemperatureUnit;
    ///
    /// let f = TemperatureUnit::Fahrenheit.convert(100.0, TemperatureUnit::Celsius);
    /// assert!((f - 212.0).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn convert(&self, value: f64, from: Self) -> f64 {
        match (from, self) {
            (Self::Celsius, Self::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
            (Self::Fahrenheit, Self::Celsius) => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "°C" | "C" | "c" | "celsius" | "Celsius" => Ok(Self::Celsius),
            "°F" | "F" | "f" | "fahrenheit" | "Fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(ValueError::InvalidUnit(other.to_string())),
        }
    }
}

/// A requested set point split into its `SetTem` and `Add0.1` options.
///
/// # Examples
///
/// ```
/// use gree_climate::types::TargetTemperature;
///
/// let t: TargetTemperature = "24.5".parse().unwrap();
/// assert_eq!(t.whole(), 24);
/// assert_eq!(t.tenths(), 5);
///
/// // A value without a fractional part cannot be encoded.
/// assert!("24".parse::<TargetTemperature>().is_err());
///
/// // Floats keep their decimal point, so 24.0 encodes as {24, 0}.
/// let t = TargetTemperature::try_from(24.0).unwrap();
/// assert_eq!((t.whole(), t.tenths()), (24, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetTemperature {
    whole: i64,
    tenths: i64,
}

impl TargetTemperature {
    /// Builds a target temperature from raw option values.
    #[must_use]
    pub const fn from_options(whole: i64, tenths: i64) -> Self {
        Self { whole, tenths }
    }

    /// Value of the `SetTem` option.
    #[must_use]
    pub const fn whole(&self) -> i64 {
        self.whole
    }

    /// Value of the `Add0.1` option.
    #[must_use]
    pub const fn tenths(&self) -> i64 {
        self.tenths
    }

    /// Returns the temperature as a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        let whole = self.whole as f64;
        if self.tenths == 0 {
            whole
        } else {
            whole + self.tenths as f64 * 0.1
        }
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.whole, self.tenths)
    }
}

impl FromStr for TargetTemperature {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((whole, fraction)) = s.split_once('.') else {
            return if s.parse::<f64>().is_ok() {
                Err(ValueError::MissingFraction(s.to_string()))
            } else {
                Err(ValueError::NonNumericTemperature(s.to_string()))
            };
        };

        let whole: i64 = whole
            .parse()
            .map_err(|_| ValueError::NonNumericTemperature(s.to_string()))?;

        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::NonNumericTemperature(s.to_string()));
        }

        // Only the first decimal digit is representable.
        let tenths = fraction
            .bytes()
            .next()
            .map(|b| i64::from(b - b'0'))
            .ok_or_else(|| ValueError::MissingFraction(s.to_string()))?;

        Ok(Self { whole, tenths })
    }
}

impl TryFrom<f64> for TargetTemperature {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ValueError::NonNumericTemperature(value.to_string()));
        }
        // Debug formatting always keeps the decimal point (24.0 -> "24.0").
        format!("{value:?}").parse()
    }
}
