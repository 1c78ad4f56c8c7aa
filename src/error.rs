// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `gree_climate` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, bridge communication, packet parsing, and device lookup.
//!
//! Errors caused by malformed data coming *from* the air conditioner or the
//! temperature sensor are never surfaced to the host: they are logged and
//! turned into no-ops at the adapter boundary. The types below describe
//! failures the caller can act on.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while handing a message to the bridge.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing an inbound packet.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A temperature could not be read as a number.
    #[error("temperature is not numeric: {0}")]
    NonNumericTemperature(String),

    /// A temperature has no fractional part to encode.
    #[error("temperature has no fractional part: {0}")]
    MissingFraction(String),

    /// An unknown temperature unit was provided.
    #[error("invalid temperature unit: {0}")]
    InvalidUnit(String),

    /// An unknown hvac, fan or preset mode name was provided.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
}

/// Errors related to handing messages to the bridge.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The bridge channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to parsing inbound packets.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the packet.
    #[error("missing field in packet: {0}")]
    MissingField(String),

    /// Unexpected packet type.
    #[error("unexpected packet type: {0}")]
    UnexpectedType(String),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No device is registered for the given MAC address.
    #[error("no device registered for {0}")]
    UnknownDevice(String),

    /// A device with the same MAC address is already registered.
    #[error("device {0} is already registered")]
    DuplicateDevice(String),

    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 5,
            actual: 7,
        };
        assert_eq!(err.to_string(), "value 7 is out of range [0, 5]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::MissingFraction("24".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::MissingFraction(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("cols".to_string());
        assert_eq!(err.to_string(), "missing field in packet: cols");
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::UnknownDevice("f4911e000001".to_string());
        assert_eq!(err.to_string(), "no device registered for f4911e000001");
    }
}
