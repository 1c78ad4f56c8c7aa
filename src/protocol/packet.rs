// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound packets delivered by the bridge.
//!
//! Both packet kinds carry option keys and values as two parallel arrays:
//! `cols`/`dat` for status snapshots and `opt`/`val` for command
//! acknowledgements. [`decode_options`] pairs them up explicitly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ParseError;

/// Full status snapshot: `{"t": "status", "mac": .., "cols": [..], "dat": [..]}`.
///
/// # Examples
///
/// ```
/// use gree_climate::protocol::StatusPacket;
///
/// let json = r#"{"t":"status","mac":"f4911e000001","cols":["Pow","Mod"],"dat":[1,"2"]}"#;
/// let packet: StatusPacket = serde_json::from_str(json).unwrap();
/// assert_eq!(packet.values(), [1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPacket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mac: Option<String>,
    cols: Vec<String>,
    #[serde(deserialize_with = "deserialize_values")]
    dat: Vec<i64>,
}

impl StatusPacket {
    /// Creates a status packet from parallel key and value lists.
    #[must_use]
    pub fn new<K: Into<String>>(cols: impl IntoIterator<Item = K>, dat: Vec<i64>) -> Self {
        Self {
            mac: None,
            cols: cols.into_iter().map(Into::into).collect(),
            dat,
        }
    }

    /// Tags the packet with the reporting device MAC.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// Reporting device MAC, if present.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    /// Option keys.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.cols
    }

    /// Option values, parallel to [`columns`](Self::columns).
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.dat
    }

    /// Pairs keys with values.
    #[must_use]
    pub fn decode(&self) -> DecodedOptions {
        decode_options(&self.cols, &self.dat)
    }
}

/// Command acknowledgement: `{"t": "res", "mac": .., "opt": [..], "val": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePacket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mac: Option<String>,
    opt: Vec<String>,
    #[serde(deserialize_with = "deserialize_values")]
    val: Vec<i64>,
}

impl ResponsePacket {
    /// Creates a response packet from parallel key and value lists.
    #[must_use]
    pub fn new<K: Into<String>>(opt: impl IntoIterator<Item = K>, val: Vec<i64>) -> Self {
        Self {
            mac: None,
            opt: opt.into_iter().map(Into::into).collect(),
            val,
        }
    }

    /// Tags the packet with the reporting device MAC.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// Reporting device MAC, if present.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    /// Option keys.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.opt
    }

    /// Option values, parallel to [`options`](Self::options).
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.val
    }

    /// Pairs keys with values.
    #[must_use]
    pub fn decode(&self) -> DecodedOptions {
        decode_options(&self.opt, &self.val)
    }
}

/// A packet of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPacket {
    /// Full status snapshot.
    Status(StatusPacket),
    /// Command acknowledgement.
    Response(ResponsePacket),
}

impl InboundPacket {
    /// Parses a packet from JSON.
    ///
    /// The kind is taken from the `t` field (`"status"` or `"res"`); without
    /// it, the presence of `cols` or `opt` decides. A JSON `null` yields
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the JSON is malformed, the packet type is
    /// unknown, or a value is not an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use gree_climate::protocol::InboundPacket;
    ///
    /// let packet = InboundPacket::from_json(r#"{"t":"res","opt":["WdSpd"],"val":[2]}"#)
    ///     .unwrap()
    ///     .unwrap();
    /// assert!(matches!(packet, InboundPacket::Response(_)));
    ///
    /// assert!(InboundPacket::from_json("null").unwrap().is_none());
    /// ```
    pub fn from_json(json: &str) -> Result<Option<Self>, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parses a packet from an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// See [`from_json`](Self::from_json).
    pub fn from_value(value: Value) -> Result<Option<Self>, ParseError> {
        let Value::Object(object) = &value else {
            return match value {
                Value::Null => Ok(None),
                other => Err(ParseError::UnexpectedType(other.to_string())),
            };
        };

        let kind = match object.get("t").and_then(Value::as_str) {
            Some("status") => PacketKind::Status,
            Some("res") => PacketKind::Response,
            Some(other) => return Err(ParseError::UnexpectedType(other.to_string())),
            None if object.contains_key("cols") => PacketKind::Status,
            None if object.contains_key("opt") => PacketKind::Response,
            None => return Err(ParseError::MissingField("t".to_string())),
        };

        let packet = match kind {
            PacketKind::Status => Self::Status(serde_json::from_value(value)?),
            PacketKind::Response => Self::Response(serde_json::from_value(value)?),
        };
        Ok(Some(packet))
    }

    /// Reporting device MAC, if present.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        match self {
            Self::Status(p) => p.mac(),
            Self::Response(p) => p.mac(),
        }
    }
}

enum PacketKind {
    Status,
    Response,
}

/// Key/value pairs decoded from a packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedOptions {
    /// Pairs to merge, in packet order.
    pub pairs: Vec<(String, i64)>,
    /// Entries dropped because the other array was shorter.
    pub skipped: usize,
}

/// Pairs `keys[i]` with `values[i]`.
///
/// If the arrays differ in length, the extra entries of the longer one are
/// skipped and counted. Value ranges are not checked.
///
/// # Examples
///
/// ```
/// use gree_climate::protocol::decode_options;
///
/// let keys = vec!["Pow".to_string(), "Mod".to_string(), "SetTem".to_string()];
/// let decoded = decode_options(&keys, &[1, 4]);
/// assert_eq!(decoded.pairs.len(), 2);
/// assert_eq!(decoded.skipped, 1);
/// ```
#[must_use]
pub fn decode_options(keys: &[String], values: &[i64]) -> DecodedOptions {
    let pairs: Vec<(String, i64)> = keys
        .iter()
        .zip(values)
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let skipped = keys.len().max(values.len()) - pairs.len();

    if skipped > 0 {
        tracing::warn!(
            keys = keys.len(),
            values = values.len(),
            skipped,
            "Packet key/value length mismatch, skipping extra entries"
        );
    }

    DecodedOptions { pairs, skipped }
}

/// Accepts integers, integral floats and numeric strings.
fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    raw.iter()
        .map(|v| {
            coerce_value(v).ok_or_else(|| {
                serde::de::Error::custom(format!("not an integer option value: {v}"))
            })
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
