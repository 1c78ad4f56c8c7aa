// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound messages handed to the bridge.

use serde::Serialize;

use crate::state::keys;

/// Options queried by a status request, in wire order.
pub const STATUS_COLUMNS: [&str; 12] = [
    keys::POW,
    keys::MOD,
    keys::SET_TEM,
    keys::WD_SPD,
    keys::AIR,
    keys::BLO,
    keys::HEALTH,
    keys::SWH_SLP,
    keys::SWING_LF_RIG,
    keys::QUIET,
    keys::SV_ST,
    keys::ADD_TENTH,
];

/// Ordered set of requested option values.
///
/// Behaves like an insertion-ordered map: pushing a key that is already
/// present overwrites its value in place.
///
/// # Examples
///
/// ```
/// use gree_climate::command::OptionChanges;
///
/// let changes = OptionChanges::new().with("Mod", 1).with("Pow", 1);
/// let keys: Vec<&str> = changes.keys().collect();
/// assert_eq!(keys, ["Mod", "Pow"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionChanges(Vec<(String, i64)>);

impl OptionChanges {
    /// Creates an empty set of changes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites an option, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: i64) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or overwrites an option.
    pub fn insert(&mut self, key: impl Into<String>, value: i64) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Returns the value requested for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Iterates over the option keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no option is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for OptionChanges {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut changes = Self::new();
        for (k, v) in iter {
            changes.insert(k, v);
        }
        changes
    }
}

/// Command message: `{"opt": [..], "p": [..], "t": "cmd", "sub": mac}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandMessage {
    opt: Vec<String>,
    p: Vec<i64>,
    t: &'static str,
    sub: String,
}

impl CommandMessage {
    /// Encodes `changes` for the device identified by `mac`.
    ///
    /// `opt` and `p` follow the order of `changes` and always have the same
    /// length.
    ///
    /// # Examples
    ///
    /// ```
    /// use gree_climate::command::{CommandMessage, OptionChanges};
    ///
    /// let changes = OptionChanges::new().with("SetTem", 24).with("Add0.1", 5);
    /// let msg = CommandMessage::encode(&changes, "f4911e000001");
    /// assert_eq!(msg.options(), ["SetTem", "Add0.1"]);
    /// assert_eq!(msg.values(), [24, 5]);
    /// ```
    #[must_use]
    pub fn encode(changes: &OptionChanges, mac: &str) -> Self {
        let (opt, p) = changes.iter().map(|(k, v)| (k.to_string(), v)).unzip();
        Self {
            opt,
            p,
            t: "cmd",
            sub: mac.to_string(),
        }
    }

    /// Option keys, in order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.opt
    }

    /// Option values, parallel to [`options`](Self::options).
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.p
    }

    /// Target device MAC.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.sub
    }
}

/// Status request: `{"cols": [..], "mac": mac, "t": "status"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRequest {
    cols: Vec<String>,
    mac: String,
    t: &'static str,
}

impl StatusRequest {
    /// Creates a request for the fixed [`STATUS_COLUMNS`].
    #[must_use]
    pub fn new(mac: &str) -> Self {
        Self {
            cols: STATUS_COLUMNS.iter().map(ToString::to_string).collect(),
            mac: mac.to_string(),
            t: "status",
        }
    }

    /// Requested option keys.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.cols
    }

    /// Target device MAC.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.mac
    }
}

/// Any message passed to [`Bridge::sync_status`](crate::protocol::Bridge::sync_status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Option change command.
    Command(CommandMessage),
    /// Status query.
    StatusRequest(StatusRequest),
}

impl OutboundMessage {
    /// Target device MAC.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Command(cmd) => cmd.target(),
            Self::StatusRequest(req) => req.target(),
        }
    }

    /// Returns the command, if this is one.
    #[must_use]
    pub fn as_command(&self) -> Option<&CommandMessage> {
        match self {
            Self::Command(cmd) => Some(cmd),
            Self::StatusRequest(_) => None,
        }
    }

    /// Serializes the message to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<CommandMessage> for OutboundMessage {
    fn from(cmd: CommandMessage) -> Self {
        Self::Command(cmd)
    }
}

impl From<StatusRequest> for OutboundMessage {
    fn from(req: StatusRequest) -> Self {
        Self::StatusRequest(req)
    }
}
