// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a managed air conditioner, derived from its MAC address.
///
/// The MAC is normalized to lowercase hex without separators, so
/// `"F4:91:1E:00:00:01"` and `"f4911e000001"` name the same unit.
///
/// # Examples
///
/// ```
/// use gree_climate::event::DeviceId;
///
/// let a = DeviceId::new("F4:91:1E:00:00:01");
/// let b = DeviceId::new("f4911e000001");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "f4911e000001");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates an identifier from a MAC address in any common notation.
    #[must_use]
    pub fn new(mac: &str) -> Self {
        Self(
            mac.trim()
                .chars()
                .filter(|c| !matches!(c, ':' | '-' | '.'))
                .map(|c| c.to_ascii_lowercase())
                .collect(),
        )
    }

    /// Returns the normalized MAC.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(mac: &str) -> Self {
        Self::new(mac)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
