// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel-backed bridge.

use tokio::sync::mpsc;

use crate::command::OutboundMessage;
use crate::error::ProtocolError;

use super::Bridge;

/// Bridge that enqueues outbound messages on an unbounded tokio channel.
///
/// The transport owns the receiving half and forwards each message to the
/// unit. Sending never blocks, so host setters stay fire-and-forget.
///
/// # Examples
///
/// ```
/// use gree_climate::command::{OutboundMessage, StatusRequest};
/// use gree_climate::protocol::{Bridge, ChannelBridge};
///
/// let (bridge, mut rx) = ChannelBridge::new();
/// bridge.sync_status(StatusRequest::new("f4911e000001").into()).unwrap();
///
/// let msg = rx.try_recv().unwrap();
/// assert_eq!(msg.target(), "f4911e000001");
/// ```
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    sender: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelBridge {
    /// Creates a bridge and the receiver the transport should drain.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Returns `true` if the transport dropped its receiver.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Bridge for ChannelBridge {
    fn sync_status(&self, message: OutboundMessage) -> Result<(), ProtocolError> {
        tracing::trace!(target_mac = %message.target(), "Enqueueing message for bridge");
        self.sender
            .send(message)
            .map_err(|e| ProtocolError::ChannelClosed(format!("bridge receiver dropped: {e}")))
    }
}
