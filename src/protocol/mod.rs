// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge seam and inbound packet decoding.
//!
//! The transport that talks to the physical unit is an external
//! collaborator. This library only needs it to accept outbound messages
//! through [`Bridge::sync_status`] and to push inbound packets back, which
//! it does by feeding [`InboundPacket`]s to a
//! [`DeviceManager`](crate::manager::DeviceManager) or directly to a
//! [`ClimateDevice`](crate::ClimateDevice).
//!
//! # Bridges
//!
//! - [`ChannelBridge`]: enqueues every message on a tokio channel for a
//!   transport task to drain

mod channel;
mod packet;

pub use channel::ChannelBridge;
pub use packet::{DecodedOptions, InboundPacket, ResponsePacket, StatusPacket, decode_options};

use crate::command::OutboundMessage;
use crate::error::ProtocolError;

/// Trait for transports that deliver messages to the air conditioner.
///
/// Implementations must not block: the call enqueues the message and
/// returns. Delivery is not acknowledged here; the device reports the
/// result later through a response or status packet.
///
/// Commands are handed over while the device lock is held. An
/// implementation must not feed packets back into the sending device from
/// inside `sync_status`.
pub trait Bridge: Send + Sync {
    /// Hands a status request or command to the transport.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message cannot be enqueued.
    fn sync_status(&self, message: OutboundMessage) -> Result<(), ProtocolError>;
}

impl<B: Bridge + ?Sized> Bridge for std::sync::Arc<B> {
    fn sync_status(&self, message: OutboundMessage) -> Result<(), ProtocolError> {
        (**self).sync_status(message)
    }
}
