// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Handle Contract
//!
//! Capability surface every concrete connection implements, whatever
//! transport backs it.

use std::fmt::Debug;
use std::hash::Hash;

use super::identity::PeerIdentity;
use super::send::{SendKind, SendType};
use super::transport::TransportResult;

/// A live transport connection.
///
/// Implementations are shared between the session and the host, so every
/// method takes `&self`.
///
/// # Example
///
/// ```ignore
/// use peerlink_core::network::{Connection, MockConnection, SendType};
///
/// let conn = MockConnection::new(1);
/// conn.send_reliable(b"hello")?;
/// conn.send(b"", SendType::UNRELIABLE | SendType::NO_NAGLE)?;
/// conn.kill_connection();
/// ```
pub trait Connection: Send + Sync {
    /// Key the transport uses for this connection.
    type Handle: Clone + Eq + Hash + Debug + Send + Sync;

    fn handle(&self) -> Self::Handle;

    /// Remote peer. Fixed for the lifetime of the connection.
    fn identity(&self) -> &PeerIdentity;

    /// Forcibly terminates the connection.
    ///
    /// Killing an already-dead connection is a no-op.
    fn kill_connection(&self);

    /// Sends `data` with the given semantics.
    ///
    /// Zero-length payloads must go out as zero-length messages.
    fn send(&self, data: &[u8], send_type: SendType) -> TransportResult<()>;

    /// Guaranteed, in-order; may be batched.
    fn send_reliable(&self, data: &[u8]) -> TransportResult<()> {
        self.send(data, SendKind::Reliable.send_type())
    }

    /// Guaranteed, in-order; bypasses batching.
    fn send_reliable_immediate(&self, data: &[u8]) -> TransportResult<()> {
        self.send(data, SendKind::ReliableImmediate.send_type())
    }

    /// Best-effort; may be batched.
    fn send_unreliable(&self, data: &[u8]) -> TransportResult<()> {
        self.send(data, SendKind::Unreliable.send_type())
    }

    /// Best-effort; bypasses batching.
    fn send_unreliable_immediate(&self, data: &[u8]) -> TransportResult<()> {
        self.send(data, SendKind::UnreliableImmediate.send_type())
    }
}
