// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Connection
//!
//! In-memory [`Connection`] for tests and loopback hosts. Models the two send
//! axes: bundled sends wait in a pending batch until [`MockConnection::flush`],
//! immediate sends go straight to the wire.

use parking_lot::Mutex;

use super::error::NetworkError;
use super::handle::Connection;
use super::identity::{IdentityResolver, PeerIdentity};
use super::send::SendType;
use super::transport::TransportResult;

/// A payload as handed to [`Connection::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub data: Vec<u8>,
    pub send_type: SendType,
}

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<SentMessage>,
    pending: Vec<SentMessage>,
    wire: Vec<SentMessage>,
    killed: bool,
    kill_count: u32,
    next_error: Option<NetworkError>,
}

/// Mock connection keyed by a `u64` handle.
#[derive(Debug)]
pub struct MockConnection {
    handle: u64,
    identity: PeerIdentity,
    state: Mutex<MockState>,
}

impl MockConnection {
    /// Creates a connection whose peer identity does not matter.
    pub fn new(handle: u64) -> Self {
        Self::with_identity(handle, PeerIdentity::irrelevant())
    }

    pub fn with_identity(handle: u64, identity: PeerIdentity) -> Self {
        MockConnection {
            handle,
            identity,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Creates a connection whose identity comes from `resolver`.
    pub fn resolved(
        handle: u64,
        resolver: &dyn IdentityResolver,
        raw_account_id: u64,
        address: &str,
    ) -> Self {
        Self::with_identity(handle, resolver.resolve(raw_account_id, address))
    }

    /// Makes the next send fail with `error`.
    pub fn inject_error(&self, error: NetworkError) {
        self.state.lock().next_error = Some(error);
    }

    /// Every accepted send, in call order.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.lock().sent.clone()
    }

    /// Messages that left the connection, in wire order.
    pub fn wire(&self) -> Vec<SentMessage> {
        self.state.lock().wire.clone()
    }

    /// Number of bundled sends not yet on the wire.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Puts every pending bundled send on the wire.
    pub fn flush(&self) {
        let mut state = self.state.lock();
        let pending = std::mem::take(&mut state.pending);
        state.wire.extend(pending);
    }

    pub fn is_killed(&self) -> bool {
        self.state.lock().killed
    }

    /// How many times a kill was requested, including no-op repeats.
    pub fn kill_count(&self) -> u32 {
        self.state.lock().kill_count
    }
}

impl Connection for MockConnection {
    type Handle = u64;

    fn handle(&self) -> u64 {
        self.handle
    }

    fn identity(&self) -> &PeerIdentity {
        &self.identity
    }

    fn kill_connection(&self) {
        let mut state = self.state.lock();
        state.kill_count += 1;
        if !state.killed {
            state.killed = true;
            // Unsent batches die with the connection.
            state.pending.clear();
        }
    }

    fn send(&self, data: &[u8], send_type: SendType) -> TransportResult<()> {
        let mut state = self.state.lock();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if state.killed {
            return Err(NetworkError::ConnectionClosed);
        }

        let message = SentMessage {
            data: data.to_vec(),
            send_type,
        };
        state.sent.push(message.clone());

        if !send_type.is_immediate() {
            state.pending.push(message);
            return Ok(());
        }

        if send_type.is_reliable() {
            // Reliable order holds across the bundled/immediate boundary.
            let (reliable, unreliable): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
                .into_iter()
                .partition(|m| m.send_type.is_reliable());
            state.pending = unreliable;
            state.wire.extend(reliable);
        }
        state.wire.push(message);
        Ok(())
    }
}
