// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inbound Message Types

use std::fmt;

use super::handle::Connection;
use super::identity::ConnectionId;
use super::transport::Microseconds;

/// Tag identifying what an inbound payload carries.
///
/// By convention the first payload byte; interpretation belongs to the
/// feature that registered a route for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKind(pub u8);

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind:{:#04x}", self.0)
    }
}

/// A message handed from a session to its owner.
///
/// Borrows the transport's buffer; owners copy what they keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundMessage<'a> {
    /// When the transport received the message.
    pub received_at: Microseconds,
    /// Per-connection sequence number, increasing.
    pub message_number: i64,
    /// Raw payload. Never longer than the session's size limit.
    pub payload: &'a [u8],
}

impl<'a> InboundMessage<'a> {
    pub fn new(payload: &'a [u8], message_number: i64, received_at: Microseconds) -> Self {
        InboundMessage {
            received_at,
            message_number,
            payload,
        }
    }

    /// First payload byte as a tag, `None` for an empty payload.
    pub fn kind(&self) -> Option<MessageKind> {
        self.payload.first().copied().map(MessageKind)
    }

    /// Payload after the kind tag.
    pub fn body(&self) -> &'a [u8] {
        self.payload.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// The registered connection a message arrived on.
///
/// Lets the receiver reply or kill the peer without going back through the
/// connection manager, which is busy delivering the message.
pub struct MessageSource<'a, H> {
    /// Identity the connection is registered under.
    pub id: ConnectionId,
    /// Transport handle.
    pub handle: &'a H,
    /// The connection itself.
    pub connection: &'a dyn Connection<Handle = H>,
}

impl<H> Clone for MessageSource<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for MessageSource<'_, H> {}

impl<H: Clone + Eq + std::hash::Hash + fmt::Debug + Send + Sync> fmt::Debug for MessageSource<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSource")
            .field("id", &self.id)
            .field("handle", self.handle)
            .field("peer", self.connection.identity())
            .finish()
    }
}
