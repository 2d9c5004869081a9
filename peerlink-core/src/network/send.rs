// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Send Semantics
//!
//! Outbound sends span two axes:
//!
//! ```text
//!               bundled            immediate
//! reliable      RELIABLE           RELIABLE | NO_NAGLE
//! unreliable    UNRELIABLE         UNRELIABLE | NO_NAGLE
//! ```
//!
//! Transports translate a [`SendType`] into their own reliable/unreliable and
//! batched/unbatched primitives through [`SendType::delivery`] and
//! [`SendType::urgency`].

use bitflags::bitflags;

bitflags! {
    /// Flags describing how a payload is sent.
    ///
    /// - `UNRELIABLE`: best-effort, no ordering
    /// - `NO_NAGLE`: skip batching, dispatch as soon as possible
    /// - `NO_DELAY`: skip batching; the transport may drop rather than queue
    /// - `RELIABLE`: guaranteed, in-order delivery; wins over `UNRELIABLE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SendType: u8 {
        const UNRELIABLE = 1 << 0;
        const NO_NAGLE = 1 << 1;
        const NO_DELAY = 1 << 2;
        const RELIABLE = 1 << 3;
    }
}

/// Delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Guaranteed, in-order.
    Reliable,
    /// Best-effort, unordered.
    Unreliable,
}

/// Whether a send may be batched with others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// May wait to be combined with other sends.
    Bundled,
    /// Bypasses batching.
    Immediate,
}

impl SendType {
    /// `RELIABLE` takes precedence; anything else is unreliable.
    pub fn delivery(self) -> Delivery {
        if self.contains(SendType::RELIABLE) {
            Delivery::Reliable
        } else {
            Delivery::Unreliable
        }
    }

    pub fn urgency(self) -> Urgency {
        if self.intersects(SendType::NO_NAGLE | SendType::NO_DELAY) {
            Urgency::Immediate
        } else {
            Urgency::Bundled
        }
    }

    pub fn is_reliable(self) -> bool {
        self.delivery() == Delivery::Reliable
    }

    pub fn is_immediate(self) -> bool {
        self.urgency() == Urgency::Immediate
    }
}

/// The four named send operations of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendKind {
    Reliable,
    ReliableImmediate,
    Unreliable,
    UnreliableImmediate,
}

impl SendKind {
    pub const ALL: [SendKind; 4] = [
        SendKind::Reliable,
        SendKind::ReliableImmediate,
        SendKind::Unreliable,
        SendKind::UnreliableImmediate,
    ];

    pub fn send_type(self) -> SendType {
        match self {
            SendKind::Reliable => SendType::RELIABLE,
            SendKind::ReliableImmediate => SendType::RELIABLE | SendType::NO_NAGLE,
            SendKind::Unreliable => SendType::UNRELIABLE,
            SendKind::UnreliableImmediate => SendType::UNRELIABLE | SendType::NO_NAGLE,
        }
    }

    pub fn delivery(self) -> Delivery {
        self.send_type().delivery()
    }

    pub fn urgency(self) -> Urgency {
        self.send_type().urgency()
    }
}

impl From<SendType> for SendKind {
    /// Collapses an arbitrary flag set onto the nearest named operation.
    fn from(send_type: SendType) -> Self {
        match (send_type.delivery(), send_type.urgency()) {
            (Delivery::Reliable, Urgency::Bundled) => SendKind::Reliable,
            (Delivery::Reliable, Urgency::Immediate) => SendKind::ReliableImmediate,
            (Delivery::Unreliable, Urgency::Bundled) => SendKind::Unreliable,
            (Delivery::Unreliable, Urgency::Immediate) => SendKind::UnreliableImmediate,
        }
    }
}

impl From<SendKind> for SendType {
    fn from(kind: SendKind) -> Self {
        kind.send_type()
    }
}
