// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Peerlink Core Library
//!
//! Transport-agnostic connection layer: stable connection identities, a
//! bidirectional connection registry, a versioned handshake, and a uniform
//! send/receive contract with explicit reliability and urgency.

pub mod network;

pub use network::{
    ClientSession, Connection, ConnectionId, ConnectionManager, ConnectionRegistry,
    ConnectionState, Handshake, InboundMessage, MessageRouter, MockConnection, NetworkError,
    PeerIdentity, SendType, SessionConfig, SessionOwner, TransportEvents,
};
