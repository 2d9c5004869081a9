// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Connection Layer
//!
//! Transport-agnostic bookkeeping for peer connections.
//!
//! # Architecture
//!
//! The network layer consists of:
//! - **Identities**: process-local [`ConnectionId`]s and remote [`PeerIdentity`] descriptors
//! - **Registry**: bidirectional `ConnectionId` ↔ transport handle table
//! - **Protocol**: versioned handshake preamble and size limits
//! - **Connection trait**: kill plus reliable/unreliable × bundled/immediate sends
//! - **Client session**: per-connection state machine fed by transport callbacks
//! - **Connection manager**: one session per live handle, sends addressed by identity
//! - **Message router**: ordered `{predicate, handler}` table for inbound payloads
//!
//! # Example
//!
//! ```ignore
//! use peerlink_core::network::*;
//!
//! let router = Arc::new(MessageRouter::new());
//! let mut manager = ConnectionManager::new(SessionConfig::default(), router);
//!
//! // Transport callbacks
//! manager.begin(Arc::new(MockConnection::new(7)))?;
//! manager.connected(&7)?;
//! manager.message(&7, b"\x01payload", 1, 0, 0);
//! manager.disconnected(&7)?;
//! ```

mod connection;
mod error;
mod handle;
mod identity;
mod message;
mod mock;
mod protocol;
mod registry;
mod router;
mod send;
mod session;
mod transport;

// Error types
pub use error::{HandshakeError, NetworkError, NetworkResult, RegistryError};

// Identities
pub use identity::{
    AddressOnlyResolver, ConnectionId, IdentityResolver, PeerIdentity, IRRELEVANT_ADDRESS,
};

// Registry
pub use registry::{ConnectionRegistry, SharedRegistry};

// Protocol
pub use protocol::{
    handshake_bytes, Handshake, HANDSHAKE_PREAMBLE, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
    VERSION_FIELD_SIZE,
};

// Connection contract and send semantics
pub use handle::Connection;
pub use send::{Delivery, SendKind, SendType, Urgency};

// Transport boundary
pub use transport::{
    ConnectionState, Microseconds, SessionConfig, TransportEvents, TransportResult,
    ENV_JOIN_CODE, ENV_MAX_MESSAGE_SIZE, ENV_REQUIRE_HANDSHAKE,
};

// Messages
pub use message::{InboundMessage, MessageKind, MessageSource};

// Sessions
pub use connection::ConnectionManager;
pub use session::{ClientSession, HandshakeState, SessionOwner};

// Dispatch
pub use router::{
    CallbackListener, ConnectionEvent, LifecycleListener, MessageHandler, MessageRouter,
};

// Mock connection for testing
pub use mock::{MockConnection, SentMessage};
