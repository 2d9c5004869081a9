// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Error Types

use thiserror::Error;

use super::identity::ConnectionId;

/// Errors raised by the connection registry.
///
/// These indicate a logic bug in the caller, never a remote-peer condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Handle already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Handle not registered: {0}")]
    NotRegistered(String),

    #[error("Unknown connection identity: {0}")]
    UnknownIdentity(ConnectionId),

    #[error("Connection identities exhausted")]
    IdentitiesExhausted,
}

/// Errors raised while validating a received handshake.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("Handshake truncated: {len} bytes")]
    Truncated { len: usize },

    #[error("Handshake preamble mismatch")]
    PreambleMismatch,

    #[error("Protocol version mismatch: expected {expected}, received {received}")]
    VersionMismatch { expected: i32, received: i32 },

    #[error("Handshake has {extra} trailing bytes")]
    TrailingBytes { extra: usize },
}

/// Network layer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Unknown transport handle: {0}")]
    UnknownHandle(String),

    #[error("Session already exists for handle: {0}")]
    DuplicateSession(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Handshake rejected: {0}")]
    Handshake(#[from] HandshakeError),
}

/// Result type for network layer operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
