// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Boundary
//!
//! What this layer consumes from a transport: lifecycle and message
//! callbacks ([`TransportEvents`]), plus the per-session configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{NetworkError, NetworkResult};
use super::protocol::MAX_MESSAGE_SIZE;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Transport timestamps, in microseconds.
pub type Microseconds = i64;

/// Environment variable overriding [`SessionConfig::max_message_size`].
pub const ENV_MAX_MESSAGE_SIZE: &str = "PEERLINK_MAX_MESSAGE_SIZE";
/// Environment variable overriding [`SessionConfig::require_handshake`].
pub const ENV_REQUIRE_HANDSHAKE: &str = "PEERLINK_REQUIRE_HANDSHAKE";
/// Environment variable providing [`SessionConfig::join_code`].
pub const ENV_JOIN_CODE: &str = "PEERLINK_JOIN_CODE";

/// Connection state of a client session.
///
/// Only moves forward; `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No transport event seen yet.
    #[default]
    NotStarted,
    /// Transport is establishing the connection.
    Connecting,
    /// Connected and registered.
    Connected,
    /// Torn down. A new connection needs a new session.
    Disconnected,
}

impl ConnectionState {
    /// Returns true once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Disconnected
    }
}

/// Configuration for client sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inbound messages larger than this are dropped.
    pub max_message_size: usize,
    /// Refuse to register a connection whose handshake was not verified.
    pub require_handshake: bool,
    /// Opaque out-of-band join code, passed through to the transport.
    pub join_code: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_message_size: MAX_MESSAGE_SIZE,
            require_handshake: false,
            join_code: None,
        }
    }
}

impl SessionConfig {
    /// Loads the configuration from `PEERLINK_*` environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SessionConfig::default();

        if let Some(raw) = lookup(ENV_MAX_MESSAGE_SIZE) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.max_message_size = size,
                _ => warn!("Ignoring invalid {}: {:?}", ENV_MAX_MESSAGE_SIZE, raw),
            }
        }

        if let Some(raw) = lookup(ENV_REQUIRE_HANDSHAKE) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.require_handshake = true,
                "0" | "false" | "no" => config.require_handshake = false,
                _ => warn!("Ignoring invalid {}: {:?}", ENV_REQUIRE_HANDSHAKE, raw),
            }
        }

        config.join_code = lookup(ENV_JOIN_CODE).filter(|code| !code.is_empty());
        config
    }

    /// Sets the inbound size limit. Zero would drop every non-empty message
    /// and is ignored, as in [`SessionConfig::from_lookup`].
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        if max_message_size > 0 {
            self.max_message_size = max_message_size;
        } else {
            warn!("Ignoring zero max message size");
        }
        self
    }

    pub fn with_join_code(mut self, join_code: impl Into<String>) -> Self {
        self.join_code = Some(join_code.into());
        self
    }

    pub fn requiring_handshake(mut self) -> Self {
        self.require_handshake = true;
        self
    }
}

/// Callbacks a transport adapter delivers for one connection.
///
/// Events for a connection must arrive in transport order:
/// connecting, connected, messages, disconnected. Only registry invariant
/// violations are returned as errors; transport conditions are absorbed.
pub trait TransportEvents {
    fn on_connecting(&mut self) -> NetworkResult<()>;

    fn on_connected(&mut self) -> NetworkResult<()>;

    fn on_disconnected(&mut self) -> NetworkResult<()>;

    /// A raw inbound message. `channel` is informational only.
    fn on_message(
        &mut self,
        data: &[u8],
        message_number: i64,
        received_at: Microseconds,
        channel: i32,
    );
}
