// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handshake Protocol
//!
//! Every connection opens with `UTF8(preamble) || i32_le(version)` before any
//! application payload is trusted. The receiving side rejects anything that
//! does not match byte-for-byte.

use once_cell::sync::Lazy;

use super::error::HandshakeError;

/// Preamble identifying the protocol family.
pub const HANDSHAKE_PREAMBLE: &str = "PEERLINK";

/// Wire protocol version. Peers must match exactly.
pub const PROTOCOL_VERSION: i32 = 1;

/// Size of the version field following the preamble.
pub const VERSION_FIELD_SIZE: usize = 4;

/// Largest payload a transport will hand to a session (512 KiB).
pub const MAX_MESSAGE_SIZE: usize = 512 * 1024;

static HANDSHAKE_BYTES: Lazy<Vec<u8>> = Lazy::new(|| Handshake::current().encode());

/// The encoded handshake for this build.
///
/// Computed on first use and immutable afterwards.
pub fn handshake_bytes() -> &'static [u8] {
    &HANDSHAKE_BYTES
}

/// A handshake: protocol family preamble plus version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    preamble: String,
    version: i32,
}

impl Handshake {
    pub fn new(preamble: impl Into<String>, version: i32) -> Self {
        Handshake {
            preamble: preamble.into(),
            version,
        }
    }

    /// The handshake this build speaks.
    pub fn current() -> Self {
        Self::new(HANDSHAKE_PREAMBLE, PROTOCOL_VERSION)
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        self.preamble.len() + VERSION_FIELD_SIZE
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(self.preamble.as_bytes());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Validates received bytes against [`Handshake::current`].
    pub fn validate(received: &[u8]) -> Result<(), HandshakeError> {
        Self::current().validate_against(received)
    }

    /// Validates received bytes against this handshake.
    ///
    /// The preamble is compared first, then the version for exact equality.
    pub fn validate_against(&self, received: &[u8]) -> Result<(), HandshakeError> {
        let expected_len = self.encoded_len();
        if received.len() < expected_len {
            return Err(HandshakeError::Truncated {
                len: received.len(),
            });
        }

        let (preamble, rest) = received.split_at(self.preamble.len());
        if preamble != self.preamble.as_bytes() {
            return Err(HandshakeError::PreambleMismatch);
        }

        let (version_bytes, trailing) = rest.split_at(VERSION_FIELD_SIZE);
        let mut version = [0u8; VERSION_FIELD_SIZE];
        version.copy_from_slice(version_bytes);
        let received_version = i32::from_le_bytes(version);
        if received_version != self.version {
            return Err(HandshakeError::VersionMismatch {
                expected: self.version,
                received: received_version,
            });
        }

        if !trailing.is_empty() {
            return Err(HandshakeError::TrailingBytes {
                extra: trailing.len(),
            });
        }

        Ok(())
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::current()
    }
}
