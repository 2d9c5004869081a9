// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection and Peer Identities
//!
//! Two notions of "who" live here:
//! - [`ConnectionId`]: the process-local handle the registry mints for one
//!   logical connection. Upper layers address connections by this value and
//!   never hold transport objects.
//! - [`PeerIdentity`]: who the remote end claims to be, either a verified
//!   platform account or a bare network address.

use std::fmt;
use std::num::NonZeroU64;

/// Logical identity of one registered connection.
///
/// Issued sequentially from 1 by [`ConnectionRegistry`](super::ConnectionRegistry).
/// Zero is reserved and cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(NonZeroU64);

impl ConnectionId {
    /// Wraps a raw value, returning `None` for the reserved zero value.
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(ConnectionId)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Address used by [`PeerIdentity::irrelevant`].
pub const IRRELEVANT_ADDRESS: &str = "irrelevant";

/// Describes the remote peer of a connection.
///
/// A non-zero `account_id` means the identity provider verified the peer;
/// otherwise only the network address is known.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PeerIdentity {
    account_id: u64,
    address: String,
}

impl PeerIdentity {
    /// A peer verified by the identity provider.
    pub fn authenticated(account_id: u64, address: impl Into<String>) -> Self {
        PeerIdentity {
            account_id,
            address: address.into(),
        }
    }

    /// A peer that is not on the platform; only its address is known.
    pub fn not_on_platform(address: impl Into<String>) -> Self {
        PeerIdentity {
            account_id: 0,
            address: address.into(),
        }
    }

    /// Placeholder for synthetic or loopback connections where identity
    /// does not matter.
    pub fn irrelevant() -> Self {
        Self::not_on_platform(IRRELEVANT_ADDRESS)
    }

    /// Platform account id, or 0 when unauthenticated.
    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// True iff the account id is non-zero.
    pub fn is_authenticated(&self) -> bool {
        self.account_id != 0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_authenticated() {
            write!(f, "{}", self.account_id)
        } else {
            f.write_str(&self.address)
        }
    }
}

impl fmt::Debug for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_authenticated() {
            write!(f, "Identity::[{}]", self.account_id)
        } else {
            write!(f, "Address::[{}]", self.address)
        }
    }
}

/// Interface to the external identity provider.
///
/// Turns the raw account id and address a transport reports into a
/// [`PeerIdentity`]. Verification is entirely the provider's concern.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, raw_account_id: u64, address: &str) -> PeerIdentity;
}

/// Resolver that never verifies anyone.
///
/// Every peer is reported by address, whatever account id the transport
/// claimed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressOnlyResolver;

impl IdentityResolver for AddressOnlyResolver {
    fn resolve(&self, _raw_account_id: u64, address: &str) -> PeerIdentity {
        PeerIdentity::not_on_platform(address)
    }
}
