// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Registry
//!
//! Bidirectional table between [`ConnectionId`]s and transport handles.
//! Identities are minted from a monotonic counter and never recycled, so a
//! stale id can never alias a newer connection.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::RegistryError;
use super::identity::ConnectionId;

/// Registry shared between sessions of one host.
///
/// The registry itself does no locking; this mutex is the host's serialization
/// point when transport callbacks can arrive from several threads.
pub type SharedRegistry<H> = Arc<Mutex<ConnectionRegistry<H>>>;

/// In-memory, ephemeral mapping of identities to transport handles.
///
/// `by_id` and `by_handle` are exact inverses at all times. `next_id` is the
/// identity the next registration receives; 0 once the counter is spent.
#[derive(Debug)]
pub struct ConnectionRegistry<H> {
    by_id: HashMap<ConnectionId, H>,
    by_handle: HashMap<H, ConnectionId>,
    next_id: u64,
}

impl<H> ConnectionRegistry<H>
where
    H: Clone + Eq + Hash + Debug,
{
    /// Creates an empty registry. The first identity issued is 1.
    pub fn new() -> Self {
        ConnectionRegistry {
            by_id: HashMap::new(),
            by_handle: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates an empty registry behind the host lock.
    pub fn shared() -> SharedRegistry<H> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Mints the next identity and binds it to `handle`.
    pub fn register(&mut self, handle: H) -> Result<ConnectionId, RegistryError> {
        if self.by_handle.contains_key(&handle) {
            return Err(RegistryError::AlreadyRegistered(format!("{:?}", handle)));
        }

        let id = ConnectionId::from_raw(self.next_id).ok_or(RegistryError::IdentitiesExhausted)?;
        // Zero marks the counter as spent.
        self.next_id = self.next_id.checked_add(1).unwrap_or(0);

        self.by_id.insert(id, handle.clone());
        self.by_handle.insert(handle, id);
        Ok(id)
    }

    /// Removes both entries for `handle`, returning the identity it held.
    pub fn unregister(&mut self, handle: &H) -> Result<ConnectionId, RegistryError> {
        let id = self
            .by_handle
            .remove(handle)
            .ok_or_else(|| RegistryError::NotRegistered(format!("{:?}", handle)))?;
        self.by_id.remove(&id);
        Ok(id)
    }

    pub fn handle_for(&self, id: ConnectionId) -> Result<&H, RegistryError> {
        self.by_id
            .get(&id)
            .ok_or(RegistryError::UnknownIdentity(id))
    }

    pub fn identity_for(&self, handle: &H) -> Result<ConnectionId, RegistryError> {
        self.by_handle
            .get(handle)
            .copied()
            .ok_or_else(|| RegistryError::NotRegistered(format!("{:?}", handle)))
    }

    /// Non-failing existence check, used to guard unregistration.
    pub fn has_identity_for(&self, handle: &H) -> bool {
        self.by_handle.contains_key(handle)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over live `(identity, handle)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &H)> {
        self.by_id.iter().map(|(id, handle)| (*id, handle))
    }
}

impl<H> Default for ConnectionRegistry<H>
where
    H: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
