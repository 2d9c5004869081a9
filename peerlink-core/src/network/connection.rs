// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Manager
//!
//! Host-side multiplexer: one [`ClientSession`] per live transport handle,
//! transport events routed by handle, outbound sends addressed by
//! [`ConnectionId`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{NetworkError, NetworkResult};
use super::handle::Connection;
use super::identity::ConnectionId;
use super::registry::{ConnectionRegistry, SharedRegistry};
use super::send::SendType;
use super::session::{ClientSession, SessionOwner};
use super::transport::{ConnectionState, Microseconds, SessionConfig, TransportEvents};

/// Connection manager owning every live session of a host.
///
/// # Example
///
/// ```ignore
/// use peerlink_core::network::{ConnectionManager, MessageRouter, MockConnection, SessionConfig};
///
/// let router = Arc::new(MessageRouter::new());
/// let mut manager = ConnectionManager::new(SessionConfig::default(), router);
///
/// let conn = Arc::new(MockConnection::new(42));
/// manager.begin(conn)?;
/// manager.connected(&42)?;
/// let id = manager.registry().lock().identity_for(&42)?;
/// manager.send(id, b"hello", SendType::RELIABLE)?;
/// ```
pub struct ConnectionManager<C: Connection> {
    registry: SharedRegistry<C::Handle>,
    owner: Arc<dyn SessionOwner<C::Handle>>,
    config: SessionConfig,
    sessions: HashMap<C::Handle, ClientSession<C>>,
}

impl<C: Connection> ConnectionManager<C> {
    /// Creates a manager with a fresh registry.
    pub fn new(config: SessionConfig, owner: Arc<dyn SessionOwner<C::Handle>>) -> Self {
        Self::with_registry(ConnectionRegistry::shared(), config, owner)
    }

    /// Creates a manager on an existing registry.
    pub fn with_registry(
        registry: SharedRegistry<C::Handle>,
        config: SessionConfig,
        owner: Arc<dyn SessionOwner<C::Handle>>,
    ) -> Self {
        ConnectionManager {
            registry,
            owner,
            config,
            sessions: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &SharedRegistry<C::Handle> {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Stores the opaque join code used to establish connections out of band.
    ///
    /// Sessions never read it; the host and its transport fetch it through
    /// [`ConnectionManager::join_code`].
    pub fn set_join_code(&mut self, join_code: impl Into<String>) {
        let join_code = join_code.into();
        info!("Join code set ({} chars)", join_code.len());
        self.config.join_code = Some(join_code);
    }

    pub fn join_code(&self) -> Option<&str> {
        self.config.join_code.as_deref()
    }

    /// Starts a session for a connection the transport is establishing.
    pub fn begin(&mut self, connection: Arc<C>) -> NetworkResult<()> {
        let handle = connection.handle();
        if self.sessions.contains_key(&handle) {
            return Err(NetworkError::DuplicateSession(format!("{:?}", handle)));
        }

        let mut session = ClientSession::new(
            connection,
            Arc::clone(&self.registry),
            Arc::clone(&self.owner),
            self.config.clone(),
        );
        session.on_connecting()?;
        self.sessions.insert(handle, session);
        Ok(())
    }

    pub fn verify_handshake(&mut self, handle: &C::Handle, received: &[u8]) -> NetworkResult<()> {
        self.session_mut(handle)?.verify_handshake(received)
    }

    pub fn connected(&mut self, handle: &C::Handle) -> NetworkResult<()> {
        match self.sessions.get_mut(handle) {
            Some(session) => session.on_connected(),
            None => {
                warn!("Connected event for unknown handle {:?}", handle);
                Ok(())
            }
        }
    }

    /// Tears down the session for `handle`.
    ///
    /// Late or duplicate notifications are no-ops.
    pub fn disconnected(&mut self, handle: &C::Handle) -> NetworkResult<()> {
        let Some(mut session) = self.sessions.remove(handle) else {
            debug!("Disconnect for unknown handle {:?}", handle);
            return Ok(());
        };

        let result = session.on_disconnected();
        if !session.state().is_terminal() {
            self.sessions.insert(handle.clone(), session);
        }
        result
    }

    pub fn message(
        &mut self,
        handle: &C::Handle,
        data: &[u8],
        message_number: i64,
        received_at: Microseconds,
        channel: i32,
    ) {
        match self.sessions.get_mut(handle) {
            Some(session) => session.on_message(data, message_number, received_at, channel),
            None => warn!("Dropping message for unknown handle {:?}", handle),
        }
    }

    /// Registers a one-shot observer for the end of the session on `handle`.
    pub fn on_fully_disconnected<F>(&mut self, handle: &C::Handle, observer: F) -> NetworkResult<()>
    where
        F: FnOnce(&C::Handle) + Send + 'static,
    {
        self.session_mut(handle)?.on_fully_disconnected(observer);
        Ok(())
    }

    pub fn state(&self, handle: &C::Handle) -> Option<ConnectionState> {
        self.sessions.get(handle).map(|s| s.state())
    }

    pub fn session(&self, handle: &C::Handle) -> Option<&ClientSession<C>> {
        self.sessions.get(handle)
    }

    /// Connection registered under `id`.
    pub fn connection(&self, id: ConnectionId) -> Option<Arc<C>> {
        let handle = self.registry.lock().handle_for(id).ok().cloned()?;
        self.sessions
            .get(&handle)
            .map(|session| Arc::clone(session.connection()))
    }

    /// Sends `data` to the connection registered under `id`.
    pub fn send(&self, id: ConnectionId, data: &[u8], send_type: SendType) -> NetworkResult<()> {
        let connection = self
            .connection(id)
            .ok_or(NetworkError::UnknownConnection(id))?;
        connection.send(data, send_type)
    }

    /// Kills the connection registered under `id`.
    ///
    /// The session ends when the transport reports the disconnect.
    pub fn kill(&self, id: ConnectionId) -> NetworkResult<()> {
        let connection = self
            .connection(id)
            .ok_or(NetworkError::UnknownConnection(id))?;
        connection.kill_connection();
        Ok(())
    }

    /// Identities of every registered connection, ascending.
    pub fn active_connections(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<_> = self.registry.lock().iter().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }

    /// Number of sessions not yet torn down.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn session_mut(&mut self, handle: &C::Handle) -> NetworkResult<&mut ClientSession<C>> {
        self.sessions
            .get_mut(handle)
            .ok_or_else(|| NetworkError::UnknownHandle(format!("{:?}", handle)))
    }
}
