// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client Session State Machine
//!
//! Drives one connection from transport callbacks:
//!
//! ```text
//! NotStarted --connecting--> Connecting
//! Connecting --connected---> Connected      register, notify owner
//! Connecting --disconnected-> Disconnected  nothing registered
//! Connected  --disconnected-> Disconnected  unregister, notify owner
//! ```
//!
//! Any other event is undefined transport input: logged and ignored.
//! A rejected handshake is final; `connected` no longer registers.

use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use super::error::{NetworkError, NetworkResult};
use super::handle::Connection;
use super::identity::ConnectionId;
use super::message::{InboundMessage, MessageSource};
use super::protocol::Handshake;
use super::registry::SharedRegistry;
use super::transport::{ConnectionState, Microseconds, SessionConfig, TransportEvents};

/// Receives what sessions learn about their connections.
///
/// Called synchronously from inside the transport callback. Owners are shared
/// between sessions and must use interior mutability.
pub trait SessionOwner<H>: Send + Sync {
    /// The connection is registered under `id`.
    fn on_connected(&self, id: ConnectionId, handle: &H);

    /// The connection is gone.
    ///
    /// May arrive for a handle that never reached `on_connected`, when the
    /// connection failed before registration.
    fn on_disconnected(&self, handle: &H);

    /// A message arrived. `source` carries the connection, so the owner can
    /// reply to or kill the peer from inside the callback.
    fn on_message(&self, source: MessageSource<'_, H>, message: InboundMessage<'_>);
}

/// Outcome of the peer's handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandshakeState {
    /// No handshake checked yet.
    #[default]
    Pending,
    /// The peer sent our preamble and version.
    Verified,
    /// The peer sent something else. Final: the connection is never registered.
    Rejected,
}

type DisconnectObserver<H> = Box<dyn FnOnce(&H) + Send>;

/// Per-connection controller.
///
/// Owns the state machine for one physical connection. A reconnect needs a
/// fresh session and receives a fresh [`ConnectionId`].
pub struct ClientSession<C: Connection> {
    connection: Arc<C>,
    handle: C::Handle,
    state: ConnectionState,
    registry: SharedRegistry<C::Handle>,
    owner: Arc<dyn SessionOwner<C::Handle>>,
    config: SessionConfig,
    connection_id: Option<ConnectionId>,
    handshake: HandshakeState,
    last_message_number: Option<i64>,
    dropped_messages: u64,
    disconnect_observers: Vec<DisconnectObserver<C::Handle>>,
}

impl<C: Connection> ClientSession<C> {
    pub fn new(
        connection: Arc<C>,
        registry: SharedRegistry<C::Handle>,
        owner: Arc<dyn SessionOwner<C::Handle>>,
        config: SessionConfig,
    ) -> Self {
        let handle = connection.handle();
        ClientSession {
            connection,
            handle,
            state: ConnectionState::NotStarted,
            registry,
            owner,
            config,
            connection_id: None,
            handshake: HandshakeState::Pending,
            last_message_number: None,
            dropped_messages: 0,
            disconnect_observers: Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Identity minted at registration. `None` before connecting and after
    /// teardown.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection_id
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    pub fn handle(&self) -> &C::Handle {
        &self.handle
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake
    }

    pub fn is_handshake_verified(&self) -> bool {
        self.handshake == HandshakeState::Verified
    }

    /// Inbound messages discarded by this session so far.
    pub fn dropped_messages(&self) -> u64 {
        self.dropped_messages
    }

    /// Registers a one-shot observer for the end of this session.
    ///
    /// Observers run once, when the session reaches `Disconnected`. If it
    /// already has, the observer runs immediately.
    pub fn on_fully_disconnected<F>(&mut self, observer: F)
    where
        F: FnOnce(&C::Handle) + Send + 'static,
    {
        if self.state.is_terminal() {
            observer(&self.handle);
        } else {
            self.disconnect_observers.push(Box::new(observer));
        }
    }

    /// Checks the peer's handshake while the connection is being set up.
    ///
    /// Only one handshake is checked per session. On mismatch the connection
    /// is killed and the session is marked rejected: it stays in `Connecting`
    /// until the transport reports the disconnect and is never registered.
    pub fn verify_handshake(&mut self, received: &[u8]) -> NetworkResult<()> {
        if self.state != ConnectionState::Connecting {
            return Err(NetworkError::InvalidState(format!(
                "handshake received in state {:?}",
                self.state
            )));
        }
        if self.handshake != HandshakeState::Pending {
            return Err(NetworkError::InvalidState(format!(
                "handshake already {:?}",
                self.handshake
            )));
        }

        match Handshake::validate(received) {
            Ok(()) => {
                debug!("Handshake verified for {:?}", self.handle);
                self.handshake = HandshakeState::Verified;
                Ok(())
            }
            Err(e) => {
                warn!("Rejecting {:?}: {}", self.handle, e);
                self.handshake = HandshakeState::Rejected;
                self.connection.kill_connection();
                Err(e.into())
            }
        }
    }

    fn ignore_transition(&self, event: &str) {
        warn!(
            "Ignoring {} for {:?} in state {:?}",
            event, self.handle, self.state
        );
    }

    fn finish(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.connection_id = None;
        self.owner.on_disconnected(&self.handle);

        for observer in std::mem::take(&mut self.disconnect_observers) {
            observer(&self.handle);
        }
    }
}

impl<C: Connection> TransportEvents for ClientSession<C> {
    fn on_connecting(&mut self) -> NetworkResult<()> {
        if self.state != ConnectionState::NotStarted {
            self.ignore_transition("connecting");
            return Ok(());
        }

        debug!("Connecting {:?} ({:?})", self.handle, self.connection.identity());
        self.state = ConnectionState::Connecting;
        Ok(())
    }

    fn on_connected(&mut self) -> NetworkResult<()> {
        if self.state != ConnectionState::Connecting {
            self.ignore_transition("connected");
            return Ok(());
        }

        match self.handshake {
            HandshakeState::Rejected => {
                warn!("Not registering {:?}: handshake was rejected", self.handle);
                return Ok(());
            }
            HandshakeState::Pending if self.config.require_handshake => {
                warn!("Rejecting {:?}: connected without handshake", self.handle);
                self.handshake = HandshakeState::Rejected;
                self.connection.kill_connection();
                return Ok(());
            }
            HandshakeState::Pending | HandshakeState::Verified => {}
        }

        let registered = self.registry.lock().register(self.handle.clone());
        let id = registered.map_err(|e| {
            error!("Failed to register {:?}: {}", self.handle, e);
            e
        })?;

        debug!("Connected {:?} as {}", self.handle, id);
        self.state = ConnectionState::Connected;
        self.connection_id = Some(id);
        self.owner.on_connected(id, &self.handle);
        Ok(())
    }

    fn on_disconnected(&mut self) -> NetworkResult<()> {
        match self.state {
            ConnectionState::Connecting => {
                debug!("{:?} failed before registration", self.handle);
                self.finish();
                Ok(())
            }
            ConnectionState::Connected => {
                let unregistered = {
                    let mut registry = self.registry.lock();
                    if registry.has_identity_for(&self.handle) {
                        registry.unregister(&self.handle).map(Some)
                    } else {
                        Ok(None)
                    }
                };

                debug!("Disconnected {:?}", self.handle);
                self.finish();

                match unregistered {
                    Ok(_) => Ok(()),
                    Err(e) => {
                        error!("Failed to unregister {:?}: {}", self.handle, e);
                        Err(e.into())
                    }
                }
            }
            ConnectionState::NotStarted | ConnectionState::Disconnected => {
                self.ignore_transition("disconnected");
                Ok(())
            }
        }
    }

    fn on_message(
        &mut self,
        data: &[u8],
        message_number: i64,
        received_at: Microseconds,
        channel: i32,
    ) {
        let registered = match self.state {
            ConnectionState::Connected => self.connection_id,
            _ => None,
        };
        let Some(id) = registered else {
            warn!(
                "Dropping message {} from {:?} in state {:?}",
                message_number, self.handle, self.state
            );
            self.dropped_messages += 1;
            return;
        };

        if data.len() > self.config.max_message_size {
            warn!(
                "Dropping oversized message {} from {:?}: {} > {} bytes",
                message_number,
                self.handle,
                data.len(),
                self.config.max_message_size
            );
            self.dropped_messages += 1;
            return;
        }

        if let Some(last) = self.last_message_number {
            if message_number <= last {
                warn!(
                    "Message {} from {:?} does not follow {}",
                    message_number, self.handle, last
                );
            }
        }
        self.last_message_number = Some(message_number);

        trace!(
            "Message {} from {:?} on channel {}: {} bytes",
            message_number,
            self.handle,
            channel,
            data.len()
        );
        let source = MessageSource {
            id,
            handle: &self.handle,
            connection: &*self.connection,
        };
        self.owner
            .on_message(source, InboundMessage::new(data, message_number, received_at));
    }
}
