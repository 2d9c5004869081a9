// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Helpers
//!
//! Recording session owner, session fixtures and log setup.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use peerlink_core::network::*;

/// Installs a test-friendly tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Everything a session told its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerEvent {
    Connected(ConnectionId, u64),
    Disconnected(u64),
    Message {
        handle: u64,
        message_number: i64,
        received_at: Microseconds,
        payload: Vec<u8>,
    },
}

/// Session owner that records every callback.
#[derive(Debug, Default)]
pub struct RecordingOwner {
    events: Mutex<Vec<OwnerEvent>>,
}

impl RecordingOwner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<OwnerEvent> {
        self.events.lock().clone()
    }

    pub fn connected_count(&self) -> usize {
        self.count(|e| matches!(e, OwnerEvent::Connected(..)))
    }

    pub fn disconnected_count(&self) -> usize {
        self.count(|e| matches!(e, OwnerEvent::Disconnected(_)))
    }

    /// Payloads delivered, in order.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                OwnerEvent::Message { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&OwnerEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl SessionOwner<u64> for RecordingOwner {
    fn on_connected(&self, id: ConnectionId, handle: &u64) {
        self.events.lock().push(OwnerEvent::Connected(id, *handle));
    }

    fn on_disconnected(&self, handle: &u64) {
        self.events.lock().push(OwnerEvent::Disconnected(*handle));
    }

    fn on_message(&self, source: MessageSource<'_, u64>, message: InboundMessage<'_>) {
        self.events.lock().push(OwnerEvent::Message {
            handle: *source.handle,
            message_number: message.message_number,
            received_at: message.received_at,
            payload: message.payload.to_vec(),
        });
    }
}

/// A session over a mock connection, with its collaborators exposed.
pub struct SessionFixture {
    pub session: ClientSession<MockConnection>,
    pub connection: Arc<MockConnection>,
    pub owner: Arc<RecordingOwner>,
    pub registry: SharedRegistry<u64>,
}

impl SessionFixture {
    pub fn new(handle: u64) -> Self {
        Self::with_config(handle, SessionConfig::default())
    }

    pub fn with_config(handle: u64, config: SessionConfig) -> Self {
        Self::on_registry(handle, ConnectionRegistry::shared(), config)
    }

    pub fn on_registry(handle: u64, registry: SharedRegistry<u64>, config: SessionConfig) -> Self {
        init_tracing();
        let connection = Arc::new(MockConnection::new(handle));
        let owner = RecordingOwner::new();
        let session: ClientSession<MockConnection> = ClientSession::new(
            Arc::clone(&connection),
            Arc::clone(&registry),
            owner.clone(),
            config,
        );
        SessionFixture {
            session,
            connection,
            owner,
            registry,
        }
    }

    /// Drives the session through connecting and connected.
    pub fn connect(&mut self) -> ConnectionId {
        self.session.on_connecting().unwrap();
        self.session.on_connected().unwrap();
        self.session.connection_id().expect("session registered")
    }
}
