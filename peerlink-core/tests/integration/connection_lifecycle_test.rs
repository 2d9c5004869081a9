// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connection Lifecycle Integration Tests
//!
//! Handshake, registration, routing, addressed sends and reconnects through
//! the public manager API.

use std::sync::Arc;

use parking_lot::Mutex;
use peerlink_core::network::*;

const CHAT: MessageKind = MessageKind(0x01);

#[derive(Default)]
struct ChatLog {
    lines: Mutex<Vec<(u64, String)>>,
}

impl MessageHandler<u64> for ChatLog {
    fn handle(&self, source: MessageSource<'_, u64>, message: InboundMessage<'_>) {
        let line = String::from_utf8_lossy(message.body()).into_owned();
        self.lines.lock().push((*source.handle, line));
    }
}

struct Host {
    manager: ConnectionManager<MockConnection>,
    router: Arc<MessageRouter<u64>>,
    chat: Arc<ChatLog>,
    events: Arc<Mutex<Vec<ConnectionEvent<u64>>>>,
}

impl Host {
    fn new(config: SessionConfig) -> Self {
        let chat = Arc::new(ChatLog::default());
        let events = Arc::new(Mutex::new(Vec::new()));

        let mut router: MessageRouter<u64> = MessageRouter::new();
        router.route_kind("chat", CHAT, chat.clone());
        let sink = Arc::clone(&events);
        router.add_listener(Arc::new(CallbackListener::new(
            move |event: ConnectionEvent<u64>| sink.lock().push(event),
        )));
        let router = Arc::new(router);

        let manager: ConnectionManager<MockConnection> =
            ConnectionManager::new(config, router.clone());
        Host {
            manager,
            router,
            chat,
            events,
        }
    }

    fn accept(&mut self, handle: u64, handshake: &[u8]) -> Arc<MockConnection> {
        let conn = Arc::new(MockConnection::new(handle));
        self.manager.begin(Arc::clone(&conn)).unwrap();
        let _ = self.manager.verify_handshake(&handle, handshake);
        self.manager.connected(&handle).unwrap();
        conn
    }

    fn id_of(&self, handle: u64) -> Option<ConnectionId> {
        self.manager.registry().lock().identity_for(&handle).ok()
    }

    fn events(&self) -> Vec<ConnectionEvent<u64>> {
        self.events.lock().clone()
    }
}

fn chat(text: &str) -> Vec<u8> {
    let mut payload = vec![CHAT.0];
    payload.extend_from_slice(text.as_bytes());
    payload
}

/// Test: Full lifecycle with handshake, chat, reply and teardown
#[test]
fn test_full_connection_lifecycle() {
    let mut host = Host::new(SessionConfig::default().requiring_handshake());

    // Good peer registers
    let alice = host.accept(100, handshake_bytes());
    let alice_id = host.id_of(100).unwrap();
    assert_eq!(alice_id.get(), 1);

    // Peer with a foreign preamble never gets an identity
    let mallory = host.accept(200, b"GET / HTTP/1.1\r\n");
    assert!(mallory.is_killed());
    assert!(host.id_of(200).is_none());
    host.manager.disconnected(&200).unwrap();

    // Inbound chat reaches the handler, unknown kinds do not
    host.manager.message(&100, &chat("hello"), 1, 1_000, 0);
    host.manager.message(&100, &[0x7f, 0], 2, 2_000, 0);
    assert_eq!(*host.chat.lines.lock(), vec![(100, "hello".to_string())]);
    assert_eq!(host.router.unrouted(), 1);

    // Reply addressed by identity
    host.manager
        .send(alice_id, &chat("hi alice"), SendKind::ReliableImmediate.into())
        .unwrap();
    assert_eq!(alice.wire()[0].data, chat("hi alice"));

    // Teardown invalidates the identity
    host.manager.disconnected(&100).unwrap();
    assert!(host.manager.send(alice_id, b"x", SendType::RELIABLE).is_err());
    assert!(host.manager.active_connections().is_empty());

    assert_eq!(
        host.events(),
        vec![
            ConnectionEvent::Connected {
                id: alice_id,
                handle: 100
            },
            ConnectionEvent::Disconnected { handle: 200 },
            ConnectionEvent::Disconnected { handle: 100 },
        ]
    );
}

/// Test: A reconnect on the same handle receives a fresh identity
#[test]
fn test_reconnect_gets_fresh_identity() {
    let mut host = Host::new(SessionConfig::default());

    host.accept(5, handshake_bytes());
    let first = host.id_of(5).unwrap();
    host.manager.disconnected(&5).unwrap();

    host.accept(5, handshake_bytes());
    let second = host.id_of(5).unwrap();

    assert!(second > first);
    assert_eq!(host.manager.active_connections(), vec![second]);
}

/// Test: Oversized messages never reach a route
#[test]
fn test_size_limit_enforced_before_routing() {
    let mut host = Host::new(SessionConfig::default().with_max_message_size(8));
    host.accept(1, handshake_bytes());

    host.manager.message(&1, &chat("0123456"), 1, 0, 0);
    host.manager.message(&1, &chat("01234567"), 2, 0, 0);

    assert_eq!(host.chat.lines.lock().len(), 1);
    assert_eq!(host.router.unrouted(), 0);
    assert_eq!(host.manager.session(&1).unwrap().dropped_messages(), 1);
}

/// Test: Many peers get distinct identities and isolated sends
#[test]
fn test_many_peers_isolated() {
    let mut host = Host::new(SessionConfig::default());
    let conns: Vec<_> = (0..8).map(|h| host.accept(h, handshake_bytes())).collect();

    for handle in 0..8u64 {
        let id = host.id_of(handle).unwrap();
        host.manager
            .send(id, &handle.to_le_bytes(), SendType::UNRELIABLE | SendType::NO_DELAY)
            .unwrap();
    }

    for (handle, conn) in conns.iter().enumerate() {
        let wire = conn.wire();
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].data, (handle as u64).to_le_bytes().to_vec());
    }
    assert_eq!(host.manager.active_connections().len(), 8);
}

/// Answers pings and bans anything it cannot parse.
struct PingService;

impl MessageHandler<u64> for PingService {
    fn handle(&self, source: MessageSource<'_, u64>, message: InboundMessage<'_>) {
        if message.body() == b"ping" {
            let _ = source.connection.send_reliable_immediate(b"pong");
        } else {
            source.connection.kill_connection();
        }
    }
}

/// Test: A handler replies and kills from inside the delivery callback
#[test]
fn test_handler_acts_on_sender_during_delivery() {
    let mut router: MessageRouter<u64> = MessageRouter::new();
    router.route_kind("ping", MessageKind(0x02), Arc::new(PingService));
    let mut manager: ConnectionManager<MockConnection> =
        ConnectionManager::new(SessionConfig::default(), Arc::new(router));

    let conns: Vec<_> = [1u64, 2]
        .into_iter()
        .map(|handle| {
            let conn = Arc::new(MockConnection::new(handle));
            manager.begin(Arc::clone(&conn)).unwrap();
            manager.connected(&handle).unwrap();
            conn
        })
        .collect();

    manager.message(&1, b"\x02ping", 1, 0, 0);
    manager.message(&2, b"\x02junk", 1, 0, 0);

    assert_eq!(conns[0].wire()[0].data, b"pong".to_vec());
    assert!(!conns[0].is_killed());
    assert!(conns[1].wire().is_empty());
    assert!(conns[1].is_killed());
}
