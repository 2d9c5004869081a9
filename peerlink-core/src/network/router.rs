// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message Router
//!
//! A [`SessionOwner`] that hands inbound messages to feature handlers.
//! Routes are an ordered list of `{predicate, handler}` pairs; the first
//! matching predicate wins. Lifecycle changes fan out to listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::identity::ConnectionId;
use super::message::{InboundMessage, MessageKind, MessageSource};
use super::session::SessionOwner;

/// Handles messages accepted by a route.
///
/// `source` gives access to the sending connection for replies and kills.
pub trait MessageHandler<H>: Send + Sync {
    fn handle(&self, source: MessageSource<'_, H>, message: InboundMessage<'_>);
}

impl<H, F> MessageHandler<H> for F
where
    F: Fn(MessageSource<'_, H>, InboundMessage<'_>) + Send + Sync,
{
    fn handle(&self, source: MessageSource<'_, H>, message: InboundMessage<'_>) {
        self(source, message)
    }
}

/// Lifecycle changes seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent<H> {
    /// A connection was registered.
    Connected {
        /// Identity minted for it.
        id: ConnectionId,
        /// Transport handle.
        handle: H,
    },

    /// A connection went away, registered or not.
    Disconnected {
        /// Transport handle.
        handle: H,
    },
}

/// Listener trait for lifecycle events.
pub trait LifecycleListener<H>: Send + Sync {
    fn on_event(&self, event: ConnectionEvent<H>);
}

/// Closure-backed lifecycle listener.
pub struct CallbackListener<F> {
    callback: F,
}

impl<F> CallbackListener<F> {
    pub fn new(callback: F) -> Self {
        CallbackListener { callback }
    }
}

impl<H, F> LifecycleListener<H> for CallbackListener<F>
where
    F: Fn(ConnectionEvent<H>) + Send + Sync,
{
    fn on_event(&self, event: ConnectionEvent<H>) {
        (self.callback)(event);
    }
}

type Predicate = Box<dyn Fn(&InboundMessage<'_>) -> bool + Send + Sync>;

struct Route<H> {
    name: String,
    predicate: Predicate,
    handler: Arc<dyn MessageHandler<H>>,
}

/// Ordered handler table for inbound messages.
pub struct MessageRouter<H> {
    routes: Vec<Route<H>>,
    listeners: Vec<Arc<dyn LifecycleListener<H>>>,
    unrouted: AtomicU64,
}

impl<H> MessageRouter<H> {
    pub fn new() -> Self {
        MessageRouter {
            routes: Vec::new(),
            listeners: Vec::new(),
            unrouted: AtomicU64::new(0),
        }
    }

    /// Appends a route taking every message tagged `kind`.
    pub fn route_kind(
        &mut self,
        name: impl Into<String>,
        kind: MessageKind,
        handler: Arc<dyn MessageHandler<H>>,
    ) -> &mut Self {
        self.route_when(name, move |message| message.kind() == Some(kind), handler)
    }

    /// Appends a route taking every message `predicate` accepts.
    pub fn route_when<P>(
        &mut self,
        name: impl Into<String>,
        predicate: P,
        handler: Arc<dyn MessageHandler<H>>,
    ) -> &mut Self
    where
        P: Fn(&InboundMessage<'_>) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            name: name.into(),
            predicate: Box::new(predicate),
            handler,
        });
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn LifecycleListener<H>>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Route names in match order.
    pub fn route_names(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.name.as_str()).collect()
    }

    /// Messages no route accepted.
    pub fn unrouted(&self) -> u64 {
        self.unrouted.load(Ordering::Relaxed)
    }
}

impl<H: Clone> MessageRouter<H> {
    fn dispatch(&self, event: ConnectionEvent<H>) {
        for listener in &self.listeners {
            listener.on_event(event.clone());
        }
    }
}

impl<H> Default for MessageRouter<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SessionOwner<H> for MessageRouter<H>
where
    H: Clone + std::fmt::Debug + Send + Sync,
{
    fn on_connected(&self, id: ConnectionId, handle: &H) {
        self.dispatch(ConnectionEvent::Connected {
            id,
            handle: handle.clone(),
        });
    }

    fn on_disconnected(&self, handle: &H) {
        self.dispatch(ConnectionEvent::Disconnected {
            handle: handle.clone(),
        });
    }

    fn on_message(&self, source: MessageSource<'_, H>, message: InboundMessage<'_>) {
        match self.routes.iter().find(|route| (route.predicate)(&message)) {
            Some(route) => {
                trace!("Routing message {} to {}", message.message_number, route.name);
                route.handler.handle(source, message);
            }
            None => {
                debug!(
                    "No route for message {} ({:?}) from {}",
                    message.message_number,
                    message.kind(),
                    source.id
                );
                self.unrouted.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
