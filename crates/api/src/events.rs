//! # Booking Event Registry
//!
//! Staff screens keep a streaming connection open to hear about new bookings
//! and status changes. [`ConnectionRegistry`] owns the set of live
//! connections:
//!
//! - [`ConnectionRegistry::add`] registers a connection and hands back a
//!   [`Subscription`]; dropping the subscription unregisters it
//! - [`ConnectionRegistry::broadcast`] delivers an event to every live
//!   connection and prunes the ones whose receiver is gone
//! - [`ConnectionRegistry::close_all`] ends every stream at shutdown and
//!   refuses new connections afterwards
//!
//! The registry is created in `start_server` and lives in `ApiState`.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;
use washbay_core::models::booking::BookingEvent;

#[derive(Debug, Default)]
struct RegistryInner {
    connections: RwLock<HashMap<Uuid, UnboundedSender<BookingEvent>>>,
    closed: AtomicBool,
}

/// Cheaply cloneable handle to the set of live event connections.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection. After [`close_all`](Self::close_all) the
    /// returned subscription is already finished.
    pub fn add(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::unbounded_channel();

        if !self.inner.closed.load(Ordering::Acquire) {
            self.inner
                .connections
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, sender);
            tracing::debug!(connection = %id, "Event connection added");
        }

        Subscription {
            id,
            receiver,
            registry: self.clone(),
        }
    }

    /// Unregisters a connection. Returns whether it was still registered.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();

        if removed {
            tracing::debug!(connection = %id, "Event connection removed");
        }
        removed
    }

    /// Sends `event` to every live connection and returns how many received it.
    pub fn broadcast(&self, event: &BookingEvent) -> usize {
        let mut connections = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        connections.retain(|_, sender| sender.send(event.clone()).is_ok());

        tracing::debug!(
            kind = event.kind.as_str(),
            booking = %event.booking_id,
            delivered = connections.len(),
            "Broadcast booking event"
        );
        connections.len()
    }

    pub fn len(&self) -> usize {
        self.inner
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every sender, ending all open streams, and rejects later connections.
    pub fn close_all(&self) {
        self.inner.closed.store(true, Ordering::Release);
        let mut connections = self
            .inner
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        tracing::info!("Closing {} event connections", connections.len());
        connections.clear();
    }
}

/// One registered connection. Unregisters itself when dropped.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: UnboundedReceiver<BookingEvent>,
    registry: ConnectionRegistry,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the next event. `None` once the registry has closed.
    pub async fn recv(&mut self) -> Option<BookingEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
