//! Connection state tracking.
//!
//! The driver reports connection lifecycle events; [`ConnectionMonitor`]
//! folds them into a two-state machine and publishes the current state on a
//! `tokio::sync::watch` channel. Observers subscribe with
//! [`ConnectionMonitor::subscribe`] and unsubscribe by dropping the receiver.

use log::{debug, info};
use tokio::sync::watch;

/// Whether the client currently holds a usable connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Lifecycle event reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionEvent {
    ConnectionReady,
    ConnectionClosed,
}

impl ConnectionState {
    /// State after `event`. Every event is accepted in every state.
    pub fn transition(self, event: ConnectionEvent) -> Self {
        match event {
            ConnectionEvent::ConnectionReady => ConnectionState::Connected,
            ConnectionEvent::ConnectionClosed => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// Publishes connection state changes to subscribers.
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: watch::Sender<ConnectionState>,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self { state }
    }

    /// Apply a driver event. Subscribers are notified only when the state
    /// actually changes; the new state is returned.
    pub fn notify(&self, event: ConnectionEvent) -> ConnectionState {
        let mut current = ConnectionState::Disconnected;
        let changed = self.state.send_if_modified(|state| {
            let next = state.transition(event);
            current = next;
            if next == *state {
                return false;
            }
            *state = next;
            true
        });

        if changed {
            info!("Connection state changed to {:?}", current);
        } else {
            debug!("Ignoring {:?}: already {:?}", event, current);
        }
        current
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Subscribe to state changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }
}
