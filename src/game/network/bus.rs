//! Notification bus with scoped subscriptions.
//!
//! The network layer publishes lifecycle notifications (unit despawned, game
//! over) and interested subsystems hold a [`Subscription`]. A subscription
//! buffers everything published after it was created until it is drained.
//! Dropping it unsubscribes, so a subsystem torn down early, or removed from
//! the world, can never receive a stale notification.

use bevy::prelude::*;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Inbox<T> = Arc<Mutex<Vec<T>>>;

struct Registry<T> {
    next_id: u64,
    inboxes: Vec<(u64, Inbox<T>)>,
}

/// Fan-out channel for one kind of notification.
#[derive(Resource)]
pub struct NotificationBus<T: Send + Sync + 'static> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: Send + Sync + 'static> Default for NotificationBus<T> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                inboxes: Vec::new(),
            })),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> NotificationBus<T> {
    /// Registers a new subscriber. Only notifications published from now on
    /// are delivered to it.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;

        let inbox: Inbox<T> = Arc::new(Mutex::new(Vec::new()));
        registry.inboxes.push((id, Arc::clone(&inbox)));

        Subscription {
            id,
            inbox,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `notification` to every live subscriber.
    pub fn publish(&self, notification: T) {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, inbox) in &registry.inboxes {
            inbox
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notification.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .inboxes
            .len()
    }
}

/// Registration handle returned by [`NotificationBus::subscribe`].
pub struct Subscription<T> {
    id: u64,
    inbox: Inbox<T>,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Takes every notification received since the last drain, oldest first.
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.inbox.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        // Bus may already be gone during world teardown.
        let Some(registry) = self.registry.upgrade() else { return };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.inboxes.retain(|(id, _)| *id != self.id);
    }
}
