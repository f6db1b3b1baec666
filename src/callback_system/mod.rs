//! Ordered notification fan-out
//!
//! Providers push values through a [`NotificationChannel`]; every registered
//! listener gets its own unbounded queue drained by a single task. A listener
//! therefore sees values in the exact order they were emitted and is never
//! invoked concurrently with itself.


use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

/// Type for listener IDs
pub type ListenerId = Uuid;

/// Trait for types that can be pushed through a notification channel
pub trait NotificationData: Clone + Send + Sync + 'static + fmt::Debug {}

impl<T> NotificationData for T where T: Clone + Send + Sync + 'static + fmt::Debug {}

/// Counters describing channel activity
#[derive(Debug, Clone, Default)]
pub struct ChannelStats {
    /// Values passed to `emit`
    pub notifications_emitted: u64,
    /// Individual listener deliveries queued, including the initial value on registration
    pub deliveries_queued: u64,
    /// When the last value was emitted
    pub last_emitted_at: Option<DateTime<Utc>>,
}

struct ChannelInner<T: NotificationData> {
    /// Latest emitted value, replayed to every new listener.
    /// The write lock serializes emits against registrations.
    current: RwLock<T>,
    listeners: DashMap<ListenerId, mpsc::UnboundedSender<T>>,
    stats: RwLock<ChannelStats>,
    group: Option<String>,
}

/// Fan-out channel that remembers its latest value
#[derive(Clone)]
pub struct NotificationChannel<T: NotificationData> {
    inner: Arc<ChannelInner<T>>,
}

impl<T: NotificationData> NotificationChannel<T> {
    /// Create a new channel holding `initial` as its current value
    pub fn new(initial: T) -> Self {
        Self::build(initial, None)
    }

    /// Create a new channel with a group identifier used in log output
    pub fn with_group(initial: T, group: &str) -> Self {
        Self::build(initial, Some(group.to_string()))
    }

    fn build(initial: T, group: Option<String>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                current: RwLock::new(initial),
                listeners: DashMap::new(),
                stats: RwLock::new(ChannelStats::default()),
                group,
            }),
        }
    }

    /// Register a listener.
    ///
    /// The current value is queued to the listener first, followed by every
    /// value emitted after registration. The returned [`Subscription`] stops
    /// delivery when cancelled or dropped.
    pub async fn register<F>(&self, listener: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let (sender, mut receiver) = mpsc::unbounded_channel::<T>();

        {
            // Holding the read lock keeps emits out until the listener is in the map
            let current = self.inner.current.read().await;
            // The receiver is still in scope, so this cannot fail
            let _ = sender.send(current.clone());
            self.inner.listeners.insert(id, sender);
            self.inner.stats.write().await.deliveries_queued += 1;
        }

        let group = self.inner.group.clone();
        let task = tokio::spawn(async move {
            debug!(listener_id = %id, group = ?group, "Started listener task");

            while let Some(value) = receiver.recv().await {
                trace!(listener_id = %id, "Delivering notification");
                listener(value);
            }

            debug!(listener_id = %id, group = ?group, "Notification queue closed, listener task stopped");
        });

        debug!(listener_id = %id, group = ?self.inner.group, "Registered listener");

        let weak: Weak<ChannelInner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(
            id,
            move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.remove(&id);
                }
            },
            Some(task),
        )
    }

    /// Unregister a listener by ID.
    ///
    /// Values already queued to the listener are still delivered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.remove(&id).is_some();

        if removed {
            debug!(listener_id = %id, group = ?self.inner.group, "Unregistered listener");
        } else {
            debug!(
                listener_id = %id,
                group = ?self.inner.group,
                "Attempted to unregister non-existent listener"
            );
        }

        removed
    }

    /// Replace the current value and queue it for every listener.
    ///
    /// Returns the number of listeners the value was queued for. Listeners
    /// whose task has gone away are pruned.
    pub async fn emit(&self, value: T) -> usize {
        let mut current = self.inner.current.write().await;
        *current = value.clone();

        let mut delivered = 0;
        self.inner.listeners.retain(|id, sender| {
            if sender.send(value.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                debug!(listener_id = %id, "Pruning listener with closed queue");
                false
            }
        });

        let mut stats = self.inner.stats.write().await;
        stats.notifications_emitted += 1;
        stats.deliveries_queued += delivered as u64;
        stats.last_emitted_at = Some(Utc::now());

        debug!(group = ?self.inner.group, listeners = delivered, "Emitted notification");
        delivered
    }

    /// Get a copy of the current value
    pub async fn current(&self) -> T {
        self.inner.current.read().await.clone()
    }

    /// Get the number of registered listeners
    pub fn count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Drop every listener's queue sender
    pub fn clear(&self) {
        let count = self.inner.listeners.len();
        self.inner.listeners.clear();
        debug!(group = ?self.inner.group, count, "Cleared all listeners");
    }

    /// Get current statistics
    pub async fn stats(&self) -> ChannelStats {
        self.inner.stats.read().await.clone()
    }
}

/// Handle to a registered listener.
///
/// Cancelling (explicitly or on drop) detaches the listener from its source
/// and stops its delivery task; queued but undelivered values are discarded.
pub struct Subscription {
    id: ListenerId,
    canceller: Option<Box<dyn FnOnce() + Send + Sync>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Build a subscription from a cancel action and the optional task delivering to the listener
    pub fn new<F>(id: ListenerId, canceller: F, task: Option<JoinHandle<()>>) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            id,
            canceller: Some(Box::new(canceller)),
            task,
        }
    }

    /// The listener ID this subscription controls
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener can still receive notifications.
    ///
    /// Turns false after cancellation or once the source has closed the
    /// listener's queue.
    pub fn is_active(&self) -> bool {
        self.canceller.is_some() && self.task.as_ref().map_or(true, |task| !task.is_finished())
    }

    /// Cancel the subscription. Returns false if it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        let Some(canceller) = self.canceller.take() else {
            return false;
        };

        canceller();
        if let Some(task) = self.task.take() {
            task.abort();
        }

        debug!(listener_id = %self.id, "Subscription cancelled");
        true
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
