use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

/// Write side of a reactive store.
///
/// `set` replaces the whole value and notifies observers. Writers never read
/// the previous value, so there is no read-modify-write window.
pub trait StateStore<T>: Send + Sync {
    /// Replace the current value
    fn set(&self, value: T);
}

/// A named, process-wide reactive container holding the latest value only
pub struct SharedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The underlying watch sender; observers hold receivers
    inner: Arc<watch::Sender<T>>,
    /// Debug name for this store (used in logging)
    name: String,
    /// Number of `set` calls since creation
    writes: Arc<AtomicU64>,
}

impl<T> SharedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new SharedStore with the given initial value
    pub fn new(value: T) -> Self {
        Self::with_name(value, "unnamed")
    }

    /// Create a new SharedStore with the given name
    pub fn with_name(value: T, name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(name = %name, "Creating new SharedStore");

        let (sender, _) = watch::channel(value);
        Self {
            inner: Arc::new(sender),
            name,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the name of this store
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }

    /// Observe future changes. The observer starts with the current value marked as seen.
    pub fn subscribe(&self) -> StoreObserver<T> {
        trace!(name = %self.name, "New store observer");
        StoreObserver {
            receiver: self.inner.subscribe(),
        }
    }

    /// Number of writes since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.inner.receiver_count()
    }
}

impl<T> StateStore<T> for SharedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn set(&self, value: T) {
        self.inner.send_replace(value);
        let writes = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(name = %self.name, writes, "Store value replaced");
    }
}

impl<T> Clone for SharedStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: self.name.clone(),
            writes: Arc::clone(&self.writes),
        }
    }
}

impl<T> fmt::Debug for SharedStore<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStore")
            .field("name", &self.name)
            .field("value", &*self.inner.borrow())
            .field("writes", &self.write_count())
            .finish()
    }
}

/// Read side of a [`SharedStore`].
///
/// Observers are woken on every write but only ever see the latest value;
/// writes landing between two reads collapse into one observation.
pub struct StoreObserver<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone> StoreObserver<T> {
    /// Wait for the next write and return the value then current.
    /// Returns None once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Get the latest value without waiting
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }
}
