// Subscription handles and listener fan-out shared by StateStore adapters

use crate::domain::{CounterPath, CounterValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

/// Current value at a path, `None` when the path has never been written
pub type Snapshot = Option<CounterValue>;

/// Callback invoked on every delivery for a subscribed path.
///
/// Listeners run on the writer's task and must not block. A listener must not
/// release its own subscription from inside the callback.
pub type Listener = Arc<dyn Fn(Snapshot) + Send + Sync>;

type Release = Box<dyn FnOnce() + Send + Sync>;

/// Scoped handle for a live subscription.
///
/// Dropping the handle releases the listener; once `unsubscribe` (or drop)
/// returns, the listener is never invoked again.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    path: CounterPath,
    release: Option<Release>,
}

impl Subscription {
    pub fn new(path: CounterPath, release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            path,
            release: Some(Box::new(release)),
        }
    }

    pub fn path(&self) -> CounterPath {
        self.path
    }

    /// Release explicitly (same as dropping)
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            debug!(path = %self.path, "Subscription released");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("active", &self.release.is_some())
            .finish()
    }
}

// A slot is emptied on release. Delivery locks the slot for the duration of
// the callback, so release waits for an in-flight delivery to finish.
pub type Slot = Arc<Mutex<Option<Listener>>>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    slots: HashMap<CounterPath, Vec<(u64, Slot)>>,
}

/// Per-path listener registry used by store adapters to fan out writes.
///
/// Adapters call `notify` while holding their own write ordering lock, which
/// gives every subscriber per-path delivery in commit order.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives nothing until the next `notify` (or
    /// until the adapter delivers the initial value via `deliver`).
    pub fn register(&self, path: CounterPath, listener: Listener) -> (Subscription, Slot) {
        let slot: Slot = Arc::new(Mutex::new(Some(listener)));
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .slots
                .entry(path)
                .or_default()
                .push((id, Arc::clone(&slot)));
            id
        };

        let weak: Weak<Mutex<RegistryInner>> = Arc::downgrade(&self.inner);
        let release_slot = Arc::clone(&slot);
        let subscription = Subscription::new(path, move || {
            lock(&release_slot).take();
            if let Some(inner) = weak.upgrade() {
                let mut inner = lock(&inner);
                if let Some(entries) = inner.slots.get_mut(&path) {
                    entries.retain(|(entry_id, _)| *entry_id != id);
                    if entries.is_empty() {
                        inner.slots.remove(&path);
                    }
                }
            }
        });

        (subscription, slot)
    }

    /// Deliver to a single slot (used for the immediate replay on subscribe)
    pub fn deliver(slot: &Slot, snapshot: Snapshot) {
        let guard = lock(slot);
        if let Some(listener) = guard.as_ref() {
            listener(snapshot);
        }
    }

    /// Deliver a committed value to every live listener of `path`
    pub fn notify(&self, path: &CounterPath, snapshot: Snapshot) {
        let slots: Vec<Slot> = {
            let inner = lock(&self.inner);
            inner
                .slots
                .get(path)
                .map(|entries| entries.iter().map(|(_, slot)| Arc::clone(slot)).collect())
                .unwrap_or_default()
        };
        for slot in &slots {
            Self::deliver(slot, snapshot);
        }
    }

    /// Number of live listeners on `path`
    pub fn listener_count(&self, path: &CounterPath) -> usize {
        lock(&self.inner)
            .slots
            .get(path)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

// Listener panics must not wedge the registry for every other subscriber.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
