// State Store Port (Interface)

use crate::domain::{CounterPath, CounterValue};
use crate::error::{AppError, Result};
use crate::port::subscription::{Listener, Snapshot, Subscription};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Shared, subscribable key-value store holding the eight counters.
///
/// Every connected station sees the same values. A subscriber receives the
/// current value (or `None`) once on subscribe, then every later committed
/// value for that path in commit order.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Replace the value at `path`. Resolves once the write is committed.
    async fn write(&self, path: &CounterPath, value: CounterValue) -> Result<()>;

    /// Register `listener` for `path`. The returned handle releases it.
    async fn subscribe(&self, path: &CounterPath, listener: Listener) -> Result<Subscription>;
}

/// Read the current value once, via a subscription that is released
/// immediately after the first delivery.
pub async fn read_once(store: &dyn StateStore, path: &CounterPath) -> Result<Snapshot> {
    let (tx, rx) = oneshot::channel::<Snapshot>();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let listener: Listener = Arc::new(move |snapshot| {
        let sender = tx.lock().ok().and_then(|mut guard| guard.take());
        if let Some(sender) = sender {
            let _ = sender.send(snapshot);
        }
    });

    let subscription = store.subscribe(path, listener).await?;
    let snapshot = rx.await.map_err(|_| {
        AppError::Store(format!("subscription for {} closed before first value", path))
    });
    subscription.unsubscribe();
    snapshot
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::subscription::ListenerRegistry;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory StateStore with failure injection
    #[derive(Default)]
    pub struct MockStateStore {
        values: Mutex<HashMap<CounterPath, CounterValue>>,
        registry: ListenerRegistry,
        // Serializes write+notify against subscribe's initial delivery
        gate: tokio::sync::Mutex<()>,
        fail_writes: AtomicBool,
        fail_subscribes: AtomicBool,
        write_count: AtomicUsize,
    }

    impl MockStateStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populate a value without notifying anyone
        pub fn with_value(self, path: CounterPath, current: i64) -> Self {
            self.values
                .lock()
                .unwrap()
                .insert(path, CounterValue::new(current));
            self
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_subscribes(&self, fail: bool) {
            self.fail_subscribes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes
        pub fn write_count(&self) -> usize {
            self.write_count.load(Ordering::SeqCst)
        }

        pub fn get(&self, path: &CounterPath) -> Option<CounterValue> {
            self.values.lock().unwrap().get(path).copied()
        }

        pub fn listener_count(&self, path: &CounterPath) -> usize {
            self.registry.listener_count(path)
        }
    }

    #[async_trait]
    impl StateStore for MockStateStore {
        async fn write(&self, path: &CounterPath, value: CounterValue) -> Result<()> {
            let _gate = self.gate.lock().await;
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Store(format!("injected write failure on {}", path)));
            }
            self.values.lock().unwrap().insert(*path, value);
            self.write_count.fetch_add(1, Ordering::SeqCst);
            self.registry.notify(path, Some(value));
            Ok(())
        }

        async fn subscribe(&self, path: &CounterPath, listener: Listener) -> Result<Subscription> {
            let _gate = self.gate.lock().await;
            if self.fail_subscribes.load(Ordering::SeqCst) {
                return Err(AppError::Store(format!("injected read failure on {}", path)));
            }
            let current = self.get(path);
            let (subscription, slot) = self.registry.register(*path, listener);
            ListenerRegistry::deliver(&slot, current);
            Ok(subscription)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockStateStore;
    use super::*;
    use crate::domain::CompanyId;

    fn recording_listener() -> (Listener, Arc<Mutex<Vec<Snapshot>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Listener = Arc::new(move |snapshot| sink.lock().unwrap().push(snapshot));
        (listener, seen)
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_then_updates() {
        let path = CounterPath::queue(CompanyId::A);
        let store = MockStateStore::new().with_value(path, 4);
        let (listener, seen) = recording_listener();

        let _sub = store.subscribe(&path, listener).await.unwrap();
        store.write(&path, CounterValue::new(5)).await.unwrap();
        store.write(&path, CounterValue::new(6)).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                Some(CounterValue::new(4)),
                Some(CounterValue::new(5)),
                Some(CounterValue::new(6))
            ]
        );
    }

    #[tokio::test]
    async fn test_absent_path_delivers_none() {
        let store = MockStateStore::new();
        let (listener, seen) = recording_listener();
        let _sub = store
            .subscribe(&CounterPath::ticket(CompanyId::B), listener)
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn test_no_delivery_after_unsubscribe() {
        let path = CounterPath::queue(CompanyId::C);
        let store = MockStateStore::new();
        let (listener, seen) = recording_listener();

        let sub = store.subscribe(&path, listener).await.unwrap();
        sub.unsubscribe();
        store.write(&path, CounterValue::new(1)).await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.listener_count(&path), 0);
    }

    #[tokio::test]
    async fn test_read_once_returns_value_and_releases() {
        let path = CounterPath::ticket(CompanyId::D);
        let store = MockStateStore::new().with_value(path, 41);

        let value = read_once(&store, &path).await.unwrap();

        assert_eq!(value, Some(CounterValue::new(41)));
        assert_eq!(store.listener_count(&path), 0);
        assert_eq!(read_once(&store, &CounterPath::queue(CompanyId::D)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_once_propagates_store_failure() {
        let store = MockStateStore::new();
        store.set_fail_subscribes(true);
        let result = read_once(&store, &CounterPath::queue(CompanyId::A)).await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_value_and_listeners_untouched() {
        let path = CounterPath::queue(CompanyId::B);
        let store = MockStateStore::new().with_value(path, 2);
        let (listener, seen) = recording_listener();
        let _sub = store.subscribe(&path, listener).await.unwrap();

        store.set_fail_writes(true);
        assert!(store.write(&path, CounterValue::new(3)).await.is_err());

        assert_eq!(store.get(&path), Some(CounterValue::new(2)));
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.write_count(), 0);
    }
}
