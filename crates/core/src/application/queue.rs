// Queue Console - operator control of the "now serving" counters

use crate::domain::counter::{queue_after_decrement, queue_after_increment};
use crate::domain::{CompanyId, CounterPath, CounterValue};
use crate::error::Result;
use crate::port::{Listener, StateStore, Subscription};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Operator console holding a local snapshot of the four queue counters.
///
/// `increment`/`decrement` act on the local snapshot and apply the new value
/// locally before the store confirms it. A failed write is rolled back unless
/// a newer delivery has already replaced the optimistic value.
pub struct QueueConsole {
    store: Arc<dyn StateStore>,
    local: Arc<Mutex<[i64; 4]>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl QueueConsole {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            local: Arc::new(Mutex::new([0; 4])),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe the local snapshot to the four queue paths.
    /// Calling it again replaces the previous subscriptions.
    pub async fn attach(&self) -> Result<()> {
        let mut subscriptions = Vec::with_capacity(CompanyId::ALL.len());
        for company in CompanyId::ALL {
            let local = Arc::clone(&self.local);
            let listener: Listener = Arc::new(move |snapshot| {
                lock(&local)[company.index()] = CounterValue::or_zero(snapshot);
            });
            subscriptions.push(
                self.store
                    .subscribe(&CounterPath::queue(company), listener)
                    .await?,
            );
        }
        *lock(&self.subscriptions) = subscriptions;
        Ok(())
    }

    /// Release every store subscription
    pub fn detach(&self) {
        lock(&self.subscriptions).clear();
    }

    /// Locally known queue value for `company`
    pub fn current(&self, company: CompanyId) -> i64 {
        lock(&self.local)[company.index()]
    }

    /// Locally known queue values, indexed by company
    pub fn snapshot(&self) -> [i64; 4] {
        *lock(&self.local)
    }

    /// Advance to the next number. No-op at 999.
    pub async fn increment(&self, company: CompanyId) -> Result<i64> {
        self.step(company, queue_after_increment).await
    }

    /// Step back one number. No-op at 0.
    pub async fn decrement(&self, company: CompanyId) -> Result<i64> {
        self.step(company, queue_after_decrement).await
    }

    async fn step(&self, company: CompanyId, next_of: fn(i64) -> i64) -> Result<i64> {
        let idx = company.index();
        let (previous, next) = {
            let mut local = lock(&self.local);
            let previous = local[idx];
            let next = next_of(previous);
            if next == previous {
                return Ok(previous);
            }
            local[idx] = next;
            (previous, next)
        };

        let path = CounterPath::queue(company);
        if let Err(e) = self.store.write(&path, CounterValue::new(next)).await {
            let mut local = lock(&self.local);
            if local[idx] == next {
                local[idx] = previous;
            }
            warn!(company = %company, error = %e, "Queue update failed, rolled back");
            return Err(e);
        }

        info!(company = %company, current = next, "Queue updated");
        Ok(next)
    }

    /// Zero every queue and ticket counter.
    ///
    /// The local snapshot is zeroed immediately. The eight writes are
    /// independent; the first failure (if any) is returned after all finish.
    pub async fn reset_all(&self) -> Result<()> {
        *lock(&self.local) = [0; 4];

        let paths: Vec<CounterPath> = CounterPath::all().collect();
        let writes = paths
            .iter()
            .map(|path| self.store.write(path, CounterValue::new(0)));
        let results = join_all(writes).await;

        let mut first_error = None;
        for (path, result) in paths.iter().zip(results) {
            if let Err(e) = result {
                warn!(path = %path, error = %e, "Reset write failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All counters reset");
                Ok(())
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project;
    use crate::port::state_store::mocks::MockStateStore;
    use tokio_test::assert_err;

    fn console_with(store: MockStateStore) -> (Arc<MockStateStore>, QueueConsole) {
        let store = Arc::new(store);
        let console = QueueConsole::new(store.clone());
        (store, console)
    }

    #[tokio::test]
    async fn test_attach_loads_current_values() {
        let (_store, console) = console_with(
            MockStateStore::new()
                .with_value(CounterPath::queue(CompanyId::B), 12)
                .with_value(CounterPath::queue(CompanyId::D), 999),
        );

        console.attach().await.unwrap();

        assert_eq!(console.snapshot(), [0, 12, 0, 999]);
    }

    #[tokio::test]
    async fn test_increment_and_decrement_write_through() {
        let (store, console) = console_with(MockStateStore::new());
        console.attach().await.unwrap();

        assert_eq!(console.increment(CompanyId::A).await.unwrap(), 1);
        assert_eq!(console.increment(CompanyId::A).await.unwrap(), 2);
        assert_eq!(console.decrement(CompanyId::A).await.unwrap(), 1);

        assert_eq!(
            store.get(&CounterPath::queue(CompanyId::A)),
            Some(CounterValue::new(1))
        );
        assert_eq!(console.current(CompanyId::A), 1);
    }

    #[tokio::test]
    async fn test_bounds_do_not_write() {
        let (store, console) = console_with(
            MockStateStore::new().with_value(CounterPath::queue(CompanyId::C), 999),
        );
        console.attach().await.unwrap();

        assert_eq!(console.increment(CompanyId::C).await.unwrap(), 999);
        assert_eq!(console.decrement(CompanyId::A).await.unwrap(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_updates_reach_local_snapshot() {
        let (store, console) = console_with(MockStateStore::new());
        console.attach().await.unwrap();

        store
            .write(&CounterPath::queue(CompanyId::B), CounterValue::new(40))
            .await
            .unwrap();
        assert_eq!(console.current(CompanyId::B), 40);

        assert_eq!(console.increment(CompanyId::B).await.unwrap(), 41);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let (store, console) = console_with(
            MockStateStore::new().with_value(CounterPath::queue(CompanyId::A), 7),
        );
        console.attach().await.unwrap();
        store.set_fail_writes(true);

        assert_err!(console.increment(CompanyId::A).await);
        assert_eq!(console.current(CompanyId::A), 7);
    }

    #[tokio::test]
    async fn test_detach_stops_updates() {
        let (store, console) = console_with(MockStateStore::new());
        console.attach().await.unwrap();
        console.detach();

        store
            .write(&CounterPath::queue(CompanyId::A), CounterValue::new(5))
            .await
            .unwrap();

        assert_eq!(console.current(CompanyId::A), 0);
        assert_eq!(store.listener_count(&CounterPath::queue(CompanyId::A)), 0);
    }

    #[tokio::test]
    async fn test_reset_all_zeroes_everything() {
        let mut seeded = MockStateStore::new();
        for (n, path) in CounterPath::all().enumerate() {
            seeded = seeded.with_value(path, n as i64 + 3);
        }
        let (store, console) = console_with(seeded);
        console.attach().await.unwrap();

        console.reset_all().await.unwrap();

        assert_eq!(console.snapshot(), [0; 4]);
        for path in CounterPath::all() {
            assert_eq!(store.get(&path), Some(CounterValue::new(0)));
        }
        for company in CompanyId::ALL {
            let raw = store.get(&CounterPath::queue(company)).map(|v| v.current);
            assert_eq!(project(company, raw).as_str(), format!("{}000", company));
        }
    }

    #[tokio::test]
    async fn test_reset_all_reports_failure_but_zeroes_locally() {
        let (store, console) = console_with(
            MockStateStore::new().with_value(CounterPath::queue(CompanyId::A), 9),
        );
        console.attach().await.unwrap();
        store.set_fail_writes(true);

        assert_err!(console.reset_all().await);
        assert_eq!(console.snapshot(), [0; 4]);
    }
}
