// SQLite StateStore Implementation
//
// The table is the source of truth; change delivery is in-process. Every
// component sharing one `SqliteStateStore` (the daemon and all its RPC
// clients) sees the same ordered stream of values per path.

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use queueboard_core::domain::{CounterPath, CounterValue};
use queueboard_core::error::Result;
use queueboard_core::port::{Listener, ListenerRegistry, StateStore, Subscription, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct SqliteStateStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
    registry: ListenerRegistry,
    // Orders commit+notify against subscribe's initial read
    gate: Mutex<()>,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
            registry: ListenerRegistry::new(),
            gate: Mutex::new(()),
        }
    }

    /// Committed value at `path`
    pub async fn read(&self, path: &CounterPath) -> Result<Option<CounterValue>> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT current FROM counters WHERE path = ?")
                .bind(path.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(current.map(CounterValue::new))
    }

    /// Number of live subscriptions on `path`
    pub fn listener_count(&self, path: &CounterPath) -> usize {
        self.registry.listener_count(path)
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn write(&self, path: &CounterPath, value: CounterValue) -> Result<()> {
        let _gate = self.gate.lock().await;

        sqlx::query(
            r#"
            INSERT INTO counters (path, current, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                current = excluded.current,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(path.to_string())
        .bind(value.current)
        .bind(self.time_provider.now_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(path = %path, current = value.current, "Counter written");
        self.registry.notify(path, Some(value));
        Ok(())
    }

    async fn subscribe(&self, path: &CounterPath, listener: Listener) -> Result<Subscription> {
        let _gate = self.gate.lock().await;

        let current = self.read(path).await?;
        let (subscription, slot) = self.registry.register(*path, listener);
        ListenerRegistry::deliver(&slot, current);

        debug!(path = %path, "Subscribed");
        Ok(subscription)
    }
}
