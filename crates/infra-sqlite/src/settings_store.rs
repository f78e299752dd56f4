// SQLite SettingsStore Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use queueboard_core::error::Result;
use queueboard_core::port::{SettingsStore, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteSettingsStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(self.time_provider.now_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use queueboard_core::application::{PrinterSettings, PRINTER_ADDRESS_KEY};
    use queueboard_core::port::time_provider::SystemTimeProvider;

    async fn setup_store() -> SqliteSettingsStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteSettingsStore::new(pool, Arc::new(SystemTimeProvider))
    }

    #[tokio::test]
    async fn test_get_set_overwrite() {
        let store = setup_store().await;

        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set(PRINTER_ADDRESS_KEY, "10.0.0.1").await.unwrap();
        store.set(PRINTER_ADDRESS_KEY, "10.0.0.2").await.unwrap();

        assert_eq!(
            store.get(PRINTER_ADDRESS_KEY).await.unwrap().as_deref(),
            Some("10.0.0.2")
        );
    }

    #[tokio::test]
    async fn test_printer_settings_survive_reload() {
        let store: Arc<dyn SettingsStore> = Arc::new(setup_store().await);

        let settings = PrinterSettings::load(Arc::clone(&store)).await;
        settings.update("192.168.0.50").await.unwrap();

        let reloaded = PrinterSettings::load(store).await;
        assert_eq!(reloaded.address().as_str(), "192.168.0.50");
    }
}
