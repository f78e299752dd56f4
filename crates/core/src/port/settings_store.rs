// Settings Store Port (Interface)
//
// Device-local key/value persistence. Unlike the StateStore this is not
// shared between stations.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a raw value, `None` when never set
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a raw value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory SettingsStore
    #[derive(Default)]
    pub struct MockSettingsStore {
        values: Mutex<HashMap<String, String>>,
        fail: AtomicBool,
    }

    impl MockSettingsStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, key: &str, value: &str) -> Self {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Store("settings unavailable".to_string()));
            }
            Ok(self.raw(key))
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Store("settings unavailable".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
