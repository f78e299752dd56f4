// Port Layer - Interfaces for external dependencies

pub mod print_device;
pub mod settings_store;
pub mod state_store;
pub mod subscription;
pub mod time_provider;

// Re-exports
pub use print_device::{PrintDevice, PrintError, PrintOutcome};
pub use settings_store::SettingsStore;
pub use state_store::{read_once, StateStore};
pub use subscription::{Listener, ListenerRegistry, Snapshot, Subscription};
pub use time_provider::{SystemTimeProvider, TimeProvider};
