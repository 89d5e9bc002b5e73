//! Essence engine: an idle-clicker economy core.
//!
//! `engine` holds the pure game rules over a single `Session`. `runtime`
//! wires a session to a clock, a fixed-timestep tick source and a
//! key-value store for hosts such as a browser page.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod storage;
pub mod time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{Catalog, Command, Notification, PurchaseAmount, Session};
pub use error::{CatalogError, ConfigError, EngineError, StorageError};
pub use runtime::Runtime;
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
