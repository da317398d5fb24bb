// Potluck Registry - Core Library
// Exposes the record store and admin workflow for the CLI, the API server, and tests

pub mod admin;
pub mod config;
pub mod entities;
pub mod error;
pub mod resolver;
pub mod store;
pub mod summary;
pub mod workflow;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use admin::AdminGate;
pub use config::{ConfigError, ServerConfig};
pub use entities::{CategoryRegistry, Entry, EntryRef, DEFAULT_CATEGORIES};
pub use error::{PersistenceError, StoreError, StoreResult};
pub use resolver::{resolve, resolve_expected};
pub use store::{EntryStore, DEFAULT_LOCK_TIMEOUT, HEADER};
pub use summary::{summarize, CategorySummary};
pub use workflow::{export_file_name, Potluck};

#[cfg(feature = "server")]
pub use api::{build_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
