//! Storage backends for youthdesk.
//!
//! All backends implement the `youthdesk_core` `HistoryStore` and
//! `PolicyCatalog` traits. The SQLite backend is the production default;
//! the in-memory backend serves tests and ephemeral dev runs.

pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
