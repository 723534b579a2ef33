//! Entity store for the campus event participation service.
//!
//! The store exclusively owns the five keyed collections (events,
//! students, registrations, attendance, feedback). Callers receive a
//! cloneable [`EntityStore`] handle; all writes run inside a [`StoreTx`]
//! so precondition checks and the writes they guard are atomic.
//!
//! # Backends
//!
//! ```text
//! EntityStore
//!     |
//!     +-- MemoryStore    (RwLock over ordered maps, undo-log rollback)
//!     |
//!     +-- PostgresStore  (sqlx pool, one DB transaction per StoreTx)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`EntityStore`] and [`StoreTx`] traits, [`Snapshot`]
//! - [`memory`] -- In-process backend
//! - [`postgres`] -- `PostgreSQL` backend and pool configuration
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::{MemoryStore, MemoryTx};
pub use postgres::{PgTx, PostgresConfig, PostgresStore};
pub use store::{EntityStore, Snapshot, StoreTx};
