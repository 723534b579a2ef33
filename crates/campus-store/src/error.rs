//! Error types for the entity store.
//!
//! All errors are propagated via [`StoreError`]. [`StoreError::Conflict`]
//! is the only variant with domain meaning: it reports a uniqueness
//! violation detected by the store itself.

/// Errors that can occur in the entity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate email or
    /// duplicate registration pair).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be decoded into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
