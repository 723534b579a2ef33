//! HTTP API for the campus event participation service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Record endpoints** for events, students, and their registrations
//! - **Transition endpoints** for registering, marking attendance, and
//!   submitting feedback
//! - **Report endpoints** for the five participation reports
//! - **A minimal HTML page** (`GET /`) with entity counts and links
//!
//! # Architecture
//!
//! Handlers are thin: every rule lives in `campus-core`. Domain failures
//! become HTTP responses in exactly one place, [`error::status_for`].
//! The router is generic over the [`EntityStore`](campus_store::EntityStore)
//! backend, so the same routes serve the in-memory and `PostgreSQL`
//! stores.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::{ApiError, status_for};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
