//! Participation rule engine and reporting aggregator for the campus
//! event service.
//!
//! The core sits between the transport layer and the entity store:
//!
//! ```text
//!   transport ──► requests (validate) ──► ParticipationEngine ──► StoreTx
//!             └─────────────────────────► Directory / ReportingAggregator ──► EntityStore
//! ```
//!
//! Nothing here knows about HTTP. Failures are [`CampusError`]s carrying
//! an [`ErrorKind`] the transport maps to its own status codes.
//!
//! # Modules
//!
//! - [`engine`] -- register, mark attendance, submit feedback, create records
//! - [`directory`] -- lookups and listings
//! - [`reports`] -- the five participation reports
//! - [`requests`] -- typed, validated request payloads
//! - [`config`] -- YAML configuration with environment overrides
//! - [`seed`] -- demo data for an empty store
//! - [`error`] -- the domain error taxonomy

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod reports;
pub mod requests;
pub mod seed;

pub use config::{
    CampusConfig, ConfigError, ListenConfig, LogFormat, LoggingConfig, SeedConfig, StoreBackend,
    StoreConfig,
};
pub use directory::{Directory, EntityCounts};
pub use engine::ParticipationEngine;
pub use error::{CampusError, ErrorKind};
pub use reports::{ReportingAggregator, TOP_STUDENTS_LIMIT};
pub use requests::{
    CreateEventRequest, CreateStudentRequest, MarkAttendanceRequest, ParticipationRequest,
    RegisterRequest, SubmitFeedbackRequest,
};
pub use seed::{SeedSummary, seed_demo_data};
