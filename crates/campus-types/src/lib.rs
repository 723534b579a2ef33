//! Shared type definitions for the campus event participation service.
//!
//! This crate is the single source of truth for the records the store
//! persists and the reports the aggregator computes. Types defined here
//! flow to `TypeScript` via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all record identifiers
//! - [`enums`] -- Attendance status
//! - [`structs`] -- Stored entities, the participation key, and ratings
//! - [`reports`] -- Rows returned by the five participation reports

pub mod enums;
pub mod ids;
pub mod reports;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AttendanceStatus, UnknownAttendanceStatus};
pub use ids::{AttendanceId, EventId, FeedbackId, RegistrationId, StudentId};
pub use reports::{
    AttendedEvent, EventAttendance, EventFeedback, EventPopularity, StudentParticipation,
    TopStudent,
};
pub use structs::{
    Attendance, DEFAULT_EVENT_STATUS, Event, Feedback, MAX_RATING, MIN_RATING,
    ParticipationKey, Rating, RatingOutOfRange, Registration, RegistrationDetail, Student,
};
