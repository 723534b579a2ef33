//! Report row types produced by the reporting aggregator.
//!
//! Rates and averages are exact [`Decimal`] values rounded to two places,
//! serialized as strings so no precision is lost on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AttendanceStatus;
use crate::structs::{Event, Rating, Student};

/// Registration count for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventPopularity {
    /// The event.
    pub event: Event,
    /// Number of registrations for the event.
    pub total_registrations: u64,
}

/// Attendance rate for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventAttendance {
    /// The event.
    pub event: Event,
    /// Number of attendance records (present or absent).
    pub total_marked: u64,
    /// Number of attendance records marked present.
    pub present_count: u64,
    /// `present_count / total_marked * 100`, or 0 when nothing is marked.
    #[ts(as = "String")]
    pub attendance_rate: Decimal,
}

/// Average feedback rating for one event that has feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventFeedback {
    /// The event.
    pub event: Event,
    /// Number of feedback records.
    pub feedback_count: u64,
    /// Mean rating, two decimal places.
    #[ts(as = "String")]
    pub average_rating: Decimal,
}

/// One event a student attended, with that student's feedback if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AttendedEvent {
    /// The event.
    pub event: Event,
    /// Always [`AttendanceStatus::Present`]; absent events are not listed.
    pub attendance_status: AttendanceStatus,
    /// The student's rating, when feedback was submitted.
    pub feedback_rating: Option<Rating>,
    /// The student's comment, when feedback was submitted.
    pub feedback_comment: Option<String>,
}

/// Participation history of a single student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StudentParticipation {
    /// The student.
    pub student: Student,
    /// Number of events the student attended.
    pub events_attended: u64,
    /// Attended events, most recent first.
    pub events: Vec<AttendedEvent>,
}

/// A leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TopStudent {
    /// The student.
    pub student: Student,
    /// Number of events the student attended.
    pub events_attended: u64,
}
