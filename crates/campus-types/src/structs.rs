//! Core entity structs for campus participation tracking.
//!
//! Covers the five stored collections (`Event`, `Student`, `Registration`,
//! `Attendance`, `Feedback`), the [`Rating`] value type, and the
//! [`ParticipationKey`] that identifies one student's relationship to one
//! event.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AttendanceStatus;
use crate::ids::{AttendanceId, EventId, FeedbackId, RegistrationId, StudentId};

/// Status assigned to an event created without an explicit one.
pub const DEFAULT_EVENT_STATUS: &str = "active";

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A campus activity with a date, a type, and a hosting college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique identifier, immutable once created.
    pub id: EventId,
    /// Human-readable title.
    pub title: String,
    /// Kind of event (workshop, fest, seminar, ...).
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub event_type: String,
    /// Calendar date the event takes place on.
    pub date: NaiveDate,
    /// Hosting college.
    pub college: String,
    /// Free-form lifecycle status, `active` unless stated otherwise.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

/// A student who can register for and attend events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Student {
    /// Unique identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Normalized (trimmed, lowercase) email address, unique across students.
    pub email: String,
    /// College the student belongs to.
    pub college: String,
}

// ---------------------------------------------------------------------------
// Participation key
// ---------------------------------------------------------------------------

/// Natural key shared by registrations, attendance, and feedback.
///
/// Each (student, event) pair has at most one row in each of those
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ParticipationKey {
    /// The participating student.
    pub student_id: StudentId,
    /// The event participated in.
    pub event_id: EventId,
}

impl ParticipationKey {
    /// Build a key from its two halves.
    pub const fn new(student_id: StudentId, event_id: EventId) -> Self {
        Self {
            student_id,
            event_id,
        }
    }
}

impl fmt::Display for ParticipationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student {} / event {}", self.student_id, self.event_id)
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// A student's declared intent to participate in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Registration {
    /// Unique identifier.
    pub id: RegistrationId,
    /// The registered student.
    pub student_id: StudentId,
    /// The event registered for.
    pub event_id: EventId,
    /// When the registration was created.
    pub registration_date: DateTime<Utc>,
}

impl Registration {
    /// The (student, event) pair this registration belongs to.
    pub const fn key(&self) -> ParticipationKey {
        ParticipationKey::new(self.student_id, self.event_id)
    }
}

/// A registration joined with the registered student's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegistrationDetail {
    /// Registration identifier.
    pub registration_id: RegistrationId,
    /// The registered student.
    pub student_id: StudentId,
    /// The event registered for.
    pub event_id: EventId,
    /// When the registration was created.
    pub registration_date: DateTime<Utc>,
    /// Student display name.
    pub name: String,
    /// Student email.
    pub email: String,
    /// Student college.
    pub college: String,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Current attendance outcome for one student at one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Attendance {
    /// Unique identifier, kept when the status is replaced.
    pub id: AttendanceId,
    /// The student whose attendance is recorded.
    pub student_id: StudentId,
    /// The event attended (or missed).
    pub event_id: EventId,
    /// Present or absent.
    pub status: AttendanceStatus,
}

impl Attendance {
    /// The (student, event) pair this record belongs to.
    pub const fn key(&self) -> ParticipationKey {
        ParticipationKey::new(self.student_id, self.event_id)
    }
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Lowest accepted feedback rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted feedback rating.
pub const MAX_RATING: u8 = 5;

/// A feedback score in the inclusive range 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "i64", into = "u8")]
#[ts(export, export_to = "bindings/")]
pub struct Rating(u8);

impl Rating {
    /// Validate and wrap a raw score.
    ///
    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] when `value` is outside 1..=5.
    pub fn new(value: i64) -> Result<Self, RatingOutOfRange> {
        u8::try_from(value)
            .ok()
            .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
            .map(Self)
            .ok_or(RatingOutOfRange(value))
    }

    /// The raw score.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a score falls outside 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutOfRange(pub i64);

impl fmt::Display for RatingOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {}",
            self.0
        )
    }
}

impl std::error::Error for RatingOutOfRange {}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// A rating and optional comment left by a student who attended an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Feedback {
    /// Unique identifier, kept when the feedback is replaced.
    pub id: FeedbackId,
    /// The student giving feedback.
    pub student_id: StudentId,
    /// The event being rated.
    pub event_id: EventId,
    /// Score from 1 to 5.
    pub rating: Rating,
    /// Free-text comment, empty when none was given.
    pub comment: String,
}

impl Feedback {
    /// The (student, event) pair this record belongs to.
    pub const fn key(&self) -> ParticipationKey {
        ParticipationKey::new(self.student_id, self.event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_inclusive_bounds() {
        assert_eq!(Rating::new(1).map(Rating::get), Ok(1));
        assert_eq!(Rating::new(5).map(Rating::get), Ok(5));
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert_eq!(Rating::new(0), Err(RatingOutOfRange(0)));
        assert_eq!(Rating::new(6), Err(RatingOutOfRange(6)));
        assert_eq!(Rating::new(-3), Err(RatingOutOfRange(-3)));
        assert_eq!(Rating::new(261), Err(RatingOutOfRange(261)));
    }

    #[test]
    fn rating_deserialization_is_validated() {
        let ok: Result<Rating, _> = serde_json::from_str("4");
        assert_eq!(ok.ok().map(Rating::get), Some(4));
        let bad: Result<Rating, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }

    #[test]
    fn event_type_serializes_as_type() {
        let event = Event {
            id: EventId::new(),
            title: String::from("Robotics Workshop"),
            event_type: String::from("workshop"),
            date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap_or_default(),
            college: String::from("North Campus"),
            status: String::from(DEFAULT_EVENT_STATUS),
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["type"], "workshop");
        assert_eq!(json["date"], "2025-02-14");
        assert!(json.get("event_type").is_none());
    }

    #[test]
    fn keys_match_their_rows() {
        let student_id = StudentId::new();
        let event_id = EventId::new();
        let attendance = Attendance {
            id: AttendanceId::new(),
            student_id,
            event_id,
            status: AttendanceStatus::Present,
        };
        assert_eq!(attendance.key(), ParticipationKey::new(student_id, event_id));
    }
}
