//! Typed request structures, one per mutating operation.
//!
//! Requests are deserialized straight from transport payloads with every
//! field optional, so a missing field becomes a validation error naming
//! the field instead of an opaque decode failure. [`parse`] methods run
//! the `validator` rules and hand back a fully typed command; nothing
//! reaches the store until that succeeds.
//!
//! [`parse`]: CreateEventRequest::parse

use campus_types::{AttendanceStatus, DEFAULT_EVENT_STATUS, EventId, ParticipationKey, Rating, StudentId};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::error::CampusError;

/// Take a required text field, trimmed, rejecting blanks.
fn required_text(value: Option<&str>, field: &str) -> Result<String, CampusError> {
    let text = value.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(CampusError::Validation(format!(
            "missing required field: {field}"
        )));
    }
    Ok(text.to_owned())
}

/// Take a required non-text field.
fn required<T: Copy>(value: Option<T>, field: &str) -> Result<T, CampusError> {
    value.ok_or_else(|| CampusError::Validation(format!("missing required field: {field}")))
}

// ---------------------------------------------------------------------------
// createEvent
// ---------------------------------------------------------------------------

/// Payload of `createEvent`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateEventRequest {
    /// Event title.
    #[validate(
        required(message = "missing required field: title"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,
    /// Event type.
    #[serde(rename = "type")]
    #[validate(
        required(message = "missing required field: type"),
        length(min = 1, message = "type must not be empty")
    )]
    pub event_type: Option<String>,
    /// Event date, `YYYY-MM-DD`.
    #[validate(required(message = "missing required field: date"))]
    pub date: Option<NaiveDate>,
    /// Hosting college.
    #[validate(
        required(message = "missing required field: college"),
        length(min = 1, message = "college must not be empty")
    )]
    pub college: Option<String>,
    /// Optional status, `active` when omitted.
    pub status: Option<String>,
}

/// A validated `createEvent` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Trimmed title.
    pub title: String,
    /// Trimmed type.
    pub event_type: String,
    /// Event date.
    pub date: NaiveDate,
    /// Trimmed college.
    pub college: String,
    /// Status, defaulted.
    pub status: String,
}

impl CreateEventRequest {
    /// Validate into a [`NewEvent`].
    pub fn parse(&self) -> Result<NewEvent, CampusError> {
        self.validate()?;
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_EVENT_STATUS)
            .to_owned();
        Ok(NewEvent {
            title: required_text(self.title.as_deref(), "title")?,
            event_type: required_text(self.event_type.as_deref(), "type")?,
            date: required(self.date, "date")?,
            college: required_text(self.college.as_deref(), "college")?,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// createStudent
// ---------------------------------------------------------------------------

/// Payload of `createStudent`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateStudentRequest {
    /// Display name.
    #[validate(
        required(message = "missing required field: name"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
    /// Email address, unique across students. Checked after trimming.
    #[validate(required(message = "missing required field: email"))]
    pub email: Option<String>,
    /// College the student belongs to.
    #[validate(
        required(message = "missing required field: college"),
        length(min = 1, message = "college must not be empty")
    )]
    pub college: Option<String>,
}

/// A validated `createStudent` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Trimmed name.
    pub name: String,
    /// Trimmed, lowercased email.
    pub email: String,
    /// Trimmed college.
    pub college: String,
}

impl CreateStudentRequest {
    /// Validate into a [`NewStudent`], normalizing the email.
    pub fn parse(&self) -> Result<NewStudent, CampusError> {
        self.validate()?;
        let email = required_text(self.email.as_deref(), "email")?.to_lowercase();
        if !email.validate_email() {
            return Err(CampusError::Validation(String::from(
                "email: email must be a valid address",
            )));
        }
        Ok(NewStudent {
            name: required_text(self.name.as_deref(), "name")?,
            email,
            college: required_text(self.college.as_deref(), "college")?,
        })
    }
}

// ---------------------------------------------------------------------------
// register / lookups
// ---------------------------------------------------------------------------

/// A (student, event) pair: the payload of `register` and the query of
/// `getAttendance` / `getFeedback`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ParticipationRequest {
    /// Student id.
    #[validate(required(message = "missing required field: student_id"))]
    pub student_id: Option<Uuid>,
    /// Event id.
    #[validate(required(message = "missing required field: event_id"))]
    pub event_id: Option<Uuid>,
}

/// The payload of `register`.
pub type RegisterRequest = ParticipationRequest;

impl ParticipationRequest {
    /// Build a complete request.
    pub const fn new(student_id: StudentId, event_id: EventId) -> Self {
        Self {
            student_id: Some(student_id.into_inner()),
            event_id: Some(event_id.into_inner()),
        }
    }

    /// Validate into a [`ParticipationKey`].
    pub fn parse(&self) -> Result<ParticipationKey, CampusError> {
        self.validate()?;
        Ok(ParticipationKey::new(
            StudentId::from(required(self.student_id, "student_id")?),
            EventId::from(required(self.event_id, "event_id")?),
        ))
    }
}

// ---------------------------------------------------------------------------
// markAttendance
// ---------------------------------------------------------------------------

/// Payload of `markAttendance`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    /// Student id.
    #[validate(required(message = "missing required field: student_id"))]
    pub student_id: Option<Uuid>,
    /// Event id.
    #[validate(required(message = "missing required field: event_id"))]
    pub event_id: Option<Uuid>,
    /// `present` or `absent`.
    #[validate(required(message = "missing required field: status"))]
    pub status: Option<String>,
}

/// A validated `markAttendance` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAttendance {
    /// The pair being marked.
    pub key: ParticipationKey,
    /// The new status.
    pub status: AttendanceStatus,
}

impl MarkAttendanceRequest {
    /// Build a complete request.
    pub fn new(student_id: StudentId, event_id: EventId, status: &str) -> Self {
        Self {
            student_id: Some(student_id.into_inner()),
            event_id: Some(event_id.into_inner()),
            status: Some(status.to_owned()),
        }
    }

    /// Validate into a [`MarkAttendance`] command.
    pub fn parse(&self) -> Result<MarkAttendance, CampusError> {
        self.validate()?;
        let status = self
            .status
            .as_deref()
            .unwrap_or_default()
            .parse::<AttendanceStatus>()
            .map_err(|e| CampusError::Validation(e.to_string()))?;
        Ok(MarkAttendance {
            key: ParticipationKey::new(
                StudentId::from(required(self.student_id, "student_id")?),
                EventId::from(required(self.event_id, "event_id")?),
            ),
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// submitFeedback
// ---------------------------------------------------------------------------

/// Payload of `submitFeedback`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    /// Student id.
    #[validate(required(message = "missing required field: student_id"))]
    pub student_id: Option<Uuid>,
    /// Event id.
    #[validate(required(message = "missing required field: event_id"))]
    pub event_id: Option<Uuid>,
    /// Integer score 1 to 5.
    #[validate(
        required(message = "missing required field: rating"),
        range(min = 1, max = 5, message = "rating must be between 1 and 5")
    )]
    pub rating: Option<i64>,
    /// Optional comment, empty when omitted.
    pub comment: Option<String>,
}

/// A validated `submitFeedback` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedback {
    /// The pair giving feedback.
    pub key: ParticipationKey,
    /// Score.
    pub rating: Rating,
    /// Comment, possibly empty.
    pub comment: String,
}

impl SubmitFeedbackRequest {
    /// Build a complete request.
    pub fn new(student_id: StudentId, event_id: EventId, rating: i64, comment: Option<&str>) -> Self {
        Self {
            student_id: Some(student_id.into_inner()),
            event_id: Some(event_id.into_inner()),
            rating: Some(rating),
            comment: comment.map(str::to_owned),
        }
    }

    /// Validate into a [`SubmitFeedback`] command.
    pub fn parse(&self) -> Result<SubmitFeedback, CampusError> {
        self.validate()?;
        let rating = Rating::new(required(self.rating, "rating")?)
            .map_err(|e| CampusError::Validation(e.to_string()))?;
        Ok(SubmitFeedback {
            key: ParticipationKey::new(
                StudentId::from(required(self.student_id, "student_id")?),
                EventId::from(required(self.event_id, "event_id")?),
            ),
            rating,
            comment: self.comment.clone().unwrap_or_default(),
        })
    }
}
