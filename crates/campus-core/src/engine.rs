//! Participation rule engine.
//!
//! Per (student, event) pair a relationship moves forward through
//!
//! ```text
//! UNREGISTERED -> REGISTERED -> ATTENDANCE{present|absent} -> FEEDBACK
//!                                         (feedback only from present)
//! ```
//!
//! Every transition opens one store transaction, checks its precondition
//! inside it, writes, and commits. Any early return drops the
//! transaction, which rolls back whatever was written through it.

use campus_store::{EntityStore, StoreTx};
use campus_types::{
    Attendance, AttendanceId, AttendanceStatus, Event, EventId, Feedback, FeedbackId,
    Registration, RegistrationId, Student, StudentId,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::CampusError;
use crate::requests::{
    CreateEventRequest, CreateStudentRequest, MarkAttendanceRequest, RegisterRequest,
    SubmitFeedbackRequest,
};

/// Validates and executes state transitions against an [`EntityStore`].
///
/// Holds nothing but the store handle; cloning is cheap.
#[derive(Debug, Clone)]
pub struct ParticipationEngine<S> {
    store: S,
}

impl<S: EntityStore> ParticipationEngine<S> {
    /// Create an engine over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// `createEvent`: always allowed once the payload validates.
    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, CampusError> {
        let new = request.parse()?;
        let event = Event {
            id: EventId::new(),
            title: new.title,
            event_type: new.event_type,
            date: new.date,
            college: new.college,
            status: new.status,
        };

        let mut tx = self.store.begin().await?;
        tx.insert_event(event.clone()).await?;
        tx.commit().await?;

        info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// `createStudent`: rejects an email already in use.
    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Student, CampusError> {
        let new = request.parse()?;

        let mut tx = self.store.begin().await?;
        if tx.email_taken(&new.email).await? {
            warn!(email = %new.email, "Student rejected: email already exists");
            return Err(CampusError::Conflict(String::from("email already exists")));
        }
        let student = Student {
            id: StudentId::new(),
            name: new.name,
            email: new.email,
            college: new.college,
        };
        tx.insert_student(student.clone()).await?;
        tx.commit().await?;

        info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    /// `register`: both records must exist and the pair must be new.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegistrationId, CampusError> {
        let key = request.parse()?;

        let mut tx = self.store.begin().await?;
        if !tx.student_exists(key.student_id).await? {
            warn!(%key, "Registration rejected: unknown student");
            return Err(CampusError::NotFound(format!(
                "student {} not found",
                key.student_id
            )));
        }
        if !tx.event_exists(key.event_id).await? {
            warn!(%key, "Registration rejected: unknown event");
            return Err(CampusError::NotFound(format!(
                "event {} not found",
                key.event_id
            )));
        }
        if tx.find_registration(key).await?.is_some() {
            warn!(%key, "Registration rejected: already registered");
            return Err(already_registered());
        }

        let registration = Registration {
            id: RegistrationId::new(),
            student_id: key.student_id,
            event_id: key.event_id,
            registration_date: Utc::now(),
        };
        let id = registration.id;
        // The store's own uniqueness check still applies if a concurrent
        // writer got in first.
        tx.insert_registration(registration)
            .await
            .map_err(|err| match CampusError::from(err) {
                CampusError::Conflict(_) => already_registered(),
                other => other,
            })?;
        tx.commit().await?;

        info!(%key, registration_id = %id, "Student registered");
        Ok(id)
    }

    /// `markAttendance`: requires a registration; replaces any prior status.
    pub async fn mark_attendance(
        &self,
        request: &MarkAttendanceRequest,
    ) -> Result<AttendanceId, CampusError> {
        let command = request.parse()?;
        let key = command.key;

        let mut tx = self.store.begin().await?;
        if tx.find_registration(key).await?.is_none() {
            warn!(%key, "Attendance rejected: not registered");
            return Err(CampusError::Precondition(String::from(
                "student must be registered for the event first",
            )));
        }

        let stored = tx
            .insert_or_replace_attendance(Attendance {
                id: AttendanceId::new(),
                student_id: key.student_id,
                event_id: key.event_id,
                status: command.status,
            })
            .await?;
        tx.commit().await?;

        info!(%key, attendance_id = %stored.id, status = %stored.status, "Attendance marked");
        Ok(stored.id)
    }

    /// `submitFeedback`: requires present attendance; replaces any prior
    /// feedback.
    pub async fn submit_feedback(
        &self,
        request: &SubmitFeedbackRequest,
    ) -> Result<FeedbackId, CampusError> {
        let command = request.parse()?;
        let key = command.key;

        let mut tx = self.store.begin().await?;
        let attended = tx
            .find_attendance(key)
            .await?
            .is_some_and(|row| row.status == AttendanceStatus::Present);
        if !attended {
            warn!(%key, "Feedback rejected: no present attendance");
            return Err(CampusError::Precondition(String::from(
                "feedback allowed only for attended events",
            )));
        }

        let stored = tx
            .insert_or_replace_feedback(Feedback {
                id: FeedbackId::new(),
                student_id: key.student_id,
                event_id: key.event_id,
                rating: command.rating,
                comment: command.comment,
            })
            .await?;
        tx.commit().await?;

        info!(%key, feedback_id = %stored.id, rating = %stored.rating, "Feedback submitted");
        Ok(stored.id)
    }
}

fn already_registered() -> CampusError {
    CampusError::Conflict(String::from("student already registered for this event"))
}
