//! Read-only lookups over the entity store.
//!
//! Listing order is the store's; this layer only turns absent rows into
//! [`CampusError::NotFound`].

use campus_store::EntityStore;
use campus_types::{Attendance, Event, EventId, Feedback, RegistrationDetail, Student, StudentId};

use crate::error::CampusError;
use crate::requests::ParticipationRequest;

/// Entity counts reported by the health check and the index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct EntityCounts {
    /// Number of events.
    pub events: u64,
    /// Number of students.
    pub students: u64,
}

/// Lookups for events, students, registrations, attendance and feedback.
#[derive(Debug, Clone)]
pub struct Directory<S> {
    store: S,
}

impl<S: EntityStore> Directory<S> {
    /// Create a directory over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// `listEvents`: most recent date first.
    pub async fn list_events(&self) -> Result<Vec<Event>, CampusError> {
        Ok(self.store.list_events().await?)
    }

    /// `getEvent`.
    pub async fn get_event(&self, id: EventId) -> Result<Event, CampusError> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| CampusError::NotFound(format!("event {id} not found")))
    }

    /// `listStudents`: by name.
    pub async fn list_students(&self) -> Result<Vec<Student>, CampusError> {
        Ok(self.store.list_students().await?)
    }

    /// `getStudent`.
    pub async fn get_student(&self, id: StudentId) -> Result<Student, CampusError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| CampusError::NotFound(format!("student {id} not found")))
    }

    /// `listRegistrationsForEvent`: oldest registration first. An unknown
    /// event simply has no registrations.
    pub async fn list_registrations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<RegistrationDetail>, CampusError> {
        Ok(self.store.list_registrations_for_event(event_id).await?)
    }

    /// `getAttendance`: the current status for a pair.
    pub async fn get_attendance(
        &self,
        request: &ParticipationRequest,
    ) -> Result<Attendance, CampusError> {
        let key = request.parse()?;
        self.store
            .get_attendance(key)
            .await?
            .ok_or_else(|| CampusError::NotFound(format!("no attendance for {key}")))
    }

    /// `getFeedback`: the current feedback for a pair.
    pub async fn get_feedback(
        &self,
        request: &ParticipationRequest,
    ) -> Result<Feedback, CampusError> {
        let key = request.parse()?;
        self.store
            .get_feedback(key)
            .await?
            .ok_or_else(|| CampusError::NotFound(format!("no feedback for {key}")))
    }

    /// Event and student totals.
    pub async fn counts(&self) -> Result<EntityCounts, CampusError> {
        Ok(EntityCounts {
            events: self.store.count_events().await?,
            students: self.store.count_students().await?,
        })
    }
}
