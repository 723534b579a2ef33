//! Storage traits shared by every backend.
//!
//! [`EntityStore`] is the cloneable handle the rule engine and the
//! reporting aggregator receive. Reads go straight through the handle;
//! every write goes through a [`StoreTx`] obtained from
//! [`EntityStore::begin`], so a precondition check and the mutation it
//! guards land as one atomic unit.
//!
//! A [`StoreTx`] that is dropped without [`StoreTx::commit`] rolls back
//! every write made through it. That covers both explicit failure paths
//! and a request future cancelled mid-transition.

use std::future::Future;

use campus_types::{
    Attendance, Event, EventId, Feedback, ParticipationKey, Registration, RegistrationDetail,
    Student, StudentId,
};

use crate::error::StoreError;

/// A consistent copy of all five collections, used for reporting.
///
/// Collections carry no particular order; the aggregator sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// All events.
    pub events: Vec<Event>,
    /// All students.
    pub students: Vec<Student>,
    /// All registrations.
    pub registrations: Vec<Registration>,
    /// All attendance records.
    pub attendance: Vec<Attendance>,
    /// All feedback records.
    pub feedback: Vec<Feedback>,
}

/// Exclusive-owner keyed storage for events, students, registrations,
/// attendance, and feedback.
///
/// Listing operations return rows in their defined order:
/// events by date descending then title, students by name, registrations
/// of an event by registration date.
pub trait EntityStore: Clone + Send + Sync + 'static {
    /// The atomic write unit for this backend.
    type Tx: StoreTx;

    /// Open an atomic write unit.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;

    /// Fetch an event, `None` when absent.
    fn get_event(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    /// All events, most recent date first, ties by title.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;

    /// Fetch a student, `None` when absent.
    fn get_student(
        &self,
        id: StudentId,
    ) -> impl Future<Output = Result<Option<Student>, StoreError>> + Send;

    /// All students ordered by name.
    fn list_students(&self) -> impl Future<Output = Result<Vec<Student>, StoreError>> + Send;

    /// Registrations of one event joined with student details, oldest first.
    fn list_registrations_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<RegistrationDetail>, StoreError>> + Send;

    /// Current attendance for a (student, event) pair.
    fn get_attendance(
        &self,
        key: ParticipationKey,
    ) -> impl Future<Output = Result<Option<Attendance>, StoreError>> + Send;

    /// Current feedback for a (student, event) pair.
    fn get_feedback(
        &self,
        key: ParticipationKey,
    ) -> impl Future<Output = Result<Option<Feedback>, StoreError>> + Send;

    /// Number of stored events.
    fn count_events(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Number of stored students.
    fn count_students(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Read all five collections from a single consistent point in time.
    fn snapshot(&self) -> impl Future<Output = Result<Snapshot, StoreError>> + Send;
}

/// An open atomic write unit.
///
/// No other operation observes the writes made through a transaction
/// until [`commit`](StoreTx::commit) returns, and a transaction dropped
/// before commit leaves the store exactly as it was.
pub trait StoreTx: Send {
    /// Whether an event with this id exists.
    fn event_exists(
        &mut self,
        id: EventId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Whether a student with this id exists.
    fn student_exists(
        &mut self,
        id: StudentId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Whether a student already uses this (normalized) email.
    fn email_taken(
        &mut self,
        email: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Insert a new event.
    fn insert_event(&mut self, event: Event) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert a new student.
    ///
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    fn insert_student(
        &mut self,
        student: Student,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The registration for a (student, event) pair, if any.
    fn find_registration(
        &mut self,
        key: ParticipationKey,
    ) -> impl Future<Output = Result<Option<Registration>, StoreError>> + Send;

    /// Insert a new registration.
    ///
    /// Fails with [`StoreError::Conflict`] when the pair is already
    /// registered.
    fn insert_registration(
        &mut self,
        registration: Registration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The attendance record for a (student, event) pair, if any.
    fn find_attendance(
        &mut self,
        key: ParticipationKey,
    ) -> impl Future<Output = Result<Option<Attendance>, StoreError>> + Send;

    /// Insert the record, or replace the status of the existing record
    /// with the same key in place. Returns the stored row; its id is the
    /// id of the existing record when one was replaced.
    fn insert_or_replace_attendance(
        &mut self,
        attendance: Attendance,
    ) -> impl Future<Output = Result<Attendance, StoreError>> + Send;

    /// Insert the record, or replace rating and comment of the existing
    /// record with the same key in place. Returns the stored row.
    fn insert_or_replace_feedback(
        &mut self,
        feedback: Feedback,
    ) -> impl Future<Output = Result<Feedback, StoreError>> + Send;

    /// Make every write of this transaction visible.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
