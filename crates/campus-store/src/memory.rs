//! In-memory entity store.
//!
//! All five collections live behind one [`tokio::sync::RwLock`]. A
//! [`MemoryTx`] owns the write guard for its whole lifetime, so
//! transactions are serialized and no reader ever sees a half-applied
//! transition. Each write pushes an undo step; dropping an uncommitted
//! transaction replays the undo log in reverse before the guard is
//! released.

use std::collections::BTreeMap;
use std::sync::Arc;

use campus_types::{
    Attendance, Event, EventId, Feedback, ParticipationKey, Registration, RegistrationDetail,
    Student, StudentId,
};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::error::StoreError;
use crate::store::{EntityStore, Snapshot, StoreTx};

/// The five collections plus the email uniqueness index.
#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<EventId, Event>,
    students: BTreeMap<StudentId, Student>,
    emails: BTreeMap<String, StudentId>,
    registrations: BTreeMap<ParticipationKey, Registration>,
    attendance: BTreeMap<ParticipationKey, Attendance>,
    feedback: BTreeMap<ParticipationKey, Feedback>,
}

impl Tables {
    fn revert(&mut self, step: Undo) {
        match step {
            Undo::Event(id) => {
                self.events.remove(&id);
            }
            Undo::Student { id, email } => {
                self.students.remove(&id);
                self.emails.remove(&email);
            }
            Undo::Registration(key) => {
                self.registrations.remove(&key);
            }
            Undo::Attendance { key, previous } => match previous {
                Some(row) => {
                    self.attendance.insert(key, row);
                }
                None => {
                    self.attendance.remove(&key);
                }
            },
            Undo::Feedback { key, previous } => match previous {
                Some(row) => {
                    self.feedback.insert(key, row);
                }
                None => {
                    self.feedback.remove(&key);
                }
            },
        }
    }
}

/// One reversible write.
#[derive(Debug)]
enum Undo {
    Event(EventId),
    Student { id: StudentId, email: String },
    Registration(ParticipationKey),
    Attendance {
        key: ParticipationKey,
        previous: Option<Attendance>,
    },
    Feedback {
        key: ParticipationKey,
        previous: Option<Feedback>,
    },
}

/// Process-local [`EntityStore`] backed by ordered maps.
///
/// Cloning the handle shares the underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl EntityStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let tables = Arc::clone(&self.tables).write_owned().await;
        Ok(MemoryTx {
            tables,
            undo: Vec::new(),
            committed: false,
        })
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.tables.read().await.events.values().cloned().collect();
        events.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(events)
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> =
            self.tables.read().await.students.values().cloned().collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn list_registrations_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<RegistrationDetail>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<RegistrationDetail> = tables
            .registrations
            .values()
            .filter(|r| r.event_id == event_id)
            .filter_map(|r| {
                tables.students.get(&r.student_id).map(|s| RegistrationDetail {
                    registration_id: r.id,
                    student_id: r.student_id,
                    event_id: r.event_id,
                    registration_date: r.registration_date,
                    name: s.name.clone(),
                    email: s.email.clone(),
                    college: s.college.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.registration_date
                .cmp(&b.registration_date)
                .then_with(|| a.registration_id.cmp(&b.registration_id))
        });
        Ok(rows)
    }

    async fn get_attendance(
        &self,
        key: ParticipationKey,
    ) -> Result<Option<Attendance>, StoreError> {
        Ok(self.tables.read().await.attendance.get(&key).cloned())
    }

    async fn get_feedback(&self, key: ParticipationKey) -> Result<Option<Feedback>, StoreError> {
        Ok(self.tables.read().await.feedback.get(&key).cloned())
    }

    async fn count_events(&self) -> Result<u64, StoreError> {
        Ok(count(self.tables.read().await.events.len()))
    }

    async fn count_students(&self) -> Result<u64, StoreError> {
        Ok(count(self.tables.read().await.students.len()))
    }

    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let tables = self.tables.read().await;
        Ok(Snapshot {
            events: tables.events.values().cloned().collect(),
            students: tables.students.values().cloned().collect(),
            registrations: tables.registrations.values().cloned().collect(),
            attendance: tables.attendance.values().cloned().collect(),
            feedback: tables.feedback.values().cloned().collect(),
        })
    }
}

/// Write transaction over a [`MemoryStore`].
///
/// Holds the store's write lock until committed or dropped.
pub struct MemoryTx {
    tables: OwnedRwLockWriteGuard<Tables>,
    undo: Vec<Undo>,
    committed: bool,
}

impl core::fmt::Debug for MemoryTx {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryTx")
            .field("pending_writes", &self.undo.len())
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

impl StoreTx for MemoryTx {
    async fn event_exists(&mut self, id: EventId) -> Result<bool, StoreError> {
        Ok(self.tables.events.contains_key(&id))
    }

    async fn student_exists(&mut self, id: StudentId) -> Result<bool, StoreError> {
        Ok(self.tables.students.contains_key(&id))
    }

    async fn email_taken(&mut self, email: &str) -> Result<bool, StoreError> {
        Ok(self.tables.emails.contains_key(email))
    }

    async fn insert_event(&mut self, event: Event) -> Result<(), StoreError> {
        let id = event.id;
        self.tables.events.insert(id, event);
        self.undo.push(Undo::Event(id));
        Ok(())
    }

    async fn insert_student(&mut self, student: Student) -> Result<(), StoreError> {
        if self.tables.emails.contains_key(&student.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already exists",
                student.email
            )));
        }
        let id = student.id;
        let email = student.email.clone();
        self.tables.emails.insert(email.clone(), id);
        self.tables.students.insert(id, student);
        self.undo.push(Undo::Student { id, email });
        Ok(())
    }

    async fn find_registration(
        &mut self,
        key: ParticipationKey,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self.tables.registrations.get(&key).cloned())
    }

    async fn insert_registration(&mut self, registration: Registration) -> Result<(), StoreError> {
        let key = registration.key();
        if self.tables.registrations.contains_key(&key) {
            return Err(StoreError::Conflict(format!("{key} is already registered")));
        }
        self.tables.registrations.insert(key, registration);
        self.undo.push(Undo::Registration(key));
        Ok(())
    }

    async fn find_attendance(
        &mut self,
        key: ParticipationKey,
    ) -> Result<Option<Attendance>, StoreError> {
        Ok(self.tables.attendance.get(&key).cloned())
    }

    async fn insert_or_replace_attendance(
        &mut self,
        attendance: Attendance,
    ) -> Result<Attendance, StoreError> {
        let key = attendance.key();
        let previous = self.tables.attendance.get(&key).cloned();
        let stored = match &previous {
            Some(existing) => Attendance {
                id: existing.id,
                ..attendance
            },
            None => attendance,
        };
        self.tables.attendance.insert(key, stored.clone());
        self.undo.push(Undo::Attendance { key, previous });
        Ok(stored)
    }

    async fn insert_or_replace_feedback(
        &mut self,
        feedback: Feedback,
    ) -> Result<Feedback, StoreError> {
        let key = feedback.key();
        let previous = self.tables.feedback.get(&key).cloned();
        let stored = match &previous {
            Some(existing) => Feedback {
                id: existing.id,
                ..feedback
            },
            None => feedback,
        };
        self.tables.feedback.insert(key, stored.clone());
        self.undo.push(Undo::Feedback { key, previous });
        Ok(stored)
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        self.committed = true;
        self.undo.clear();
        Ok(())
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        if self.committed || self.undo.is_empty() {
            return;
        }
        let writes = self.undo.len();
        while let Some(step) = self.undo.pop() {
            self.tables.revert(step);
        }
        tracing::debug!(writes, "Rolled back uncommitted memory transaction");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use campus_types::{
        AttendanceId, AttendanceStatus, DEFAULT_EVENT_STATUS, FeedbackId, Rating, RegistrationId,
    };
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn event(title: &str, date: (i32, u32, u32)) -> Event {
        Event {
            id: EventId::new(),
            title: title.to_owned(),
            event_type: String::from("seminar"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            college: String::from("North Campus"),
            status: String::from(DEFAULT_EVENT_STATUS),
        }
    }

    fn student(name: &str, email: &str) -> Student {
        Student {
            id: StudentId::new(),
            name: name.to_owned(),
            email: email.to_owned(),
            college: String::from("North Campus"),
        }
    }

    fn attendance(key: ParticipationKey, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: AttendanceId::new(),
            student_id: key.student_id,
            event_id: key.event_id,
            status,
        }
    }

    async fn seed_pair(store: &MemoryStore) -> ParticipationKey {
        let e = event("Hackathon", (2025, 3, 1));
        let s = student("Asha", "asha@campus.edu");
        let key = ParticipationKey::new(s.id, e.id);
        let mut tx = store.begin().await.unwrap();
        tx.insert_event(e).await.unwrap();
        tx.insert_student(s).await.unwrap();
        tx.commit().await.unwrap();
        key
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;
        assert!(store.get_event(key.event_id).await.unwrap().is_some());
        assert!(store.get_student(key.student_id).await.unwrap().is_some());
        assert_eq!(store.count_events().await.unwrap(), 1);
        assert_eq!(store.count_students().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back_every_write() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_registration(Registration {
                id: RegistrationId::new(),
                student_id: key.student_id,
                event_id: key.event_id,
                registration_date: Utc::now(),
            })
            .await
            .unwrap();
            tx.insert_or_replace_attendance(attendance(key, AttendanceStatus::Present))
                .await
                .unwrap();
            tx.insert_student(student("Ravi", "ravi@campus.edu"))
                .await
                .unwrap();
            // Dropped without commit.
        }

        let snapshot = store.snapshot().await.unwrap();
        assert!(snapshot.registrations.is_empty());
        assert!(snapshot.attendance.is_empty());
        assert_eq!(snapshot.students.len(), 1);

        // The email index was rolled back too.
        let mut tx = store.begin().await.unwrap();
        assert!(!tx.email_taken("ravi@campus.edu").await.unwrap());
    }

    #[tokio::test]
    async fn rollback_restores_replaced_rows() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;

        let mut tx = store.begin().await.unwrap();
        let first = tx
            .insert_or_replace_attendance(attendance(key, AttendanceStatus::Present))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_or_replace_attendance(attendance(key, AttendanceStatus::Absent))
                .await
                .unwrap();
        }

        assert_eq!(store.get_attendance(key).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_student(student("Asha", "asha@campus.edu"))
            .await
            .unwrap();
        let result = tx
            .insert_student(student("Asha Two", "asha@campus.edu"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;
        let registration = || Registration {
            id: RegistrationId::new(),
            student_id: key.student_id,
            event_id: key.event_id,
            registration_date: Utc::now(),
        };

        let mut tx = store.begin().await.unwrap();
        tx.insert_registration(registration()).await.unwrap();
        let result = tx.insert_registration(registration()).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn replace_keeps_the_original_id() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;

        let mut tx = store.begin().await.unwrap();
        let first = tx
            .insert_or_replace_feedback(Feedback {
                id: FeedbackId::new(),
                student_id: key.student_id,
                event_id: key.event_id,
                rating: Rating::new(3).unwrap(),
                comment: String::new(),
            })
            .await
            .unwrap();
        let second = tx
            .insert_or_replace_feedback(Feedback {
                id: FeedbackId::new(),
                student_id: key.student_id,
                event_id: key.event_id,
                rating: Rating::new(5).unwrap(),
                comment: String::from("better second time"),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first.id, second.id);
        let stored = store.get_feedback(key).await.unwrap().unwrap();
        assert_eq!(stored.rating.get(), 5);
        assert_eq!(stored.comment, "better second time");
        assert_eq!(store.snapshot().await.unwrap().feedback.len(), 1);
    }

    #[tokio::test]
    async fn listings_follow_their_defined_order() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_event(event("Career Fair", (2025, 1, 10))).await.unwrap();
        tx.insert_event(event("Tech Talk", (2025, 4, 2))).await.unwrap();
        tx.insert_event(event("Art Expo", (2025, 4, 2))).await.unwrap();
        tx.insert_student(student("Zoya", "zoya@campus.edu")).await.unwrap();
        tx.insert_student(student("Arun", "arun@campus.edu")).await.unwrap();
        tx.commit().await.unwrap();

        let titles: Vec<String> = store
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Art Expo", "Tech Talk", "Career Fair"]);

        let names: Vec<String> = store
            .list_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Arun", "Zoya"]);
    }

    #[tokio::test]
    async fn listings_compare_text_bytewise() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_event(event("art walk", (2025, 4, 2))).await.unwrap();
        tx.insert_event(event("Zine Fair", (2025, 4, 2))).await.unwrap();
        tx.insert_student(student("bea", "bea@campus.edu")).await.unwrap();
        tx.insert_student(student("Zed", "zed@campus.edu")).await.unwrap();
        tx.commit().await.unwrap();

        let titles: Vec<String> = store
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Zine Fair", "art walk"]);

        let names: Vec<String> = store
            .list_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Zed", "bea"]);
    }

    #[tokio::test]
    async fn registrations_for_event_join_student_fields() {
        let store = MemoryStore::new();
        let key = seed_pair(&store).await;
        let mut tx = store.begin().await.unwrap();
        tx.insert_registration(Registration {
            id: RegistrationId::new(),
            student_id: key.student_id,
            event_id: key.event_id,
            registration_date: Utc::now(),
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let rows = store.list_registrations_for_event(key.event_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Asha");
        assert_eq!(rows[0].email, "asha@campus.edu");

        let other = store
            .list_registrations_for_event(EventId::new())
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
