//! Reporting aggregator.
//!
//! The five reports are pure functions of a [`Snapshot`], so a report is
//! always computed from one consistent point in time and never holds a
//! store lock while it sorts. [`ReportingAggregator`] only fetches the
//! snapshot and hands it over.
//!
//! Rates and averages are [`Decimal`], rounded half away from zero to two
//! places.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use campus_store::{EntityStore, Snapshot};
use campus_types::{
    AttendanceStatus, AttendedEvent, Event, EventAttendance, EventFeedback, EventId,
    EventPopularity, Feedback, ParticipationKey, StudentId, StudentParticipation, TopStudent,
};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::CampusError;

/// Maximum number of entries in the top-students report.
pub const TOP_STUDENTS_LIMIT: usize = 3;

/// Decimal places of every rate and average.
const REPORT_SCALE: u32 = 2;

fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(REPORT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(REPORT_SCALE);
    rounded
}

/// `part / whole * 100`, or zero when `whole` is zero.
fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        return round2(Decimal::ZERO);
    }
    // u64 * 100 always fits in the 96-bit mantissa.
    Decimal::from(part)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(whole)))
        .map_or(Decimal::ZERO, round2)
}

/// `sum / count`, or zero when `count` is zero.
fn mean(sum: u64, count: u64) -> Decimal {
    if count == 0 {
        return round2(Decimal::ZERO);
    }
    Decimal::from(sum)
        .checked_div(Decimal::from(count))
        .map_or(Decimal::ZERO, round2)
}

fn bump<K: Ord>(counts: &mut BTreeMap<K, u64>, key: K, by: u64) {
    let slot = counts.entry(key).or_insert(0);
    *slot = slot.saturating_add(by);
}

/// Title ascending, then id, as the last resort of every event ranking.
fn by_title(a: &Event, b: &Event) -> Ordering {
    a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
}

/// Registrations per event, most registered first, ties by title.
pub fn event_popularity(snapshot: &Snapshot) -> Vec<EventPopularity> {
    let mut counts = BTreeMap::new();
    for registration in &snapshot.registrations {
        bump(&mut counts, registration.event_id, 1);
    }

    let mut rows: Vec<_> = snapshot
        .events
        .iter()
        .map(|event| EventPopularity {
            event: event.clone(),
            total_registrations: counts.get(&event.id).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_registrations
            .cmp(&a.total_registrations)
            .then_with(|| by_title(&a.event, &b.event))
    });
    rows
}

/// Attendance rate per event, highest first, ties by title. Events with no
/// attendance rows are listed with a rate of zero.
pub fn attendance_report(snapshot: &Snapshot) -> Vec<EventAttendance> {
    let mut marked = BTreeMap::new();
    let mut present = BTreeMap::new();
    for row in &snapshot.attendance {
        bump(&mut marked, row.event_id, 1);
        if row.status.is_present() {
            bump(&mut present, row.event_id, 1);
        }
    }

    let mut rows: Vec<_> = snapshot
        .events
        .iter()
        .map(|event| {
            let total_marked = marked.get(&event.id).copied().unwrap_or(0);
            let present_count = present.get(&event.id).copied().unwrap_or(0);
            EventAttendance {
                event: event.clone(),
                total_marked,
                present_count,
                attendance_rate: percentage(present_count, total_marked),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.attendance_rate
            .cmp(&a.attendance_rate)
            .then_with(|| by_title(&a.event, &b.event))
    });
    rows
}

/// Average rating per event that has feedback, highest first, then most
/// feedback, then title. Events without feedback are left out.
pub fn feedback_report(snapshot: &Snapshot) -> Vec<EventFeedback> {
    let mut sums = BTreeMap::new();
    let mut counts = BTreeMap::new();
    for row in &snapshot.feedback {
        bump(&mut sums, row.event_id, u64::from(row.rating.get()));
        bump(&mut counts, row.event_id, 1);
    }

    let mut rows: Vec<_> = snapshot
        .events
        .iter()
        .filter_map(|event| {
            let count = counts.get(&event.id).copied().filter(|c| *c > 0)?;
            let sum = sums.get(&event.id).copied().unwrap_or(0);
            Some(EventFeedback {
                event: event.clone(),
                feedback_count: count,
                average_rating: mean(sum, count),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.average_rating
            .cmp(&a.average_rating)
            .then_with(|| b.feedback_count.cmp(&a.feedback_count))
            .then_with(|| by_title(&a.event, &b.event))
    });
    rows
}

/// Events the student attended, most recent first, each with the
/// student's own feedback. `None` when the student does not exist.
pub fn student_participation(
    snapshot: &Snapshot,
    student_id: StudentId,
) -> Option<StudentParticipation> {
    let student = snapshot.students.iter().find(|s| s.id == student_id)?;

    let events: BTreeMap<EventId, &Event> = snapshot.events.iter().map(|e| (e.id, e)).collect();
    let feedback: BTreeMap<ParticipationKey, &Feedback> = snapshot
        .feedback
        .iter()
        .filter(|f| f.student_id == student_id)
        .map(|f| (f.key(), f))
        .collect();

    let mut attended: Vec<AttendedEvent> = snapshot
        .attendance
        .iter()
        .filter(|row| row.student_id == student_id && row.status.is_present())
        .filter_map(|row| {
            let event = events.get(&row.event_id)?;
            let own = feedback.get(&row.key());
            Some(AttendedEvent {
                event: (*event).clone(),
                attendance_status: AttendanceStatus::Present,
                feedback_rating: own.map(|f| f.rating),
                feedback_comment: own.map(|f| f.comment.clone()),
            })
        })
        .collect();
    attended.sort_by(|a, b| {
        b.event
            .date
            .cmp(&a.event.date)
            .then_with(|| by_title(&a.event, &b.event))
    });

    Some(StudentParticipation {
        student: student.clone(),
        events_attended: u64::try_from(attended.len()).unwrap_or(u64::MAX),
        events: attended,
    })
}

/// Students ranked by events attended, ties by name, at most
/// [`TOP_STUDENTS_LIMIT`] entries. Students who attended nothing are not
/// ranked.
pub fn top_students(snapshot: &Snapshot) -> Vec<TopStudent> {
    let mut attended = BTreeMap::new();
    for row in &snapshot.attendance {
        if row.status.is_present() {
            bump(&mut attended, row.student_id, 1);
        }
    }

    let mut rows: Vec<_> = snapshot
        .students
        .iter()
        .filter_map(|student| {
            let events_attended = attended.get(&student.id).copied().filter(|n| *n > 0)?;
            Some(TopStudent {
                student: student.clone(),
                events_attended,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.events_attended
            .cmp(&a.events_attended)
            .then_with(|| a.student.name.cmp(&b.student.name))
            .then_with(|| a.student.id.cmp(&b.student.id))
    });
    rows.truncate(TOP_STUDENTS_LIMIT);
    rows
}

/// Read-only report facade over an [`EntityStore`].
#[derive(Debug, Clone)]
pub struct ReportingAggregator<S> {
    store: S,
}

impl<S: EntityStore> ReportingAggregator<S> {
    /// Create an aggregator over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    async fn snapshot(&self) -> Result<Snapshot, CampusError> {
        Ok(self.store.snapshot().await?)
    }

    /// `reportEventPopularity`.
    pub async fn event_popularity(&self) -> Result<Vec<EventPopularity>, CampusError> {
        let rows = event_popularity(&self.snapshot().await?);
        debug!(rows = rows.len(), "Popularity report computed");
        Ok(rows)
    }

    /// `reportAttendance`.
    pub async fn attendance(&self) -> Result<Vec<EventAttendance>, CampusError> {
        let rows = attendance_report(&self.snapshot().await?);
        debug!(rows = rows.len(), "Attendance report computed");
        Ok(rows)
    }

    /// `reportFeedback`.
    pub async fn feedback(&self) -> Result<Vec<EventFeedback>, CampusError> {
        let rows = feedback_report(&self.snapshot().await?);
        debug!(rows = rows.len(), "Feedback report computed");
        Ok(rows)
    }

    /// `reportStudentParticipation`.
    pub async fn student_participation(
        &self,
        student_id: StudentId,
    ) -> Result<StudentParticipation, CampusError> {
        let report = student_participation(&self.snapshot().await?, student_id)
            .ok_or_else(|| CampusError::NotFound(format!("student {student_id} not found")))?;
        debug!(%student_id, rows = report.events.len(), "Participation report computed");
        Ok(report)
    }

    /// `reportTopStudents`.
    pub async fn top_students(&self) -> Result<Vec<TopStudent>, CampusError> {
        let rows = top_students(&self.snapshot().await?);
        debug!(rows = rows.len(), "Top students report computed");
        Ok(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use campus_store::MemoryStore;
    use campus_types::{Attendance, AttendanceId, FeedbackId, Rating, Student};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::engine::ParticipationEngine;
    use crate::error::ErrorKind;
    use crate::requests::{
        CreateEventRequest, CreateStudentRequest, MarkAttendanceRequest, ParticipationRequest,
        SubmitFeedbackRequest,
    };

    fn event(title: &str, day: u32) -> Event {
        Event {
            id: EventId::new(),
            title: title.to_owned(),
            event_type: String::from("workshop"),
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            college: String::from("East Campus"),
            status: String::from("active"),
        }
    }

    fn student(name: &str) -> Student {
        Student {
            id: StudentId::new(),
            name: name.to_owned(),
            email: format!("{}@campus.edu", name.to_lowercase().replace(' ', ".")),
            college: String::from("East Campus"),
        }
    }

    fn present(student: &Student, event: &Event) -> Attendance {
        Attendance {
            id: AttendanceId::new(),
            student_id: student.id,
            event_id: event.id,
            status: AttendanceStatus::Present,
        }
    }

    fn feedback(student: &Student, event: &Event, rating: i64) -> Feedback {
        Feedback {
            id: FeedbackId::new(),
            student_id: student.id,
            event_id: event.id,
            rating: Rating::new(rating).unwrap(),
            comment: String::new(),
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(percentage(2, 3), dec!(66.67));
        assert_eq!(percentage(1, 3), dec!(33.33));
        assert_eq!(mean(9, 2), dec!(4.50));
        assert_eq!(percentage(1, 8).to_string(), "12.50");
    }

    #[test]
    fn zero_attendance_rate_is_zero() {
        let quiet = event("Quiet", 1);
        let snapshot = Snapshot {
            events: vec![quiet],
            ..Snapshot::default()
        };
        let rows = attendance_report(&snapshot);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_marked, 0);
        assert_eq!(rows[0].attendance_rate, Decimal::ZERO);
    }

    #[test]
    fn attendance_ranks_by_rate_then_title() {
        let full = event("Delta", 1);
        let half_b = event("Bravo", 2);
        let half_a = event("Alpha", 3);
        let unmarked = event("Aardvark", 4);
        let a = student("A");
        let b = student("B");
        let absent = |s: &Student, e: &Event| Attendance {
            status: AttendanceStatus::Absent,
            ..present(s, e)
        };
        let snapshot = Snapshot {
            events: vec![unmarked.clone(), half_b.clone(), full.clone(), half_a.clone()],
            attendance: vec![
                present(&a, &full),
                present(&b, &full),
                present(&a, &half_b),
                absent(&b, &half_b),
                absent(&a, &half_a),
                present(&b, &half_a),
            ],
            students: vec![a, b],
            ..Snapshot::default()
        };

        let rows = attendance_report(&snapshot);
        let order: Vec<_> = rows.iter().map(|row| row.event.title.as_str()).collect();
        assert_eq!(order, ["Delta", "Alpha", "Bravo", "Aardvark"]);
        let rates: Vec<_> = rows.iter().map(|row| row.attendance_rate).collect();
        assert_eq!(rates, [dec!(100.00), dec!(50.00), dec!(50.00), dec!(0.00)]);
        assert_eq!(rows[3].total_marked, 0);
        assert_eq!(rows[3].attendance_rate.to_string(), "0.00");
    }

    #[test]
    fn average_of_four_five_three_is_four() {
        let talk = event("Talk", 2);
        let silent = event("Silent", 3);
        let people: Vec<_> = ["A", "B", "C"].into_iter().map(student).collect();
        let snapshot = Snapshot {
            events: vec![talk.clone(), silent],
            feedback: people
                .iter()
                .zip([4, 5, 3])
                .map(|(s, r)| feedback(s, &talk, r))
                .collect(),
            students: people,
            ..Snapshot::default()
        };

        let rows = feedback_report(&snapshot);
        assert_eq!(rows.len(), 1, "events without feedback are excluded");
        assert_eq!(rows[0].event.id, talk.id);
        assert_eq!(rows[0].feedback_count, 3);
        assert_eq!(rows[0].average_rating, dec!(4.00));
        assert_eq!(rows[0].average_rating.to_string(), "4.00");
    }

    #[test]
    fn feedback_ties_break_on_count_then_title() {
        let busy = event("Zeta", 1);
        let single = event("Alpha", 2);
        let also_single = event("Beta", 3);
        let a = student("A");
        let b = student("B");
        let snapshot = Snapshot {
            events: vec![single.clone(), busy.clone(), also_single.clone()],
            feedback: vec![
                feedback(&a, &busy, 4),
                feedback(&b, &busy, 4),
                feedback(&a, &single, 4),
                feedback(&a, &also_single, 4),
            ],
            students: vec![a, b],
            ..Snapshot::default()
        };
        let order: Vec<_> = feedback_report(&snapshot)
            .into_iter()
            .map(|row| row.event.title)
            .collect();
        assert_eq!(order, ["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn popularity_ranks_by_count_then_title() {
        let small = event("Bravo", 1);
        let big = event("Charlie", 2);
        let tie = event("Alpha", 3);
        let s1 = student("One");
        let s2 = student("Two");
        let registration = |s: &Student, e: &Event| campus_types::Registration {
            id: campus_types::RegistrationId::new(),
            student_id: s.id,
            event_id: e.id,
            registration_date: chrono::Utc::now(),
        };
        let snapshot = Snapshot {
            registrations: vec![
                registration(&s1, &big),
                registration(&s2, &big),
                registration(&s1, &small),
                registration(&s2, &tie),
            ],
            events: vec![small, big, tie],
            students: vec![s1, s2],
            ..Snapshot::default()
        };
        let rows = event_popularity(&snapshot);
        let order: Vec<_> = rows
            .iter()
            .map(|row| (row.event.title.as_str(), row.total_registrations))
            .collect();
        assert_eq!(order, [("Charlie", 2), ("Alpha", 1), ("Bravo", 1)]);
    }

    #[test]
    fn top_students_is_capped_and_tie_broken_by_name() {
        let workshop = event("Workshop", 4);
        let names = [
            "Jo", "Ike", "Hal", "Gus", "Fay", "Eve", "Dee", "Cal", "Bea", "Ann",
        ];
        let students: Vec<_> = names.into_iter().map(student).collect();
        let snapshot = Snapshot {
            attendance: students.iter().map(|s| present(s, &workshop)).collect(),
            events: vec![workshop],
            students,
            ..Snapshot::default()
        };
        let rows = top_students(&snapshot);
        let ranked: Vec<_> = rows.iter().map(|r| r.student.name.as_str()).collect();
        assert_eq!(ranked, ["Ann", "Bea", "Cal"]);
        assert!(rows.iter().all(|r| r.events_attended == 1));
    }

    #[test]
    fn top_students_skips_students_who_attended_nothing() {
        let snapshot = Snapshot {
            students: vec![student("Idle")],
            ..Snapshot::default()
        };
        assert!(top_students(&snapshot).is_empty());
    }

    #[test]
    fn participation_lists_attended_events_newest_first() {
        let old = event("Old", 1);
        let new = event("New", 28);
        let missed = event("Missed", 15);
        let s = student("Dana");
        let mut absent = present(&s, &missed);
        absent.status = AttendanceStatus::Absent;
        let snapshot = Snapshot {
            attendance: vec![present(&s, &old), present(&s, &new), absent],
            feedback: vec![feedback(&s, &old, 2)],
            events: vec![old, new, missed],
            students: vec![s.clone()],
            ..Snapshot::default()
        };

        let report = student_participation(&snapshot, s.id).unwrap();
        assert_eq!(report.events_attended, 2);
        let titles: Vec<_> = report.events.iter().map(|e| e.event.title.as_str()).collect();
        assert_eq!(titles, ["New", "Old"]);
        assert_eq!(report.events[0].feedback_rating, None);
        assert_eq!(report.events[1].feedback_rating.map(Rating::get), Some(2));
        assert_eq!(report.events[1].feedback_comment.as_deref(), Some(""));

        assert!(student_participation(&snapshot, StudentId::new()).is_none());
    }

    #[tokio::test]
    async fn register_attend_feedback_scenario() {
        let store = MemoryStore::new();
        let engine = ParticipationEngine::new(store.clone());
        let reports = ReportingAggregator::new(store);

        let e1 = engine
            .create_event(&CreateEventRequest {
                title: Some(String::from("E1")),
                event_type: Some(String::from("hackathon")),
                date: NaiveDate::from_ymd_opt(2025, 6, 1),
                college: Some(String::from("East Campus")),
                status: None,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (name, email) in [("A", "a@campus.edu"), ("B", "b@campus.edu")] {
            let s = engine
                .create_student(&CreateStudentRequest {
                    name: Some(name.to_owned()),
                    email: Some(email.to_owned()),
                    college: Some(String::from("East Campus")),
                })
                .await
                .unwrap();
            engine
                .register(&ParticipationRequest::new(s.id, e1.id))
                .await
                .unwrap();
            ids.push(s.id);
        }
        let (a, b) = (ids[0], ids[1]);
        engine
            .mark_attendance(&MarkAttendanceRequest::new(a, e1.id, "present"))
            .await
            .unwrap();
        engine
            .mark_attendance(&MarkAttendanceRequest::new(b, e1.id, "absent"))
            .await
            .unwrap();
        engine
            .submit_feedback(&SubmitFeedbackRequest::new(a, e1.id, 5, Some("great")))
            .await
            .unwrap();

        let attendance = reports.attendance().await.unwrap();
        assert_eq!(attendance[0].present_count, 1);
        assert_eq!(attendance[0].total_marked, 2);
        assert_eq!(attendance[0].attendance_rate, dec!(50.00));

        let feedback = reports.feedback().await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].average_rating, dec!(5.00));
        assert_eq!(feedback[0].feedback_count, 1);

        let history_a = reports.student_participation(a).await.unwrap();
        assert_eq!(history_a.events_attended, 1);
        assert_eq!(history_a.events[0].event.id, e1.id);
        assert_eq!(history_a.events[0].feedback_rating.map(Rating::get), Some(5));

        let history_b = reports.student_participation(b).await.unwrap();
        assert_eq!(history_b.events_attended, 0);
        assert!(history_b.events.is_empty());

        let top = reports.top_students().await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].student.id, a);

        let err = reports
            .student_participation(StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
