//! Demo data for a fresh store.
//!
//! Every row goes through [`ParticipationEngine`], so seeded data obeys
//! the same register -> attend -> feedback rules as live traffic.

use campus_store::EntityStore;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::engine::ParticipationEngine;
use crate::error::CampusError;
use crate::requests::{
    CreateEventRequest, CreateStudentRequest, MarkAttendanceRequest, RegisterRequest,
    SubmitFeedbackRequest,
};

/// (title, type, year, month, day, college)
const EVENTS: &[(&str, &str, i32, u32, u32, &str)] = &[
    ("Intro to Systems Programming", "workshop", 2025, 2, 12, "Engineering"),
    ("Spring Hackathon", "hackathon", 2025, 3, 8, "Engineering"),
    ("Careers in Data Science", "seminar", 2025, 3, 20, "Sciences"),
    ("Cultural Night", "fest", 2025, 4, 5, "Arts"),
];

/// (name, email, college)
const STUDENTS: &[(&str, &str, &str)] = &[
    ("Aarav Mehta", "aarav.mehta@campus.edu", "Engineering"),
    ("Bianca Rossi", "bianca.rossi@campus.edu", "Sciences"),
    ("Chen Wei", "chen.wei@campus.edu", "Engineering"),
    ("Dara Okafor", "dara.okafor@campus.edu", "Arts"),
    ("Elif Yilmaz", "elif.yilmaz@campus.edu", "Sciences"),
    ("Farah Haddad", "farah.haddad@campus.edu", "Arts"),
    ("Gabriel Silva", "gabriel.silva@campus.edu", "Engineering"),
    ("Hana Sato", "hana.sato@campus.edu", "Sciences"),
];

/// One participation: (student index, event index, attendance, feedback).
type Plan = (usize, usize, Option<&'static str>, Option<(i64, &'static str)>);

const PARTICIPATION: &[Plan] = &[
    (0, 0, Some("present"), Some((5, "Clear and hands-on"))),
    (2, 0, Some("present"), Some((4, ""))),
    (6, 0, Some("absent"), None),
    (0, 1, Some("present"), Some((4, "Great mentors"))),
    (2, 1, Some("present"), Some((5, "Would join again"))),
    (6, 1, Some("present"), None),
    (4, 1, Some("absent"), None),
    (1, 2, Some("present"), Some((3, "A bit rushed"))),
    (4, 2, Some("present"), Some((4, ""))),
    (7, 2, None, None),
    (3, 3, Some("present"), Some((5, "Loved the music"))),
    (5, 3, Some("present"), Some((5, ""))),
    (0, 3, Some("present"), None),
    (7, 3, Some("absent"), None),
];

/// What [`seed_demo_data`] created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Events created.
    pub events: usize,
    /// Students created.
    pub students: usize,
    /// Registrations created.
    pub registrations: usize,
    /// Attendance records created.
    pub attendance: usize,
    /// Feedback records created.
    pub feedback: usize,
}

/// Populate the store with demo records.
///
/// Returns `None` without writing anything when the store already holds
/// events or students.
pub async fn seed_demo_data<S: EntityStore>(
    engine: &ParticipationEngine<S>,
) -> Result<Option<SeedSummary>, CampusError> {
    let store = engine.store();
    if store.count_events().await? > 0 || store.count_students().await? > 0 {
        info!("Store not empty, skipping demo data");
        return Ok(None);
    }

    let mut events = Vec::with_capacity(EVENTS.len());
    for &(title, event_type, year, month, day, college) in EVENTS {
        let event = engine
            .create_event(&CreateEventRequest {
                title: Some(title.to_owned()),
                event_type: Some(event_type.to_owned()),
                date: NaiveDate::from_ymd_opt(year, month, day),
                college: Some(college.to_owned()),
                status: None,
            })
            .await?;
        events.push(event.id);
    }

    let mut students = Vec::with_capacity(STUDENTS.len());
    for &(name, email, college) in STUDENTS {
        let student = engine
            .create_student(&CreateStudentRequest {
                name: Some(name.to_owned()),
                email: Some(email.to_owned()),
                college: Some(college.to_owned()),
            })
            .await?;
        students.push(student.id);
    }

    let mut summary = SeedSummary {
        events: events.len(),
        students: students.len(),
        ..SeedSummary::default()
    };
    for &(student, event, attendance, feedback) in PARTICIPATION {
        let (Some(&student_id), Some(&event_id)) = (students.get(student), events.get(event))
        else {
            return Err(CampusError::Internal(String::from(
                "demo participation refers to an unknown record",
            )));
        };

        engine
            .register(&RegisterRequest::new(student_id, event_id))
            .await?;
        summary.registrations = summary.registrations.saturating_add(1);

        if let Some(status) = attendance {
            engine
                .mark_attendance(&MarkAttendanceRequest::new(student_id, event_id, status))
                .await?;
            summary.attendance = summary.attendance.saturating_add(1);
        }
        if let Some((rating, comment)) = feedback {
            engine
                .submit_feedback(&SubmitFeedbackRequest::new(
                    student_id,
                    event_id,
                    rating,
                    Some(comment),
                ))
                .await?;
            summary.feedback = summary.feedback.saturating_add(1);
        }
    }

    info!(
        events = summary.events,
        students = summary.students,
        registrations = summary.registrations,
        attendance = summary.attendance,
        feedback = summary.feedback,
        "Demo data seeded"
    );
    Ok(Some(summary))
}
