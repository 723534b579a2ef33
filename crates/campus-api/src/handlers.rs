//! REST API endpoint handlers for the campus service.
//!
//! Handlers are generic over the [`EntityStore`] backend. They unpack
//! the request, call the rule engine, directory, or report aggregator
//! through the shared [`AppState`], and shape the JSON response. No rule
//! is checked here.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML status page |
//! | `GET` | `/api/health` | Liveness plus entity counts |
//! | `GET` | `/api/events` | List events, most recent first |
//! | `POST` | `/api/events` | Create an event |
//! | `GET` | `/api/events/{id}` | Single event |
//! | `GET` | `/api/events/{id}/registrations` | Registrations with student details |
//! | `GET` | `/api/students` | List students by name |
//! | `POST` | `/api/students` | Create a student |
//! | `GET` | `/api/students/{id}` | Single student |
//! | `POST` | `/api/registrations` | Register a student for an event |
//! | `POST` | `/api/attendance` | Mark attendance (replaces prior status) |
//! | `GET` | `/api/attendance?student_id=&event_id=` | Current attendance |
//! | `POST` | `/api/feedback` | Submit feedback (replaces prior feedback) |
//! | `GET` | `/api/feedback?student_id=&event_id=` | Current feedback |
//! | `GET` | `/api/reports/event-popularity` | Registrations per event |
//! | `GET` | `/api/reports/attendance` | Attendance rate per event |
//! | `GET` | `/api/reports/feedback` | Average rating per event |
//! | `GET` | `/api/reports/student-participation/{id}` | One student's history |
//! | `GET` | `/api/reports/top-students` | Top three attendees |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use campus_core::{
    CreateEventRequest, CreateStudentRequest, MarkAttendanceRequest, ParticipationRequest,
    RegisterRequest, SubmitFeedbackRequest,
};
use campus_store::EntityStore;
use campus_types::{EventId, StudentId};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}

// ---------------------------------------------------------------------------
// GET / -- HTML status page
// ---------------------------------------------------------------------------

/// Serve a small HTML page with entity counts and API links.
pub async fn index<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.directory.counts().await?;
    let events = counts.events;
    let students = counts.students;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Campus Events</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .get {{ color: #7ee787; font-weight: bold; }}
        .post {{ color: #d2a8ff; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Campus Events</h1>
    <p class="subtitle">Registrations, attendance, feedback and participation reports</p>

    <div>
        <div class="metric">
            <div class="label">Events</div>
            <div class="value">{events}</div>
        </div>
        <div class="metric">
            <div class="label">Students</div>
            <div class="value">{students}</div>
        </div>
    </div>

    <hr>

    <h2>Records</h2>
    <ul>
        <li><span class="get">GET</span> <a href="/api/events">/api/events</a></li>
        <li><span class="get">GET</span> /api/events/{{id}} and /api/events/{{id}}/registrations</li>
        <li><span class="get">GET</span> <a href="/api/students">/api/students</a></li>
        <li><span class="get">GET</span> /api/students/{{id}}</li>
        <li><span class="post">POST</span> /api/events, /api/students</li>
        <li><span class="post">POST</span> /api/registrations, /api/attendance, /api/feedback</li>
    </ul>

    <h2>Reports</h2>
    <ul>
        <li><span class="get">GET</span> <a href="/api/reports/event-popularity">/api/reports/event-popularity</a></li>
        <li><span class="get">GET</span> <a href="/api/reports/attendance">/api/reports/attendance</a></li>
        <li><span class="get">GET</span> <a href="/api/reports/feedback">/api/reports/feedback</a></li>
        <li><span class="get">GET</span> /api/reports/student-participation/{{id}}</li>
        <li><span class="get">GET</span> <a href="/api/reports/top-students">/api/reports/top-students</a></li>
    </ul>
</body>
</html>"#
    )))
}

/// Liveness plus entity counts. A failing store surfaces as 500.
pub async fn health<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.directory.counts().await?;
    Ok(Json(json!({
        "status": "ok",
        "events": counts.events,
        "students": counts.students,
    })))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// List all events.
pub async fn list_events<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.directory.list_events().await?;
    Ok(Json(json!({
        "count": events.len(),
        "events": events,
    })))
}

/// Return a single event.
pub async fn get_event<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EventId::from(parse_uuid(&id_str)?);
    let event = state.directory.get_event(id).await?;
    Ok(Json(json!({ "event": event })))
}

/// Create an event.
pub async fn create_event<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let event = state.engine.create_event(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully",
            "event_id": event.id,
        })),
    ))
}

/// Registrations of one event joined with student details.
pub async fn list_event_registrations<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = EventId::from(parse_uuid(&id_str)?);
    let registrations = state.directory.list_registrations_for_event(id).await?;
    Ok(Json(json!({
        "count": registrations.len(),
        "registrations": registrations,
    })))
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// List all students.
pub async fn list_students<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let students = state.directory.list_students().await?;
    Ok(Json(json!({
        "count": students.len(),
        "students": students,
    })))
}

/// Return a single student.
pub async fn get_student<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = StudentId::from(parse_uuid(&id_str)?);
    let student = state.directory.get_student(id).await?;
    Ok(Json(json!({ "student": student })))
}

/// Create a student.
pub async fn create_student<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let student = state.engine.create_student(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Student created successfully",
            "student_id": student.id,
        })),
    ))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Register a student for an event.
pub async fn register<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let id = state.engine.register(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "registration_id": id,
        })),
    ))
}

/// Mark a registered student present or absent.
pub async fn mark_attendance<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let id = state.engine.mark_attendance(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Attendance marked successfully",
            "attendance_id": id,
        })),
    ))
}

/// Current attendance for a (student, event) pair.
pub async fn get_attendance<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ParticipationRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(request) = query?;
    let attendance = state.directory.get_attendance(&request).await?;
    Ok(Json(json!({ "attendance": attendance })))
}

/// Submit feedback for an attended event.
pub async fn submit_feedback<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let id = state.engine.submit_feedback(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Feedback submitted successfully",
            "feedback_id": id,
        })),
    ))
}

/// Current feedback for a (student, event) pair.
pub async fn get_feedback<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ParticipationRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(request) = query?;
    let feedback = state.directory.get_feedback(&request).await?;
    Ok(Json(json!({ "feedback": feedback })))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Registrations per event, most popular first.
pub async fn report_event_popularity<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.reports.event_popularity().await?;
    Ok(Json(json!({
        "report_type": "event_popularity",
        "events": events,
    })))
}

/// Attendance rate per event.
pub async fn report_attendance<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.reports.attendance().await?;
    Ok(Json(json!({
        "report_type": "attendance",
        "events": events,
    })))
}

/// Average rating per event with feedback.
pub async fn report_feedback<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.reports.feedback().await?;
    Ok(Json(json!({
        "report_type": "feedback",
        "events": events,
    })))
}

/// Events one student attended, with that student's feedback.
pub async fn report_student_participation<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = StudentId::from(parse_uuid(&id_str)?);
    let report = state.reports.student_participation(id).await?;
    Ok(Json(json!({
        "report_type": "student_participation",
        "student": report.student,
        "events_attended": report.events_attended,
        "events": report.events,
    })))
}

/// The three students with the most attended events.
pub async fn report_top_students<S: EntityStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let students = state.reports.top_students().await?;
    Ok(Json(json!({
        "report_type": "top_students",
        "students": students,
    })))
}
