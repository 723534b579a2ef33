//! Axum router construction for the campus API.
//!
//! Assembles every route into a single [`Router`] with CORS and request
//! tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use campus_store::EntityStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router over the given store backend.
///
/// See [`handlers`] for the endpoint table.
///
/// CORS allows any origin so the dashboard can be served from elsewhere.
pub fn build_router<S: EntityStore>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status
        .route("/", get(handlers::index::<S>))
        .route("/api/health", get(handlers::health::<S>))
        // Records
        .route(
            "/api/events",
            get(handlers::list_events::<S>).post(handlers::create_event::<S>),
        )
        .route("/api/events/{id}", get(handlers::get_event::<S>))
        .route(
            "/api/events/{id}/registrations",
            get(handlers::list_event_registrations::<S>),
        )
        .route(
            "/api/students",
            get(handlers::list_students::<S>).post(handlers::create_student::<S>),
        )
        .route("/api/students/{id}", get(handlers::get_student::<S>))
        // Transitions
        .route("/api/registrations", post(handlers::register::<S>))
        .route(
            "/api/attendance",
            get(handlers::get_attendance::<S>).post(handlers::mark_attendance::<S>),
        )
        .route(
            "/api/feedback",
            get(handlers::get_feedback::<S>).post(handlers::submit_feedback::<S>),
        )
        // Reports
        .route(
            "/api/reports/event-popularity",
            get(handlers::report_event_popularity::<S>),
        )
        .route(
            "/api/reports/attendance",
            get(handlers::report_attendance::<S>),
        )
        .route("/api/reports/feedback", get(handlers::report_feedback::<S>))
        .route(
            "/api/reports/student-participation/{id}",
            get(handlers::report_student_participation::<S>),
        )
        .route(
            "/api/reports/top-students",
            get(handlers::report_top_students::<S>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
