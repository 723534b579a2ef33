//! Error types for the campus HTTP API.
//!
//! [`ApiError`] wraps domain failures plus the transport's own rejections
//! and converts into an Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//! [`status_for`] is the only place an error kind becomes a status code.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_core::{CampusError, ErrorKind};
use tracing::error;

/// Response status for each domain error kind.
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Precondition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A rule engine, directory or report failure.
    #[error(transparent)]
    Campus(#[from] CampusError),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The request body was not acceptable JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The query string could not be decoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl ApiError {
    /// The domain kind this error reports as.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Campus(err) => err.kind(),
            Self::InvalidUuid(_) | Self::MalformedBody(_) | Self::InvalidQuery(_) => {
                ErrorKind::Validation
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);

        let message = match &self {
            Self::Campus(CampusError::Internal(detail)) => {
                error!(%detail, "Internal error while handling request");
                String::from("internal server error")
            }
            Self::Campus(err) => err.message().to_owned(),
            Self::InvalidUuid(msg) | Self::MalformedBody(msg) | Self::InvalidQuery(msg) => {
                msg.clone()
            }
        };

        let body = serde_json::json!({
            "error": message,
            "kind": kind.as_str(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_its_status() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::Precondition),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn transport_rejections_are_validation_errors() {
        assert_eq!(
            ApiError::InvalidUuid(String::from("abc")).kind(),
            ErrorKind::Validation
        );
        let response = ApiError::MalformedBody(String::from("EOF")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let response =
            ApiError::from(CampusError::Internal(String::from("pool timed out"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
