//! Tagged service errors and their HTTP mapping.
//!
//! Every fallible service operation returns [`ServiceError`]; the variant, not
//! the message text, decides the HTTP status. Infrastructure failures are
//! logged with full detail server-side and surfaced with a generic body.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("service temporarily unavailable")]
    Infra(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// HTTP status for this error kind. Conflicts map to 400 rather than 409
    /// so clients receive the instructive message on the same path as
    /// validation failures.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Infra(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Infra(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        if let ServiceError::Infra(detail) = &self {
            error!(detail = %detail, "infrastructure error");
        }

        let payload = Json(ErrorBody {
            error: self.to_string(),
        });

        (self.status(), payload).into_response()
    }
}

/// True when `err` is a unique-constraint violation on the named constraint.
///
/// Career completions and squad tags both rely on unique constraints as the
/// physical guard against racing writers; callers turn the losing writer's
/// violation into an idempotent or instructive outcome.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
                && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::conflict("taken").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::auth("nope").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServiceError::forbidden("role").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::not_found("gone").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Infra("connection refused".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_infra_body_is_generic() {
        let err = ServiceError::Infra("password authentication failed for user".into());
        assert_eq!(err.to_string(), "service temporarily unavailable");
    }
}
