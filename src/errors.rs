use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Typed failures surfaced by every store operation and handler.
///
/// Business-rule violations carry a user-facing message; store failures are
/// logged with context where they occur and collapse to
/// `ExternalDependencyFailed` so internals never leak to callers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Invalid payment signature")]
    PaymentVerificationFailed,
    #[error("A dependent service is unavailable, please retry")]
    ExternalDependencyFailed,
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // A racing insert that slipped past a pre-check lands on a unique
        // index; that is a business conflict, not an outage.
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
            return AppError::Conflict(format!("Duplicate record: {msg}"));
        }
        tracing::error!("database error: {err}");
        AppError::ExternalDependencyFailed
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::PaymentVerificationFailed => StatusCode::BAD_REQUEST,
            AppError::ExternalDependencyFailed => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::PaymentVerificationFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ExternalDependencyFailed.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn external_failure_hides_detail() {
        let err = AppError::from(DbErr::Custom("connection refused at 10.0.0.3".into()));
        assert!(!err.to_string().contains("10.0.0.3"));
    }
}
