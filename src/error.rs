use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use crate::models::checkout::FieldErrors;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("nightly rate cannot be negative")]
    InvalidRate,
    #[error("room allows at most {max_guests} guests, got {requested}")]
    GuestLimitExceeded { requested: u32, max_guests: u32 },
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("cannot {action} while on the {step} step")]
    InvalidTransition {
        action: &'static str,
        step: &'static str,
    },
    #[error("insufficient permissions")]
    PermissionDenied,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Submission(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl From<mongodb::error::Error> for BookingError {
    fn from(err: mongodb::error::Error) -> Self {
        BookingError::Repository(err.to_string())
    }
}

impl ResponseError for BookingError {
    fn status_code(&self) -> StatusCode {
        match self {
            BookingError::InvalidDateRange { .. }
            | BookingError::InvalidRate
            | BookingError::GuestLimitExceeded { .. }
            | BookingError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::InvalidTransition { .. } | BookingError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            BookingError::PermissionDenied => StatusCode::FORBIDDEN,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Submission(_) | BookingError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            BookingError::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            BookingError::Repository(detail) => {
                log::error!("Repository failure: {}", detail);
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let invalid = BookingError::InvalidDateRange {
            check_in: date,
            check_out: date,
        };
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BookingError::Validation(FieldErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            BookingError::NotFound("Booking".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_range_message_names_dates() {
        let err = BookingError::InvalidDateRange {
            check_in: NaiveDate::from_ymd_opt(2024, 2, 18).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "check-out 2024-02-15 must be after check-in 2024-02-18"
        );
    }
}
