use crate::models::CORRECT_REQUEST_BODY;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PointsEngineError>;

#[derive(Error, Debug)]
pub enum PointsEngineError {
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Points must be greater than zero.")]
    InvalidSpend(i64),

    #[error("Not enough total points across all payers to cover this spend.")]
    InsufficientPoints { requested: i64, available: i64 },

    #[error("This spend would take a payer balance out of range.")]
    OutOfRange(String),

    #[error("Ledger error: {0}")]
    Ledger(points_ledger::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<points_ledger::Error> for PointsEngineError {
    fn from(err: points_ledger::Error) -> Self {
        match err {
            points_ledger::Error::InvalidSpend(amount) => PointsEngineError::InvalidSpend(amount),
            points_ledger::Error::InsufficientPoints { requested, available } => {
                PointsEngineError::InsufficientPoints { requested, available }
            }
            points_ledger::Error::InvalidContribution(reason) => {
                PointsEngineError::Validation(vec![reason])
            }
            points_ledger::Error::Overflow(reason) => PointsEngineError::OutOfRange(reason),
            other => PointsEngineError::Ledger(other),
        }
    }
}

impl From<serde_json::Error> for PointsEngineError {
    fn from(err: serde_json::Error) -> Self {
        PointsEngineError::Internal(format!("JSON serialization error: {}", err))
    }
}

impl ResponseError for PointsEngineError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let body = match self {
            PointsEngineError::Validation(errors) => json!({
                "message": CORRECT_REQUEST_BODY,
                "error": errors,
            }),
            PointsEngineError::InsufficientPoints { requested, available } => json!({
                "message": self.to_string(),
                "error": {
                    "code": status_code.as_u16(),
                    "type": self.error_type(),
                    "requested": requested,
                    "available": available,
                }
            }),
            PointsEngineError::Ledger(_) | PointsEngineError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                json!({
                    "message": "An error has occurred.",
                    "error": {
                        "code": status_code.as_u16(),
                        "type": self.error_type(),
                    }
                })
            }
            PointsEngineError::InvalidSpend(_) | PointsEngineError::OutOfRange(_) => json!({
                "message": self.to_string(),
                "error": {
                    "code": status_code.as_u16(),
                    "type": self.error_type(),
                }
            }),
        };

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PointsEngineError::Validation(_) => StatusCode::BAD_REQUEST,
            PointsEngineError::InvalidSpend(_) => StatusCode::BAD_REQUEST,
            PointsEngineError::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PointsEngineError::OutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PointsEngineError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PointsEngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl PointsEngineError {
    fn error_type(&self) -> &str {
        match self {
            PointsEngineError::Validation(_) => "validation_error",
            PointsEngineError::InvalidSpend(_) => "invalid_argument",
            PointsEngineError::InsufficientPoints { .. } => "insufficient_points",
            PointsEngineError::OutOfRange(_) => "out_of_range",
            PointsEngineError::Ledger(_) => "ledger_error",
            PointsEngineError::Internal(_) => "internal_error",
        }
    }
}
