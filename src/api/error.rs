//! Mapping of transport-level failures into desk errors.
//!
//! The backend reports business errors inside a `200` envelope; anything
//! else (timeouts, connection failures, bare HTTP statuses) ends up here.

use std::fmt;

use crate::error::DeskError;

use super::Operation;

/// Transport failure for a single operation.
#[derive(Debug)]
pub struct ApiError {
    /// Operation that failed
    pub operation: Operation,
    /// HTTP status code, if a response was received
    pub status: Option<reqwest::StatusCode>,
    /// Human-readable error message
    pub message: String,
    timed_out: bool,
}

impl ApiError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn with_status(operation: Operation, status: reqwest::StatusCode) -> Self {
        Self {
            operation,
            status: Some(status),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
            timed_out: false,
        }
    }

    /// Build from a reqwest failure, keeping whether it was a timeout.
    pub fn from_reqwest(operation: Operation, error: &reqwest::Error) -> Self {
        Self {
            operation,
            status: error.status(),
            message: error.to_string(),
            timed_out: error.is_timeout(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status
            .is_some_and(|s| s == reqwest::StatusCode::UNAUTHORIZED)
    }

    pub fn to_desk_error(&self) -> DeskError {
        if self.timed_out {
            return DeskError::Timeout(self.operation.to_string());
        }
        if self.is_unauthorized() {
            return DeskError::NotLoggedIn;
        }
        match self.status {
            Some(status) => DeskError::Status {
                operation: self.operation.to_string(),
                status: status.as_u16(),
            },
            None => DeskError::Unreachable(format!("{}: {}", self.operation, self.message)),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

impl From<ApiError> for DeskError {
    fn from(error: ApiError) -> Self {
        error.to_desk_error()
    }
}
