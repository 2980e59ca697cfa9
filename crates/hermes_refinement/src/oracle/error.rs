use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Worth retrying, the same request may succeed later.
    Transient,
    /// The request itself is wrong and is never retried.
    Validation,
    /// The job finished but its result cannot be used. Asking again returns
    /// the same result.
    Unusable,
}

/// Reason an oracle gave for rejecting an instance, read from the structured
/// `code` of its error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionCode {
    Capacity,
    TimeWindow,
    MalformedInstance,
    Other,
}

impl RejectionCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "capacity" | "invalid_capacity" => RejectionCode::Capacity,
            "time_window" | "invalid_time_window" => RejectionCode::TimeWindow,
            "malformed" | "malformed_instance" | "invalid_input" => RejectionCode::MalformedInstance,
            _ => RejectionCode::Other,
        }
    }
}

impl Display for RejectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RejectionCode::Capacity => "capacity",
                RejectionCode::TimeWindow => "time_window",
                RejectionCode::MalformedInstance => "malformed_instance",
                RejectionCode::Other => "other",
            }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("instance rejected ({code}): {message}")]
    Rejected { code: RejectionCode, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unusable solution: {0}")]
    InvalidSolution(String),
}

impl OracleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OracleError::Transport(_)
            | OracleError::Server { .. }
            | OracleError::MalformedResponse(_) => ErrorCategory::Transient,
            OracleError::Rejected { .. } => ErrorCategory::Validation,
            OracleError::InvalidSolution(_) => ErrorCategory::Unusable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_validation() {
        let error = OracleError::Rejected {
            code: RejectionCode::Capacity,
            message: "vehicle 3 has no capacity".to_string(),
        };

        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(
            error.to_string(),
            "instance rejected (capacity): vehicle 3 has no capacity"
        );
    }

    #[test]
    fn test_server_and_transport_are_transient() {
        assert_eq!(
            OracleError::Server {
                status: 503,
                message: String::new()
            }
            .category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            OracleError::Transport("connection reset".to_string()).category(),
            ErrorCategory::Transient
        );
    }

    #[test]
    fn test_invalid_solution_is_unusable() {
        let error = OracleError::InvalidSolution("vehicle 2 has more than one route".to_string());

        assert_eq!(error.category(), ErrorCategory::Unusable);
        assert_eq!(
            OracleError::MalformedResponse("unexpected end of input".to_string()).category(),
            ErrorCategory::Transient
        );
    }

    #[test]
    fn test_rejection_code_from_code() {
        assert_eq!(RejectionCode::from_code("capacity"), RejectionCode::Capacity);
        assert_eq!(
            RejectionCode::from_code("invalid_time_window"),
            RejectionCode::TimeWindow
        );
        assert_eq!(
            RejectionCode::from_code("malformed_instance"),
            RejectionCode::MalformedInstance
        );
        assert_eq!(RejectionCode::from_code("quota"), RejectionCode::Other);
    }
}
