use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("invalid severity '{0}', expected normal, high or critical")]
    InvalidSeverity(String),

    #[error("urgency {0} is out of range (expected 0, 1 or 2)")]
    UrgencyOutOfRange(u8),

    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with `result: "error"`.
    #[error("{0}")]
    Rejected(String),

    #[error("not logged in: run `gatedesk session set <token>` or set GATEDESK_SESSION")]
    NotLoggedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("malformed response for {operation}: {reason}")]
    Decode { operation: String, reason: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not reach the gateway: {0}")]
    Unreachable(String),

    #[error("{operation} failed with HTTP {status}")]
    Status { operation: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    pub fn invalid_severity(s: String) -> Self {
        DeskError::InvalidSeverity(s)
    }

    /// Transport-level failures: network, timeouts and undecodable payloads.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeskError::Http(_)
                | DeskError::Timeout(_)
                | DeskError::Unreachable(_)
                | DeskError::Decode { .. }
                | DeskError::Status { .. }
        )
    }

    /// Message suitable for showing inline next to a form.
    ///
    /// Backend and validation messages are shown verbatim; anything else
    /// is not meant for inline display and yields `None`.
    pub fn inline_message(&self) -> Option<&str> {
        match self {
            DeskError::Rejected(msg) | DeskError::Validation(msg) => Some(msg),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_message_only_for_business_and_validation() {
        let rejected = DeskError::Rejected("Ticket is already closed".to_string());
        assert_eq!(rejected.inline_message(), Some("Ticket is already closed"));

        let validation = DeskError::Validation("Message cannot be empty".to_string());
        assert_eq!(validation.inline_message(), Some("Message cannot be empty"));

        let timeout = DeskError::Timeout("ticket/all".to_string());
        assert_eq!(timeout.inline_message(), None);
        assert!(timeout.is_transport());
    }

    #[test]
    fn test_decode_is_transport() {
        let err = DeskError::Decode {
            operation: "ticket/all".to_string(),
            reason: "missing field".to_string(),
        };
        assert!(err.is_transport());
        assert!(!DeskError::NotLoggedIn.is_transport());
    }
}
