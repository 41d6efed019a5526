use reqwest::StatusCode;

/// Errors returned by the admin API client and the payload builders.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("request to agent admin API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error invalid AIP level: {0}")]
    InvalidAip(u16),

    #[error("Error invalid credential type: {0}")]
    InvalidCredentialType(String),

    #[error("invalid age '{0}', expected a whole number of years")]
    InvalidAge(String),

    #[error("no date {years} years before {date}")]
    DateOutOfRange { date: chrono::NaiveDate, years: i32 },

    #[error("unexpected response from agent: {0}")]
    UnexpectedResponse(String),
}

impl AdminError {
    /// True for failures talking to the agent (connection problems and
    /// non-success HTTP statuses), as opposed to local payload errors.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_client_error() {
        let err = AdminError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "no such registry".into(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "400 Bad Request: no such registry");
    }

    #[test]
    fn test_payload_errors_are_not_client_errors() {
        assert!(!AdminError::InvalidAip(30).is_client_error());
        assert!(!AdminError::InvalidAge("old".into()).is_client_error());
        assert!(!AdminError::InvalidCredentialType("json-ld".into()).is_client_error());
    }

    #[test]
    fn test_invalid_aip_message() {
        assert_eq!(
            AdminError::InvalidAip(15).to_string(),
            "Error invalid AIP level: 15"
        );
    }
}
