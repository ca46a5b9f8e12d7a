use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
}

impl AiError {
    /// Quota and overload responses; everything else is a request problem.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AiError::Api { status: 429 | 503, .. })
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_statuses_are_rate_limited() {
        let quota = AiError::Api {
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        };
        assert!(quota.is_rate_limited());

        let auth = AiError::Api {
            status: 401,
            body: "bad key".into(),
        };
        assert!(!auth.is_rate_limited());
        assert!(!AiError::Timeout(30).is_rate_limited());
    }

    #[test]
    fn api_error_message_carries_status_and_body() {
        let err = AiError::Api {
            status: 400,
            body: "malformed request".into(),
        };
        assert_eq!(err.to_string(), "API error (400): malformed request");
    }
}
