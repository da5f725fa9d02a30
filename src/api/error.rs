use thiserror::Error;

/// Failure taxonomy for API calls. The HTTP status class and (truncated)
/// response body are preserved so callers can react to a 401 differently
/// from a 500 or a transport failure.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized - the credential was missing or rejected")]
    Unauthorized,

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited by the server")]
    RateLimited,

    #[error("server error: {0}")]
    ServerError(String),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response while trying to {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Response bodies are clipped before being embedded in error values.
const MAX_ERROR_BODY_LENGTH: usize = 300;

impl ApiError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... ({} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            code => ApiError::UnexpectedStatus {
                status: code,
                body: truncated,
            },
        }
    }

    pub fn decode(context: &'static str, source: serde_json::Error) -> Self {
        ApiError::Decode { context, source }
    }

    /// True when the failure means the stored credential is not accepted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// One-line message for the status bar, naming the failed operation.
    pub fn user_message(&self, what: &str) -> String {
        match self {
            ApiError::Unauthorized => format!("Failed to {}: please log in", what),
            ApiError::AccessDenied(_) => format!("Failed to {}: access denied", what),
            ApiError::NotFound(_) => format!("Failed to {}: not found", what),
            ApiError::RateLimited => format!("Failed to {}: rate limited, try again shortly", what),
            ApiError::ServerError(_) => format!("Failed to {}: server error", what),
            ApiError::UnexpectedStatus { status, .. } => {
                format!("Failed to {}: unexpected status {}", what, status)
            }
            ApiError::Network(e) if e.is_timeout() => {
                format!("Failed to {}: connection timed out", what)
            }
            ApiError::Network(_) => format!("Failed to {}: unable to reach the server", what),
            ApiError::Decode { .. } => format!("Failed to {}: malformed server response", what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        match ApiError::from_status(StatusCode::IM_A_TEAPOT, "short and stout") {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 418);
                assert_eq!(body, "short and stout");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_body_truncation() {
        let long_body = "x".repeat(1000);
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &long_body) {
            ApiError::ServerError(body) => {
                assert!(body.len() < 1000);
                assert!(body.contains("1000 total bytes"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(!ApiError::RateLimited.is_auth_failure());
    }

    #[test]
    fn test_user_message_names_operation() {
        let msg = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "").user_message("fetch cars");
        assert_eq!(msg, "Failed to fetch cars: server error");
    }
}
