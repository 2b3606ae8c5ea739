//! Response and failure types for the generated-client contract.

use serde::Deserialize;
use thiserror::Error;

/// Successful raw response from a generated method.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

/// Nested error payload of a structured API error:
/// `{"error": {"message": "..."}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}


/// Rejection shapes produced by generated methods.
///
/// Upstream error bodies are uncontrolled, so classification is a closed
/// priority match: structured `error.message`, then a top-level `message`,
/// then unknown. Cancellation is its own variant and never reaches the
/// error callback.
#[derive(Debug, Error)]
pub enum ApiFailure {
    /// Cancellation observed before the call settled.
    #[error("Request aborted")]
    Aborted,

    /// Structured API error with a nested message and a status code.
    #[error("{message}")]
    Api { message: String, status: u16 },

    /// Message-bearing error without a structured body: connect failures,
    /// decode failures, or responses carrying a top-level `message`.
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// Rejection with neither a message nor a structured error field.
    #[error("Request failed")]
    Unknown { status: Option<u16> },
}

/// Result type for generated methods.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiFailure>;

impl ApiFailure {
    /// The status field carried by the failure, when present.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Aborted => None,
            ApiFailure::Api { status, .. } => Some(*status),
            ApiFailure::Transport { status, .. } => *status,
            ApiFailure::Unknown { status } => *status,
        }
    }

    /// Whether this failure signals cancellation, either by variant or by a
    /// message containing "aborted" (the convention transports use).
    pub fn is_abort(&self) -> bool {
        match self {
            ApiFailure::Aborted => true,
            ApiFailure::Api { message, .. } | ApiFailure::Transport { message, .. } => {
                message.to_ascii_lowercase().contains("aborted")
            }
            ApiFailure::Unknown { .. } => false,
        }
    }

    /// Label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiFailure::Aborted => "aborted",
            ApiFailure::Api { .. } => "api",
            ApiFailure::Transport { .. } => "transport",
            ApiFailure::Unknown { .. } => "unknown",
        }
    }

    /// Classify a non-2xx response body in priority order: nested
    /// `error.message`, then top-level `message`, then unknown shape.
    /// Duck-typed on purpose; upstream bodies are uncontrolled.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            if let Some(message) = value.pointer("/error/message").and_then(|m| m.as_str()) {
                return ApiFailure::Api {
                    message: message.to_string(),
                    status,
                };
            }
            if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
                return ApiFailure::Transport {
                    message: message.to_string(),
                    status: Some(status),
                };
            }
        }
        ApiFailure::Unknown {
            status: Some(status),
        }
    }

    pub(crate) fn decode(status: u16, err: serde_json::Error) -> Self {
        ApiFailure::Transport {
            message: format!("Failed to decode response body: {err}"),
            status: Some(status),
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        ApiFailure::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body_wins() {
        let body = br#"{"error":{"message":"User not found"}}"#;
        let failure = ApiFailure::from_error_body(404, body);
        match failure {
            ApiFailure::Api { message, status } => {
                assert_eq!(message, "User not found");
                assert_eq!(status, 404);
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn structured_error_takes_priority_over_top_level_message() {
        let body = br#"{"error":{"message":"nested"},"message":"flat"}"#;
        let failure = ApiFailure::from_error_body(500, body);
        assert_eq!(failure.to_string(), "nested");
    }

    #[test]
    fn top_level_message_is_second_priority() {
        let body = br#"{"message":"upstream exploded"}"#;
        let failure = ApiFailure::from_error_body(502, body);
        match failure {
            ApiFailure::Transport { message, status } => {
                assert_eq!(message, "upstream exploded");
                assert_eq!(status, Some(502));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_body_is_unknown_but_keeps_status() {
        let failure = ApiFailure::from_error_body(500, b"not json at all");
        assert_eq!(failure.to_string(), "Request failed");
        assert_eq!(failure.status(), Some(500));
    }

    #[test]
    fn empty_object_body_is_unknown() {
        let failure = ApiFailure::from_error_body(503, b"{}");
        assert!(matches!(failure, ApiFailure::Unknown { status: Some(503) }));
    }

    #[test]
    fn abort_detection() {
        assert!(ApiFailure::Aborted.is_abort());
        assert!(ApiFailure::Transport {
            message: "connection aborted by peer".into(),
            status: None,
        }
        .is_abort());
        assert!(!ApiFailure::Transport {
            message: "Network error".into(),
            status: None,
        }
        .is_abort());
        assert!(!ApiFailure::Unknown { status: None }.is_abort());
    }

    #[test]
    fn display_matches_surfaced_messages() {
        assert_eq!(ApiFailure::Aborted.to_string(), "Request aborted");
        assert_eq!(
            ApiFailure::Unknown { status: None }.to_string(),
            "Request failed"
        );
        assert_eq!(
            ApiFailure::Api {
                message: "User not found".into(),
                status: 404,
            }
            .to_string(),
            "User not found"
        );
    }

    #[test]
    fn status_accessor() {
        assert_eq!(ApiFailure::Aborted.status(), None);
        assert_eq!(
            ApiFailure::Api {
                message: "x".into(),
                status: 404,
            }
            .status(),
            Some(404)
        );
        assert_eq!(
            ApiFailure::Transport {
                message: "x".into(),
                status: None,
            }
            .status(),
            None
        );
    }
}
