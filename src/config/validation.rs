//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, URL absolute and http(s))
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: SdkConfig → Result<(), Vec<ValidationError>>

use url::Url;

use crate::config::schema::SdkConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug)]
pub enum ValidationError {
    MissingBaseUrl,
    InvalidBaseUrl { url: String, reason: String },
    ZeroTimeout,
    InvalidToken(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingBaseUrl => write!(f, "base_url is required"),
            ValidationError::InvalidBaseUrl { url, reason } => {
                write!(f, "invalid base_url '{}': {}", url, reason)
            }
            ValidationError::ZeroTimeout => write!(f, "timeout_ms must be greater than zero"),
            ValidationError::InvalidToken(reason) => write!(f, "invalid token: {}", reason),
        }
    }
}

/// Validate a loaded configuration, collecting every problem.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_base_url(&config.base_url) {
        errors.push(e);
    }
    if config.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that a base URL is absolute and speaks http(s).
pub fn validate_base_url(base_url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(base_url).map_err(|e| ValidationError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_base_url("http://localhost:3000").is_ok());
        assert!(validate_base_url("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn rejects_relative_and_exotic_urls() {
        assert!(validate_base_url("/just/a/path").is_err());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = SdkConfig {
            base_url: "http://localhost:3000".into(),
            token: None,
            timeout_ms: Some(0),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::ZeroTimeout));
    }

    #[test]
    fn collects_multiple_errors() {
        let config = SdkConfig {
            base_url: "nope".into(),
            token: None,
            timeout_ms: Some(0),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
