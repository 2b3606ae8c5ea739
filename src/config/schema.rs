//! Client options and token sources.
//!
//! This module defines the construction-time options for the wrapper and
//! the ways a bearer credential can be supplied. Options are built through
//! [`ClientOptions::builder`]; the file-loadable subset lives in
//! [`SdkConfig`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::config::validation::{validate_base_url, ValidationError};
use crate::http::types::ApiFailure;

/// Zero-argument closure resolving the current bearer credential. Invoked
/// freshly before each request needing auth; assumed cheap and synchronous.
pub type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Observer invoked with the raw failure of each non-aborted failed call,
/// exactly once, before the envelope is returned.
pub type ErrorCallback = Arc<dyn Fn(&ApiFailure) + Send + Sync>;

/// Where the bearer credential comes from.
#[derive(Clone)]
pub enum TokenSource {
    /// Fixed credential, also written into the base headers at construction.
    Static(String),
    /// Resolved anew before every request.
    Provider(TokenProvider),
}

impl TokenSource {
    /// Wrap a closure as a provider source.
    pub fn provider<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        TokenSource::Provider(Arc::new(f))
    }

    /// Resolve the current credential.
    pub fn resolve(&self) -> Option<String> {
        match self {
            TokenSource::Static(token) => Some(token.clone()),
            TokenSource::Provider(provider) => provider(),
        }
    }

    /// The credential when it is static, for construction-time wiring.
    pub fn static_token(&self) -> Option<&str> {
        match self {
            TokenSource::Static(token) => Some(token),
            TokenSource::Provider(_) => None,
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print credentials.
        match self {
            TokenSource::Static(_) => f.write_str("TokenSource::Static(<redacted>)"),
            TokenSource::Provider(_) => f.write_str("TokenSource::Provider(..)"),
        }
    }
}

/// Lock-free holder for a credential that rotates at runtime. Convert with
/// [`RotatingToken::source`] to use it as the client's token source; calls
/// after [`set`](RotatingToken::set) carry the new credential without
/// rebuilding the client.
#[derive(Clone, Default)]
pub struct RotatingToken {
    inner: Arc<ArcSwapOption<String>>,
}

impl RotatingToken {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::from(initial.map(Arc::new))),
        }
    }

    /// Replace the credential.
    pub fn set(&self, token: impl Into<String>) {
        self.inner.store(Some(Arc::new(token.into())));
    }

    /// Drop the credential; subsequent requests go out unauthenticated.
    pub fn clear(&self) {
        self.inner.store(None);
    }

    /// The current credential.
    pub fn get(&self) -> Option<String> {
        self.inner.load_full().map(|t| (*t).clone())
    }

    /// A token source reading this holder on every request.
    pub fn source(&self) -> TokenSource {
        let inner = Arc::clone(&self.inner);
        TokenSource::provider(move || inner.load_full().map(|t| (*t).clone()))
    }
}

impl fmt::Debug for RotatingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingToken")
            .field("present", &self.inner.load().is_some())
            .finish()
    }
}

/// Construction options for [`SdkClient`](crate::client::SdkClient).
#[derive(Clone)]
pub struct ClientOptions {
    /// Base URL of the wrapped API. Must be an absolute http(s) URL.
    pub base_url: String,

    /// Bearer credential source, if the API needs auth.
    pub token: Option<TokenSource>,

    /// Raw-failure observer; never invoked for aborted calls.
    pub on_request_error: Option<ErrorCallback>,

    /// Per-call deadline. When it expires the call is cancelled exactly as
    /// if `abort()` had been invoked.
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .field("on_request_error", &self.on_request_error.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`ClientOptions`].
#[derive(Default)]
pub struct ClientOptionsBuilder {
    base_url: Option<String>,
    token: Option<TokenSource>,
    on_request_error: Option<ErrorCallback>,
    timeout: Option<Duration>,
}

impl ClientOptionsBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a fixed bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(TokenSource::Static(token.into()));
        self
    }

    /// Use a provider resolved freshly before each request.
    pub fn token_provider<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.token = Some(TokenSource::provider(f));
        self
    }

    pub fn token_source(mut self, source: TokenSource) -> Self {
        self.token = Some(source);
        self
    }

    pub fn on_request_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ApiFailure) + Send + Sync + 'static,
    {
        self.on_request_error = Some(Arc::new(f));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientOptions, ConfigError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ConfigError::Validation(vec![ValidationError::MissingBaseUrl]))?;
        validate_base_url(&base_url).map_err(|e| ConfigError::Validation(vec![e]))?;

        Ok(ClientOptions {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: self.token,
            on_request_error: self.on_request_error,
            timeout: self.timeout,
        })
    }
}

/// File-loadable configuration for the probe CLI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Base URL of the target API.
    pub base_url: String,

    /// Static bearer token.
    pub token: Option<String>,

    /// Per-call timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
            timeout_ms: None,
        }
    }
}

impl SdkConfig {
    /// Convert into validated client options.
    pub fn into_options(self) -> Result<ClientOptions, ConfigError> {
        let mut builder = ClientOptions::builder().base_url(self.base_url);
        if let Some(token) = self.token {
            builder = builder.token(token);
        }
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder.build()
    }
}
