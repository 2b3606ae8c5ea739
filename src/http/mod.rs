//! Generated-client contract and runtime support.
//!
//! # Data Flow
//! ```text
//! SdkClient::call(op)
//!     → op receives (&A, CallParams)       [signal + request id injected]
//!     → generated method builds the call
//!     → core.rs (reqwest round-trip, header layering, abort race)
//!     → types.rs (success → ApiResponse, rejection → ApiFailure)
//!     → back through the wrapper for normalization
//! ```

pub mod core;
pub mod raw;
pub mod types;

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use uuid::Uuid;

use crate::client::abort::AbortSignal;

/// Per-request hook resolving auth headers. Invoked freshly before every
/// outgoing request, so credential rotation needs no client rebuild.
pub type SecurityWorker = Arc<dyn Fn() -> Option<HeaderMap> + Send + Sync>;

/// Construction parameters for a generated client, mirroring the generator's
/// constructor object (base URL, base request params, security worker hook,
/// injectable HTTP client).
pub struct ApiConfig {
    /// Base URL all request paths are appended to.
    pub base_url: String,

    /// Headers applied to every request (carries `Authorization` when a
    /// static token is configured).
    pub base_headers: HeaderMap,

    /// Per-request auth hook, when the wrapped client supports it.
    pub security_worker: Option<SecurityWorker>,

    /// Injected HTTP client; a default one is built when absent.
    pub http: Option<reqwest::Client>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("base_headers", &self.base_headers)
            .field("security_worker", &self.security_worker.is_some())
            .finish()
    }
}

/// Constructor contract for generated clients.
pub trait GeneratedClient: Sized {
    /// Build the client from the wrapper-supplied configuration.
    fn from_config(config: ApiConfig) -> Self;

    /// Legacy explicit token setter. Generators that store the credential
    /// implement this; header-based ones rely on the security worker and
    /// keep the default no-op.
    fn set_auth_token(&mut self, _token: &str) {}
}

/// Per-call parameter object. The wrapper always constructs one, injecting
/// a fresh cancellation signal and a request id for log correlation.
#[derive(Debug, Clone)]
pub struct CallParams {
    /// Cancellation signal for this call.
    pub signal: AbortSignal,

    /// Extra headers for this call only.
    pub headers: HeaderMap,

    /// Correlation id flowing through log events.
    pub request_id: Uuid,
}

impl CallParams {
    pub fn new(signal: AbortSignal) -> Self {
        Self {
            signal,
            headers: HeaderMap::new(),
            request_id: Uuid::new_v4(),
        }
    }
}
