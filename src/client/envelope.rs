//! The uniform result shape returned for every wrapped call.

use std::fmt;

use crate::client::abort::AbortHandle;

/// Error message surfaced when a call is cancelled before settling.
pub const ABORTED_MESSAGE: &str = "Request aborted";

/// Status code surfaced on aborted envelopes.
pub const ABORTED_STATUS: u16 = 0;

/// Normalized outcome of one wrapped call.
///
/// Exactly one of `data` / `error` is `Some`; the constructors are the only
/// way to build an envelope, so the invariant holds for every value handed
/// to callers. The abort handle stays callable after settlement (a no-op).
pub struct Envelope<T> {
    /// Payload of a successful call.
    pub data: Option<T>,
    /// Normalized error message of a failed or aborted call.
    pub error: Option<String>,
    /// HTTP status when known; `Some(0)` on aborted calls.
    pub status: Option<u16>,
    abort: AbortHandle,
}

impl<T> Envelope<T> {
    pub(crate) fn success(data: T, status: u16, abort: AbortHandle) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: Some(status),
            abort,
        }
    }

    pub(crate) fn failure(error: String, status: Option<u16>, abort: AbortHandle) -> Self {
        Self {
            data: None,
            error: Some(error),
            status,
            abort,
        }
    }

    pub(crate) fn aborted(abort: AbortHandle) -> Self {
        Self {
            data: None,
            error: Some(ABORTED_MESSAGE.to_string()),
            status: Some(ABORTED_STATUS),
            abort,
        }
    }

    /// Trigger the call's cancellation controller. Safe to invoke any number
    /// of times; after settlement it has no observable effect.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// The cancellation handle for this call.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Whether the call completed with data.
    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the call was cancelled before settling.
    pub fn is_aborted(&self) -> bool {
        self.status == Some(ABORTED_STATUS) && self.error.as_deref() == Some(ABORTED_MESSAGE)
    }

    /// Consume the envelope, yielding the payload if the call succeeded.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T: fmt::Debug> fmt::Debug for Envelope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("data", &self.data)
            .field("error", &self.error)
            .field("status", &self.status)
            .finish()
    }
}
