//! Metrics collection.
//!
//! # Responsibilities
//! - Record per-call counters for the wrapper
//!
//! # Metrics
//! - `sdk_requests_total` (counter): calls by outcome (success/failure/aborted)
//! - `sdk_request_failures_total` (counter): failed calls by failure kind
//! - `sdk_requests_aborted_total` (counter): cancelled calls
//!
//! # Design Decisions
//! - Counters only; a client library records into whatever recorder the
//!   host application installs, it never runs an exposition endpoint

use metrics::counter;

/// Record the terminal outcome of one wrapped call.
pub fn record_call(outcome: &'static str) {
    counter!("sdk_requests_total", "outcome" => outcome).increment(1);
}

/// Record a failed call by classification kind.
pub fn record_failure(kind: &'static str) {
    counter!("sdk_request_failures_total", "kind" => kind).increment(1);
}

/// Record a cancelled call.
pub fn record_abort() {
    counter!("sdk_requests_aborted_total").increment(1);
}
