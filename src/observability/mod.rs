//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every wrapped call produces:
//!     → logging.rs setup; events carry the per-call request id
//!     → metrics.rs (outcome counters)
//!
//! Consumers:
//!     → whatever subscriber/recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Request ID (UUID v4) correlates all events of one call
//! - Metrics are cheap (atomic increments) and recorded unconditionally

pub mod logging;
pub mod metrics;
