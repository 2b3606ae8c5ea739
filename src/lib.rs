//! Runtime wrapper for code-generated REST API clients.
//!
//! Wraps a generated client so that every call resolves to a uniform
//! envelope (`data` / `error` / `status` / abort handle), carries bearer
//! authentication (static or freshly resolved per call), and races a
//! configurable timeout against manual cancellation.
//!
//! # Architecture Overview
//!
//! ```text
//!   application code
//!        │  call(|api, params| async move { api.users.get_user(id, &params).await })
//!        ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │                   SdkClient (client)                 │
//!   │  per-call AbortController ── timeout timer           │
//!   │  outcome normalization ──── on_request_error hook    │
//!   └───────────────┬──────────────────────────────────────┘
//!                   ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │         generated client over HttpCore (http)        │
//!   │  header layering · security worker · abort race      │
//!   └───────────────┬──────────────────────────────────────┘
//!                   ▼
//!              reqwest transport
//! ```
//!
//! Calls never reject: success, failure, and abort all come back as an
//! [`Envelope`].

// Core subsystems
pub mod client;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use client::abort::{AbortController, AbortHandle, AbortSignal};
pub use client::envelope::Envelope;
pub use client::{PendingCall, SdkClient};
pub use config::loader::ConfigError;
pub use config::schema::{ClientOptions, ClientOptionsBuilder, RotatingToken, TokenSource};
pub use http::types::{ApiFailure, ApiResponse, ApiResult, ErrorBody};
pub use http::{ApiConfig, CallParams, GeneratedClient};
