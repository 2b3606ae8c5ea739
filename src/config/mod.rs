//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! programmatic path:
//!     ClientOptions::builder() → validation.rs (semantic checks)
//!     → ClientOptions (validated, immutable)
//!     → SdkClient::new
//!
//! file path (probe CLI):
//!     config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SdkConfig::into_options()
//! ```
//!
//! # Design Decisions
//! - Options are immutable once built; only the token value may change at
//!   runtime, through its source (provider / RotatingToken)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{ClientOptions, ClientOptionsBuilder, RotatingToken, TokenSource};
