//! Fetchguard Core - Foundation crate for the fetchguard response-validity engine.
//!
//! This crate provides the data the detector consumes and the configuration it
//! is driven by. It performs no detection itself.
//!
//! # Modules
//!
//! - [`types`] - Response snapshots (`ResponseSnapshot`, `Headers`, `RedirectHop`, `Body`)
//! - [`config`] - TOML-based detector configuration with XDG paths and env overrides
//! - [`error`] - Configuration error types using thiserror
//!
//! # Example
//!
//! ```rust
//! use fetchguard_core::{DetectorConfig, ResponseSnapshot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DetectorConfig::from_toml_str("min_content_length = 100")?;
//! config.validate()?;
//!
//! let snapshot = ResponseSnapshot::new(200, "<html><body>Hello</body></html>")
//!     .with_header("Content-Type", "text/html; charset=utf-8")
//!     .with_redirect("http://example.com/", 301);
//!
//! assert_eq!(snapshot.headers().get("content-type"), Some("text/html; charset=utf-8"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{DetectorConfig, ExpectedPattern};
pub use error::{ConfigError, ConfigResult};
pub use types::{Body, Headers, RedirectHop, ResponseSnapshot};
