//! Fetchguard Detect - Response-validity heuristics.
//!
//! A fetch that returns `200 OK` is not necessarily a successful fetch. This
//! crate classifies a [`ResponseSnapshot`](fetchguard_core::ResponseSnapshot)
//! as genuine or as one of the soft failures that plague automated retrieval:
//! bot-protection challenges, interstitials, empty JavaScript shells, and
//! pages whose dynamic content never loaded.
//!
//! # Features
//!
//! - Ordered, short-circuiting pipeline of pure checks; the first failure wins
//! - Transport and structural checks (status, content type, redirects, size)
//! - Bot-protection signatures in headers and body
//! - Dynamic-content completeness (lazy loading, pagination, item counts,
//!   placeholder uniformity, no-script fallbacks, JSON-LD)
//! - Optional JS-rendering heuristics (framework shells, text density, hydration data)
//!
//! # Example
//!
//! ```rust
//! use fetchguard_core::{DetectorConfig, ResponseSnapshot};
//! use fetchguard_detect::{CheckId, Pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(DetectorConfig::default())?;
//!
//! let snapshot = ResponseSnapshot::new(200, "<html><body>Checking your browser... Ray ID: 1a2b</body></html>")
//!     .with_header("content-type", "text/html");
//!
//! let verdict = pipeline.evaluate(&snapshot);
//! assert!(!verdict.is_valid());
//! assert_eq!(verdict.failed_check(), Some(CheckId::ContentLength));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod bot;
pub mod check;
pub mod dynamic;
#[allow(missing_docs)]
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod signatures;
pub mod structural;
pub mod text;

// Re-export commonly used types
pub use check::{CheckContext, CheckFn, CheckId, CheckResult, FailureCategory};
pub use error::{DetectError, Result};
pub use pattern::CompiledPattern;
pub use pipeline::{evaluate, Pipeline, Verdict};
