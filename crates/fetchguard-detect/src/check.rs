//! Check registry.
//!
//! Every check is a pure function of a [`CheckContext`]. [`CheckId`] names
//! each one, binds it to its function and failure category, and fixes the
//! canonical execution order.

use crate::pattern::CompiledPattern;
use crate::{bot, dynamic, structural};
use fetchguard_core::{DetectorConfig, ResponseSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl CheckResult {
    /// A passing result.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    /// A failing result with a self-contained diagnostic.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Diagnostic, present only on failure.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Consume the result, yielding the failure reason if it failed.
    #[must_use]
    pub fn into_failure(self) -> Option<String> {
        if self.passed {
            None
        } else {
            self.reason
        }
    }
}

/// Broad family a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Non-success or soft-block status code
    Transport,
    /// Signature of a bot-protection system
    Protection,
    /// Wrong content type, out-of-bounds size or abnormal redirect chain
    Structural,
    /// Content present but missing items, markers or loaded values
    Incompleteness,
    /// Page shell whose content JavaScript never rendered
    Rendering,
    /// Body could not be decoded as text
    Decode,
}

impl FailureCategory {
    /// Stable lower-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Protection => "protection",
            Self::Structural => "structural",
            Self::Incompleteness => "incompleteness",
            Self::Rendering => "rendering",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a check may read. Borrowed for the duration of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Response under evaluation
    pub snapshot: &'a ResponseSnapshot,
    /// Detector options
    pub config: &'a DetectorConfig,
    /// Expected patterns, compiled from `config.expected_patterns`
    pub patterns: &'a [CompiledPattern],
}

impl<'a> CheckContext<'a> {
    /// Bundle the inputs of one evaluation.
    #[must_use]
    pub fn new(
        snapshot: &'a ResponseSnapshot,
        config: &'a DetectorConfig,
        patterns: &'a [CompiledPattern],
    ) -> Self {
        Self {
            snapshot,
            config,
            patterns,
        }
    }

    /// Decoded body, or an empty string if the body could not be decoded.
    #[must_use]
    pub fn body(&self) -> &'a str {
        self.snapshot.text().unwrap_or("")
    }
}

/// Signature shared by every check.
pub type CheckFn = fn(&CheckContext<'_>) -> CheckResult;

/// Identifier of a registered check.
///
/// Variants are declared in canonical execution order: cheap metadata checks
/// first, body scans last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// Status must be 2xx
    Status,
    /// 203 and 204 are soft-block signals
    SuspiciousStatus,
    /// Bot-protection response headers
    ProtectionHeaders,
    /// `content-type` must contain the expected value
    ContentType,
    /// Redirect loops, challenge hops, blocking statuses, hop ceiling
    Redirects,
    /// Body must be decodable text
    Decode,
    /// Body length bounds
    ContentLength,
    /// Bot-protection keywords in the body
    BotKeywords,
    /// Configured literal markers
    RequiredMarkers,
    /// Lazy-load placeholders
    LazyLoading,
    /// Load-more buttons, first-page-only listings, infinite scroll
    Pagination,
    /// Minimum number of repeated items
    ItemCount,
    /// Configured patterns: counts and placeholder uniformity
    ExpectedPatterns,
    /// No-script fallback content
    Noscript,
    /// JSON-LD completeness
    StructuredData,
    /// Framework roots and loading skeletons
    JsPlaceholders,
    /// Visible text ratio and script weight
    ContentDensity,
    /// Hydration data with nothing rendered
    EmbeddedData,
}

impl CheckId {
    /// All checks in canonical execution order.
    pub const ALL: [CheckId; 18] = [
        Self::Status,
        Self::SuspiciousStatus,
        Self::ProtectionHeaders,
        Self::ContentType,
        Self::Redirects,
        Self::Decode,
        Self::ContentLength,
        Self::BotKeywords,
        Self::RequiredMarkers,
        Self::LazyLoading,
        Self::Pagination,
        Self::ItemCount,
        Self::ExpectedPatterns,
        Self::Noscript,
        Self::StructuredData,
        Self::JsPlaceholders,
        Self::ContentDensity,
        Self::EmbeddedData,
    ];

    /// Stable snake-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::SuspiciousStatus => "suspicious_status",
            Self::ProtectionHeaders => "protection_headers",
            Self::ContentType => "content_type",
            Self::Redirects => "redirects",
            Self::Decode => "decode",
            Self::ContentLength => "content_length",
            Self::BotKeywords => "bot_keywords",
            Self::RequiredMarkers => "required_markers",
            Self::LazyLoading => "lazy_loading",
            Self::Pagination => "pagination",
            Self::ItemCount => "item_count",
            Self::ExpectedPatterns => "expected_patterns",
            Self::Noscript => "noscript",
            Self::StructuredData => "structured_data",
            Self::JsPlaceholders => "js_placeholders",
            Self::ContentDensity => "content_density",
            Self::EmbeddedData => "embedded_data",
        }
    }

    /// Family reported when this check fails.
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Status | Self::SuspiciousStatus => FailureCategory::Transport,
            Self::ProtectionHeaders | Self::BotKeywords => FailureCategory::Protection,
            Self::ContentType | Self::Redirects | Self::ContentLength => {
                FailureCategory::Structural
            }
            Self::Decode => FailureCategory::Decode,
            Self::RequiredMarkers
            | Self::LazyLoading
            | Self::Pagination
            | Self::ItemCount
            | Self::ExpectedPatterns
            | Self::Noscript
            | Self::StructuredData => FailureCategory::Incompleteness,
            Self::JsPlaceholders | Self::ContentDensity | Self::EmbeddedData => {
                FailureCategory::Rendering
            }
        }
    }

    /// The function implementing this check.
    #[must_use]
    pub fn function(&self) -> CheckFn {
        match self {
            Self::Status => structural::check_status,
            Self::SuspiciousStatus => structural::check_suspicious_status,
            Self::ProtectionHeaders => bot::check_protection_headers,
            Self::ContentType => structural::check_content_type,
            Self::Redirects => structural::check_redirects,
            Self::Decode => structural::check_decode,
            Self::ContentLength => structural::check_content_length,
            Self::BotKeywords => bot::check_bot_keywords,
            Self::RequiredMarkers => dynamic::check_required_markers,
            Self::LazyLoading => dynamic::check_lazy_loading,
            Self::Pagination => dynamic::check_pagination,
            Self::ItemCount => dynamic::check_item_count,
            Self::ExpectedPatterns => dynamic::check_expected_patterns,
            Self::Noscript => dynamic::check_noscript,
            Self::StructuredData => dynamic::check_structured_data,
            Self::JsPlaceholders => dynamic::check_js_placeholders,
            Self::ContentDensity => dynamic::check_content_density,
            Self::EmbeddedData => dynamic::check_embedded_data,
        }
    }

    /// Whether the configuration asks for this check to run.
    #[must_use]
    pub fn is_enabled(&self, config: &DetectorConfig) -> bool {
        match self {
            Self::Status
            | Self::SuspiciousStatus
            | Self::ProtectionHeaders
            | Self::Redirects
            | Self::Decode
            | Self::ContentLength
            | Self::BotKeywords => true,
            Self::ContentType => config.expected_content_type().is_some(),
            Self::RequiredMarkers => !config.required_markers.is_empty(),
            Self::LazyLoading => config.check_lazy_loading,
            Self::Pagination => config.check_pagination,
            Self::ItemCount => config.min_item_count().is_some(),
            Self::ExpectedPatterns => !config.expected_patterns.is_empty(),
            Self::Noscript => config.check_noscript,
            Self::StructuredData => config.check_structured_data,
            Self::JsPlaceholders | Self::ContentDensity | Self::EmbeddedData => {
                config.check_js_rendering
            }
        }
    }

    /// Run this check.
    #[must_use]
    pub fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        (self.function())(ctx)
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown check '{s}'"))
    }
}
