//! Status, metadata and size validation.

use crate::check::{CheckContext, CheckResult};
use crate::signatures::{
    BLOCKING_REDIRECT_STATUSES, MAX_REDIRECTS, REDIRECT_KEYWORDS, SUSPICIOUS_STATUSES,
};
use fetchguard_core::Body;
use std::collections::HashSet;

/// Fail on any non-2xx status.
pub fn check_status(ctx: &CheckContext<'_>) -> CheckResult {
    if ctx.snapshot.is_success() {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("HTTP error: {}", ctx.snapshot.status()))
    }
}

/// Fail on 2xx statuses that protection layers use for soft blocks.
pub fn check_suspicious_status(ctx: &CheckContext<'_>) -> CheckResult {
    let status = ctx.snapshot.status();
    if SUSPICIOUS_STATUSES.contains(&status) {
        return CheckResult::fail(format!("Suspicious status code: {status}"));
    }
    CheckResult::pass()
}

/// Fail when `content-type` does not contain the expected value.
///
/// The comparison ignores ASCII case. A missing header counts as empty.
pub fn check_content_type(ctx: &CheckContext<'_>) -> CheckResult {
    let Some(expected) = ctx.config.expected_content_type() else {
        return CheckResult::pass();
    };

    let actual = ctx.snapshot.headers().get("content-type").unwrap_or("");
    if actual
        .to_ascii_lowercase()
        .contains(&expected.to_ascii_lowercase())
    {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!(
            "Wrong content-type: expected '{expected}', got '{actual}'"
        ))
    }
}

/// Fail on redirect loops, challenge hops, blocking hop statuses or long chains.
pub fn check_redirects(ctx: &CheckContext<'_>) -> CheckResult {
    let history = ctx.snapshot.redirect_history();
    if history.is_empty() {
        return CheckResult::pass();
    }

    let mut seen = HashSet::new();
    if !history.iter().all(|hop| seen.insert(hop.url.as_str())) {
        return CheckResult::fail("Redirect loop detected");
    }

    for hop in history {
        let url_lower = hop.url.to_ascii_lowercase();
        if let Some(keyword) = REDIRECT_KEYWORDS.iter().find(|k| url_lower.contains(*k)) {
            return CheckResult::fail(format!(
                "Suspicious redirect ({keyword}): {}",
                hop.url
            ));
        }

        if BLOCKING_REDIRECT_STATUSES.contains(&hop.status) {
            return CheckResult::fail(format!(
                "Blocking status in redirect chain: {} at {}",
                hop.status, hop.url
            ));
        }
    }

    if history.len() > MAX_REDIRECTS {
        return CheckResult::fail(format!("Too many redirects: {}", history.len()));
    }

    CheckResult::pass()
}

/// Fail when the body could not be decoded as text.
pub fn check_decode(ctx: &CheckContext<'_>) -> CheckResult {
    match ctx.snapshot.body() {
        Body::Text(_) => CheckResult::pass(),
        Body::Undecodable { error } => {
            CheckResult::fail(format!("Failed to decode response: {error}"))
        }
    }
}

/// Fail on an empty body or a body outside the configured bounds.
pub fn check_content_length(ctx: &CheckContext<'_>) -> CheckResult {
    let length = ctx.snapshot.content_length();
    let config = ctx.config;

    if length == 0 {
        return CheckResult::fail("Empty response body");
    }

    if length < config.min_content_length {
        return CheckResult::fail(format!(
            "Content too small: {length} bytes (min: {})",
            config.min_content_length
        ));
    }

    if let Some(max) = config.max_content_length {
        if length > max {
            return CheckResult::fail(format!("Content too large: {length} bytes (max: {max})"));
        }
    }

    CheckResult::pass()
}
