//! Heuristics for pages whose content a client-side framework never rendered.
//!
//! These only run when `check_js_rendering` is enabled.

use crate::check::{CheckContext, CheckResult};
use crate::signatures::{FRAMEWORK_FINGERPRINTS, HYDRATION_MARKERS};
use crate::text::{count_occurrences, rendered_text, visible_text};
use once_cell::sync::Lazy;
use regex::Regex;

static EMPTY_DIV_SHELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<body[^>]*>\s*<div[^>]*>\s*</div>\s*<script").expect("valid regex")
});

const EMPTY_DIV_SHELL_LABEL: &str = "Single empty div with scripts (SPA pattern)";

const MAX_REPORTED_PLACEHOLDERS: usize = 3;
const MAX_REPORTED_MARKERS: usize = 2;

/// Bodies at or below this size are never judged on text density.
const DENSITY_MIN_BODY: usize = 1000;

const HEAVY_SCRIPT_COUNT: usize = 15;
const HEAVY_SCRIPT_RATIO: f64 = 0.15;

/// Rendered text below this many characters means embedded data was never shown.
const EMBEDDED_MIN_CHARS: usize = 500;

/// Fail when framework roots or loading skeletons are present.
pub fn check_js_placeholders(ctx: &CheckContext<'_>) -> CheckResult {
    let body_lower = ctx.body().to_ascii_lowercase();

    let mut detected: Vec<&str> = FRAMEWORK_FINGERPRINTS
        .iter()
        .filter(|fp| body_lower.contains(fp.pattern))
        .map(|fp| fp.label)
        .collect();

    if EMPTY_DIV_SHELL.is_match(&body_lower) {
        detected.push(EMPTY_DIV_SHELL_LABEL);
    }

    if detected.is_empty() {
        return CheckResult::pass();
    }

    detected.truncate(MAX_REPORTED_PLACEHOLDERS);
    CheckResult::fail(format!("JS placeholder detected: {}", detected.join(", ")))
}

/// Fail when visible text is a tiny fraction of the document, or when a
/// script-heavy page carries little text.
#[allow(clippy::cast_precision_loss)]
pub fn check_content_density(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();
    let total = body.len();
    if total == 0 {
        return CheckResult::fail("Empty HTML");
    }

    let text = visible_text(body).len();
    let ratio = text as f64 / total as f64;
    let scripts = count_occurrences(&body.to_ascii_lowercase(), "<script");

    if ratio < ctx.config.min_text_ratio && total > DENSITY_MIN_BODY {
        return CheckResult::fail(format!(
            "Low content density: {:.1}% text, {scripts} scripts (likely JS-rendered)",
            ratio * 100.0
        ));
    }

    if scripts > HEAVY_SCRIPT_COUNT && ratio < HEAVY_SCRIPT_RATIO {
        return CheckResult::fail(format!(
            "Heavy JS usage: {scripts} scripts with {:.1}% text content",
            ratio * 100.0
        ));
    }

    CheckResult::pass()
}

/// Fail when hydration payloads are present but almost nothing was rendered.
pub fn check_embedded_data(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();
    let body_lower = body.to_ascii_lowercase();

    let found: Vec<&str> = HYDRATION_MARKERS
        .iter()
        .filter(|marker| body_lower.contains(marker.pattern))
        .map(|marker| marker.label)
        .collect();

    if found.is_empty() || rendered_text(body).chars().count() >= EMBEDDED_MIN_CHARS {
        return CheckResult::pass();
    }

    let shown = &found[..found.len().min(MAX_REPORTED_MARKERS)];
    CheckResult::fail(format!(
        "Found embedded data requiring JS: {}",
        shown.join(", ")
    ))
}
