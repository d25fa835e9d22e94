use crate::check::{CheckContext, CheckResult};
use crate::signatures::{
    INFINITE_SCROLL_TRIGGERS, LOAD_MORE_PATTERNS, NEXT_PAGE_PATTERN, PAGE_NUMBER_PATTERN,
};
use crate::text::truncate_chars;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static LOAD_MORE: Lazy<Vec<Regex>> = Lazy::new(|| {
    LOAD_MORE_PATTERNS
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("valid regex")
        })
        .collect()
});

static PAGE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(PAGE_NUMBER_PATTERN).expect("valid regex"));

static NEXT_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(NEXT_PAGE_PATTERN).expect("valid regex"));

/// Fail when more pages or scroll batches were clearly available.
pub fn check_pagination(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();

    for regex in LOAD_MORE.iter() {
        if let Some(found) = regex.find(body) {
            return CheckResult::fail(format!(
                "Unpaginated content detected: {}",
                truncate_chars(found.as_str(), 50)
            ));
        }
    }

    // ASCII digits only, so a parse failure means overflow: treat it as "many pages"
    let max_page = PAGE_NUMBER
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .max();

    if max_page == Some(1) && NEXT_PAGE.is_match(body) {
        return CheckResult::fail("Only first page content loaded");
    }

    let body_lower = body.to_ascii_lowercase();
    if let Some(trigger) = INFINITE_SCROLL_TRIGGERS
        .iter()
        .find(|trigger| body_lower.contains(*trigger))
    {
        return CheckResult::fail(format!("Infinite scroll not triggered: {trigger}"));
    }

    CheckResult::pass()
}
