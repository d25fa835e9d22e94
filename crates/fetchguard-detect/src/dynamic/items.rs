use crate::check::{CheckContext, CheckResult};
use crate::signatures::ITEM_PATTERNS;
use crate::text::truncate_chars;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

static ITEM_CONTAINERS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    ITEM_PATTERNS
        .iter()
        .map(|(pattern, label)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("valid regex");
            (regex, *label)
        })
        .collect()
});

/// Uniformity is only judged once a pattern has at least this many matches.
const UNIFORMITY_MIN_SAMPLE: usize = 5;

/// Fail when fewer repeated items are present than configured.
///
/// Each candidate container pattern is counted and the best-matching one is
/// taken as the item estimate.
pub fn check_item_count(ctx: &CheckContext<'_>) -> CheckResult {
    let Some(min_expected) = ctx.config.min_item_count() else {
        return CheckResult::pass();
    };

    let body = ctx.body();
    let mut best: Option<(&str, usize)> = None;
    for (regex, label) in ITEM_CONTAINERS.iter() {
        let count = regex.find_iter(body).count();
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((*label, count));
        }
    }

    let (label, count) = best.unwrap_or(("items", 0));
    if count < min_expected {
        return CheckResult::fail(format!(
            "Only {count} {label} found (expected ≥{min_expected})"
        ));
    }

    CheckResult::pass()
}

/// Fail when a configured pattern matches too rarely, or matches enough times
/// but with values so uniform they are almost certainly placeholders.
pub fn check_expected_patterns(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();

    for pattern in ctx.patterns {
        let values = pattern.values(body);
        let total = values.len();
        let name = pattern.name();

        if total < pattern.min_count() {
            return CheckResult::fail(format!(
                "Only {total} {name} found (expected ≥{})",
                pattern.min_count()
            ));
        }

        if total < UNIFORMITY_MIN_SAMPLE {
            continue;
        }

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for &value in &values {
            *frequencies.entry(value).or_default() += 1;
        }

        if frequencies.len() == 1 {
            return CheckResult::fail(format!(
                "All {name} have identical value '{}' (placeholder?)",
                truncate_chars(values[0], 30)
            ));
        }

        let top = frequencies.values().copied().max().unwrap_or(0);
        // top / total > 0.8
        if top * 5 > total * 4 {
            return CheckResult::fail(format!(
                "{top}/{total} {name} have same value (likely placeholder)"
            ));
        }
    }

    CheckResult::pass()
}
