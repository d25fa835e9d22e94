use crate::check::{CheckContext, CheckResult};
use crate::signatures::LAZY_LOAD_INDICATORS;
use crate::text::count_occurrences;

/// An indicator seen this many times or fewer is treated as noise.
const LAZY_LOAD_THRESHOLD: usize = 3;

/// Offenders listed in the diagnostic.
const MAX_REPORTED: usize = 3;

/// Fail when lazy-load placeholders appear systematically.
///
/// Offenders are reported by descending count; ties keep table order.
pub fn check_lazy_loading(ctx: &CheckContext<'_>) -> CheckResult {
    let body_lower = ctx.body().to_ascii_lowercase();

    let mut offenders: Vec<_> = LAZY_LOAD_INDICATORS
        .iter()
        .filter_map(|indicator| {
            let count = count_occurrences(&body_lower, indicator.pattern);
            (count > LAZY_LOAD_THRESHOLD).then_some((indicator.label, count))
        })
        .collect();

    if offenders.is_empty() {
        return CheckResult::pass();
    }

    offenders.sort_by(|a, b| b.1.cmp(&a.1));
    let summary = offenders
        .iter()
        .take(MAX_REPORTED)
        .map(|(label, count)| format!("{label} ({count}x)"))
        .collect::<Vec<_>>()
        .join(", ");

    CheckResult::fail(format!("Unloaded content: {summary}"))
}
