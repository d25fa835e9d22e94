use crate::check::{CheckContext, CheckResult};
use crate::signatures::JS_REQUIRED_MESSAGES;
use crate::text::{noscript_segments, without_noscript};

/// Combined `<noscript>` payload, in characters, above which the page looks
/// like a no-JS fallback.
const NOSCRIPT_MAX_CHARS: usize = 1000;

/// Fail when the response is a no-JavaScript fallback.
///
/// Either the `<noscript>` blocks carry a substantial alternative document,
/// or the main content itself tells the visitor to turn JavaScript on.
/// Notices inside `<noscript>` are expected and ignored.
pub fn check_noscript(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();

    let total: usize = noscript_segments(body)
        .iter()
        .map(|segment| segment.chars().count())
        .sum();
    if total > NOSCRIPT_MAX_CHARS {
        return CheckResult::fail(format!(
            "Large noscript content ({total} chars) - may be no-JS version"
        ));
    }

    let main_lower = without_noscript(body).to_ascii_lowercase();
    if let Some(message) = JS_REQUIRED_MESSAGES
        .iter()
        .find(|message| main_lower.contains(*message))
    {
        return CheckResult::fail(format!("JS-required message in main content: '{message}'"));
    }

    CheckResult::pass()
}
