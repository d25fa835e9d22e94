//! Bot-protection detection from headers and body keywords.

use crate::check::{CheckContext, CheckResult};
use crate::signatures::{HeaderIndicator, BOT_KEYWORDS, HEADER_SIGNATURES};
use crate::text::context_window;

/// Characters of surrounding body quoted on each side of a keyword hit.
const KEYWORD_CONTEXT_RADIUS: usize = 50;

/// Fail when a response header carries a known protection signature.
pub fn check_protection_headers(ctx: &CheckContext<'_>) -> CheckResult {
    let headers = ctx.snapshot.headers();

    for signature in HEADER_SIGNATURES {
        let Some(value) = headers.get(signature.header) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match signature.indicator {
            HeaderIndicator::Present(system) => {
                return CheckResult::fail(format!(
                    "Protection detected via header {}: {system}",
                    signature.header
                ));
            }
            HeaderIndicator::AnyOf(candidates) => {
                let value_lower = value.to_ascii_lowercase();
                if let Some(candidate) = candidates.iter().find(|c| value_lower.contains(*c)) {
                    return CheckResult::fail(format!(
                        "Protection detected via header {}: {candidate}",
                        signature.header
                    ));
                }
            }
        }
    }

    CheckResult::pass()
}

/// Fail on the first bot-protection keyword in the body, quoting its context.
pub fn check_bot_keywords(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();
    // ASCII lower-casing keeps byte offsets aligned with `body`
    let body_lower = body.to_ascii_lowercase();

    for keyword in BOT_KEYWORDS {
        if let Some(start) = body_lower.find(keyword) {
            let context =
                context_window(body, start, start + keyword.len(), KEYWORD_CONTEXT_RADIUS);
            return CheckResult::fail(format!(
                "Bot detection indicator found: '{keyword}' (context: ...{context}...)"
            ));
        }
    }

    CheckResult::pass()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetchguard_core::{DetectorConfig, ResponseSnapshot};

    fn run(check: fn(&CheckContext<'_>) -> CheckResult, snapshot: &ResponseSnapshot) -> CheckResult {
        let config = DetectorConfig::default();
        check(&CheckContext::new(snapshot, &config, &[]))
    }

    #[test]
    fn test_presence_header_fails() {
        let snapshot = ResponseSnapshot::new(200, "").with_header("CF-RAY", "7d3f1a2b3c4d-IAD");
        let result = run(check_protection_headers, &snapshot);
        assert_eq!(
            result.reason(),
            Some("Protection detected via header cf-ray: Cloudflare protection")
        );
    }

    #[test]
    fn test_empty_presence_header_ignored() {
        let snapshot = ResponseSnapshot::new(200, "").with_header("x-datadome-cid", "");
        assert!(run(check_protection_headers, &snapshot).passed());
    }

    #[test]
    fn test_server_header_vendor_match() {
        let snapshot = ResponseSnapshot::new(200, "").with_header("Server", "AkamaiGHost");
        let result = run(check_protection_headers, &snapshot);
        assert_eq!(
            result.reason(),
            Some("Protection detected via header server: akamai")
        );
    }

    #[test]
    fn test_plain_server_header_passes() {
        let snapshot = ResponseSnapshot::new(200, "")
            .with_header("Server", "nginx/1.25.3")
            .with_header("Content-Type", "text/html");
        assert!(run(check_protection_headers, &snapshot).passed());
    }

    #[test]
    fn test_captcha_keyword_any_case() {
        let snapshot = ResponseSnapshot::new(200, "<div>Please solve this CAPTCHA first</div>");
        let result = run(check_bot_keywords, &snapshot);
        let reason = result.reason().expect("should fail");
        assert!(reason.starts_with("Bot detection indicator found: 'captcha'"));
        assert!(reason.contains("Please solve this CAPTCHA first"));
    }

    #[test]
    fn test_keyword_order_first_hit_wins() {
        // "recaptcha" also contains "captcha", which is declared first
        let snapshot = ResponseSnapshot::new(200, r#"<div class="g-recaptcha"></div>"#);
        let result = run(check_bot_keywords, &snapshot);
        assert!(result
            .reason()
            .expect("should fail")
            .contains("'captcha'"));
    }

    #[test]
    fn test_context_window_is_bounded() {
        let padding = "x".repeat(200);
        let body = format!("{padding}Access Denied{padding}");
        let snapshot = ResponseSnapshot::new(200, body);
        let result = run(check_bot_keywords, &snapshot);
        let reason = result.reason().expect("should fail");
        let context = reason
            .split("(context: ...")
            .nth(1)
            .and_then(|rest| rest.strip_suffix("...)"))
            .expect("context present");
        assert_eq!(context.len(), 50 + "Access Denied".len() + 50);
    }

    #[test]
    fn test_context_window_counts_characters() {
        let body = format!("{}captcha{}", "б".repeat(100), "б".repeat(100));
        let snapshot = ResponseSnapshot::new(200, body);
        let result = run(check_bot_keywords, &snapshot);
        let reason = result.reason().expect("should fail");
        let context = reason
            .split("(context: ...")
            .nth(1)
            .and_then(|rest| rest.strip_suffix("...)"))
            .expect("context present");
        assert_eq!(context.chars().count(), 50 + "captcha".len() + 50);
    }

    #[test]
    fn test_clean_body_passes() {
        let snapshot = ResponseSnapshot::new(
            200,
            "<html><body><h1>Fresh produce</h1><p>Apples and pears.</p></body></html>",
        );
        assert!(run(check_bot_keywords, &snapshot).passed());
    }
}
