//! Markup helpers shared by the body-scanning checks.
//!
//! These are regex-level approximations. No DOM is built.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));

static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));

static NOSCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<noscript[^>]*>(.*?)</noscript>").expect("valid regex"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Visible text: scripts, styles and tags removed, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let without_tags = TAG.replace_all(&without_styles, "");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// Text left once scripts and tags are removed. Styles and whitespace are kept.
pub fn rendered_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    TAG.replace_all(&without_scripts, "").trim().to_string()
}

/// Inner contents of every `<noscript>` element.
pub fn noscript_segments(html: &str) -> Vec<&str> {
    NOSCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The document with every `<noscript>` element blanked out.
pub fn without_noscript(html: &str) -> String {
    NOSCRIPT_BLOCK.replace_all(html, " ").into_owned()
}

/// Number of non-overlapping occurrences of `needle`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Slice of `text` around the byte range `start..end`, widened by `radius`
/// characters on each side.
///
/// `start` and `end` must lie on character boundaries.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map_or(0, |(idx, _)| idx)
    };

    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(idx, _)| end + idx);

    &text[from..to]
}

/// At most `max_chars` characters from the start of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_strips_markup() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script type="text/javascript">var x = "<b>hidden</b>";</script></head>
            <body><h1>Title</h1>
            <p>Some   text</p></body></html>"#;
        assert_eq!(visible_text(html), "Title Some text");
    }

    #[test]
    fn test_rendered_text_keeps_styles() {
        let html = "<style>p{}</style><script>x()</script><p>Hi</p>";
        assert_eq!(rendered_text(html), "p{}Hi");
    }

    #[test]
    fn test_noscript_segments() {
        let html = "<noscript>one</noscript><p>x</p><NOSCRIPT class=\"n\">two\nlines</NOSCRIPT>";
        assert_eq!(noscript_segments(html), vec!["one", "two\nlines"]);
        assert_eq!(without_noscript(html), " <p>x</p> ");
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("data-src data-src", "data-src"), 2);
        assert_eq!(count_occurrences("", "x"), 0);
    }

    #[test]
    fn test_context_window_clamps() {
        let text = "0123456789";
        assert_eq!(context_window(text, 4, 6, 2), "234567");
        assert_eq!(context_window(text, 0, 2, 50), "0123456789");
    }

    #[test]
    fn test_context_window_counts_characters() {
        let text = "éé captcha éé";
        let start = text.find("captcha").expect("keyword present");
        assert_eq!(context_window(text, start, start + 7, 2), "é captcha é");
        assert_eq!(context_window(text, start, start + 7, 0), "captcha");

        let text = format!("{}captcha{}", "б".repeat(100), "б".repeat(100));
        let start = text.find("captcha").expect("keyword present");
        let window = context_window(&text, start, start + 7, 50);
        assert_eq!(window.chars().count(), 50 + 7 + 50);
        assert_eq!(window, format!("{}captcha{}", "б".repeat(50), "б".repeat(50)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 30), "hi");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
