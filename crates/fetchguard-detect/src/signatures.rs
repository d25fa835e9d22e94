//! Fixed indicator tables.
//!
//! All substring tables are stored lower-case and are matched against an
//! ASCII-lower-cased body. Order matters: scans report the first hit in
//! declaration order.

/// A substring to look for and the label reported when it is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// Lower-case substring
    pub pattern: &'static str,
    /// Human-readable label used in diagnostics
    pub label: &'static str,
}

const fn ind(pattern: &'static str, label: &'static str) -> Indicator {
    Indicator { pattern, label }
}

/// How a protection header is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderIndicator {
    /// Header present with a non-empty value; reports the protection system
    Present(&'static str),
    /// Header value contains one of these substrings (case-insensitive)
    AnyOf(&'static [&'static str]),
}

/// A response header that betrays an anti-automation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSignature {
    /// Lower-case header name
    pub header: &'static str,
    /// Matching rule
    pub indicator: HeaderIndicator,
}

/// Headers set by bot-protection vendors.
pub const HEADER_SIGNATURES: &[HeaderSignature] = &[
    HeaderSignature {
        header: "cf-ray",
        indicator: HeaderIndicator::Present("Cloudflare protection"),
    },
    HeaderSignature {
        header: "cf-mitigated",
        indicator: HeaderIndicator::Present("Cloudflare mitigation"),
    },
    HeaderSignature {
        header: "x-datadome-cid",
        indicator: HeaderIndicator::Present("DataDome protection"),
    },
    HeaderSignature {
        header: "x-distil-cs",
        indicator: HeaderIndicator::Present("Distil Networks"),
    },
    HeaderSignature {
        header: "server",
        indicator: HeaderIndicator::AnyOf(&["akamai", "cloudflare", "imperva"]),
    },
];

/// Body keywords found on challenge, block and interstitial pages.
pub const BOT_KEYWORDS: &[&str] = &[
    "captcha",
    "recaptcha",
    "hcaptcha",
    "cloudflare",
    "cf-browser-verification",
    "challenge-platform",
    "access denied",
    "blocked",
    "security check",
    "ray id:",
    "enable javascript",
    "datadome",
    "imperva",
    "perimeter x",
    "distil networks",
    "akamai",
    "incapsula",
    "please verify you are human",
    "are you a robot",
    "automated access",
    "unusual traffic",
    "__cf_chl_jschl_tk__",
    "cf_clearance",
    "bot detection",
];

/// Redirect URL fragments that point at a challenge or block page.
pub const REDIRECT_KEYWORDS: &[&str] = &["captcha", "challenge", "verify", "blocked"];

/// Hop statuses that mean the chain passed through a blocking layer.
pub const BLOCKING_REDIRECT_STATUSES: &[u16] = &[503, 403, 429];

/// Statuses that are nominally successful but used for soft blocks.
pub const SUSPICIOUS_STATUSES: &[u16] = &[203, 204];

/// Maximum number of redirect hops before the chain is considered abnormal.
pub const MAX_REDIRECTS: usize = 5;

/// Markers left behind when lazy-loaded content never arrived.
pub const LAZY_LOAD_INDICATORS: &[Indicator] = &[
    ind("data-src", "Lazy-load images not loaded"),
    ind("data-lazy", "Lazy content pending"),
    ind("loading=\"lazy\"", "Native lazy loading"),
    ind("class=\"lazy", "Lazy load class"),
    ind("placeholder.", "Placeholder images"),
    ind("data:image/svg+xml", "SVG placeholder"),
    ind("blur-up", "Progressive image placeholder"),
    ind("skeleton", "Skeleton loading state"),
    ind("$0.00", "Unloaded price"),
    ind("$-.--", "Empty price placeholder"),
    ind("n/a", "Missing data placeholder"),
    ind("tbd", "To-be-determined placeholder"),
];

/// "Load more" style affordances, matched case-insensitively.
pub const LOAD_MORE_PATTERNS: &[&str] = &[
    r#"class="[^"]*load-more[^"]*""#,
    r#"id="load-more""#,
    r">load more<",
    r">show more<",
    r">view more<",
    r"load additional",
    r"see all \d+ items",
    r"showing \d+ of \d+",
];

/// Numeric page indicators such as `page=3` or `Page 2`. ASCII digits only.
pub const PAGE_NUMBER_PATTERN: &str = r"(?i)page[=\s]+([0-9]+)";

/// Affordances that suggest further pages exist.
pub const NEXT_PAGE_PATTERN: &str = r"(?i)next page|page 2|→|»";

/// Attributes and classes that trigger infinite scrolling.
pub const INFINITE_SCROLL_TRIGGERS: &[&str] = &[
    "data-infinite-scroll",
    "infinite-scroll-container",
    "scroll-to-load",
    "data-next-page",
];

/// Candidate item containers: `(pattern, label)`, matched case-insensitively.
pub const ITEM_PATTERNS: &[(&str, &str)] = &[
    (r#"data-product-id="[^"]*""#, "products"),
    (r#"class="[^"]*product-card[^"]*""#, "product cards"),
    (r#"class="[^"]*item[^"]*""#, "items"),
    (r"<article[^>]*>", "articles"),
    (r#"data-item-id="[^"]*""#, "items"),
    (r#"class="[^"]*post[^"]*""#, "posts"),
];

/// Notices asking the visitor to turn JavaScript on.
pub const JS_REQUIRED_MESSAGES: &[&str] = &[
    "please enable javascript",
    "requires javascript",
    "javascript is disabled",
    "javascript must be enabled",
    "turn on javascript",
];

/// Framework roots and loading skeletons typical of unrendered SPAs.
pub const FRAMEWORK_FINGERPRINTS: &[Indicator] = &[
    ind("data-reactroot", "React root"),
    ind("id=\"root\"", "React/Vue root element"),
    ind("id=\"app\"", "Vue/SPA app element"),
    ind("data-vue-app", "Vue app"),
    ind("ng-app", "Angular app"),
    ind("ng-version", "Angular framework"),
    ind("<div id=\"root\"></div>", "Empty React root"),
    ind("<div id=\"app\"></div>", "Empty app container"),
    ind("<main></main>", "Empty main element"),
    ind("skeleton-loader", "Skeleton loading state"),
    ind("placeholder-glow", "Placeholder animation"),
    ind("spinner", "Loading spinner"),
];

/// Client-side hydration payloads.
pub const HYDRATION_MARKERS: &[Indicator] = &[
    ind("type=\"application/json\"", "JSON script tag"),
    ind("type=\"application/ld+json\"", "JSON-LD structured data"),
    ind("__initial_state__", "Initial state data"),
    ind("__preloaded_state__", "Preloaded state"),
    ind("window.__data__", "Window data object"),
    ind("id=\"__next_data__\"", "Next.js data"),
    ind("__next_data__", "Next.js SSR data"),
    ind("window.__initial_data__", "Initial data"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn is_lowercase(s: &str) -> bool {
        s == s.to_ascii_lowercase()
    }

    #[test]
    fn test_substring_tables_are_lowercase() {
        for keyword in BOT_KEYWORDS
            .iter()
            .chain(REDIRECT_KEYWORDS)
            .chain(INFINITE_SCROLL_TRIGGERS)
            .chain(JS_REQUIRED_MESSAGES)
        {
            assert!(is_lowercase(keyword), "{keyword} must be lower-case");
        }

        for indicator in LAZY_LOAD_INDICATORS
            .iter()
            .chain(FRAMEWORK_FINGERPRINTS)
            .chain(HYDRATION_MARKERS)
        {
            assert!(
                is_lowercase(indicator.pattern),
                "{} must be lower-case",
                indicator.pattern
            );
        }

        for signature in HEADER_SIGNATURES {
            assert!(is_lowercase(signature.header));
            if let HeaderIndicator::AnyOf(candidates) = signature.indicator {
                assert!(candidates.iter().all(|c| is_lowercase(c)));
            }
        }
    }

    #[test]
    fn test_regex_tables_compile() {
        for pattern in LOAD_MORE_PATTERNS {
            assert!(Regex::new(pattern).is_ok(), "bad pattern {pattern}");
        }
        for (pattern, _) in ITEM_PATTERNS {
            assert!(Regex::new(pattern).is_ok(), "bad pattern {pattern}");
        }
        assert!(Regex::new(PAGE_NUMBER_PATTERN).is_ok());
        assert!(Regex::new(NEXT_PAGE_PATTERN).is_ok());
    }

    #[test]
    fn test_bot_keyword_table_size() {
        assert!(BOT_KEYWORDS.len() >= 20);
        let mut sorted = BOT_KEYWORDS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), BOT_KEYWORDS.len(), "duplicate bot keyword");
    }
}
