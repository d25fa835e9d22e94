use crate::check::{CheckContext, CheckResult};

/// Fail when any configured marker is absent from the body.
///
/// Markers are literal, case-sensitive substrings. Every missing marker is
/// listed, in configuration order.
pub fn check_required_markers(ctx: &CheckContext<'_>) -> CheckResult {
    let body = ctx.body();
    let missing: Vec<&str> = ctx
        .config
        .required_markers
        .iter()
        .map(String::as_str)
        .filter(|marker| !body.contains(marker))
        .collect();

    if missing.is_empty() {
        CheckResult::pass()
    } else {
        CheckResult::fail(format!("Missing required content markers: {missing:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::test_support::run_body_with;
    use fetchguard_core::DetectorConfig;

    fn with_markers(markers: &[&str]) -> DetectorConfig {
        DetectorConfig {
            required_markers: markers.iter().map(ToString::to_string).collect(),
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn test_all_markers_present() {
        let config = with_markers(&["product-title", "add-to-cart"]);
        let body = r#"<h1 class="product-title">Lamp</h1><button class="add-to-cart">Buy</button>"#;
        assert!(run_body_with(check_required_markers, body, &config).passed());
    }

    #[test]
    fn test_lists_every_missing_marker() {
        let config = with_markers(&["product-title", "add-to-cart", "price"]);
        let body = r#"<h1 class="product-title">Lamp</h1>"#;
        assert_eq!(
            run_body_with(check_required_markers, body, &config).reason(),
            Some(r#"Missing required content markers: ["add-to-cart", "price"]"#)
        );
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let config = with_markers(&["Add-To-Cart"]);
        let body = r#"<button class="add-to-cart">Buy</button>"#;
        assert!(!run_body_with(check_required_markers, body, &config).passed());
    }
}
