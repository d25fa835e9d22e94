use crate::check::{CheckContext, CheckResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_LD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script\s+type="application/ld\+json"[^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// Fail when embedded JSON-LD is malformed or visibly hollow.
///
/// Payloads are numbered from 1 in document order. `Product` entities need a
/// name and a price, `ItemList` entities need elements. Other types pass.
pub fn check_structured_data(ctx: &CheckContext<'_>) -> CheckResult {
    for (idx, caps) in JSON_LD.captures_iter(ctx.body()).enumerate() {
        let index = idx + 1;
        let raw = caps.get(1).map_or("", |m| m.as_str().trim());

        let payload: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                return CheckResult::fail(format!("Malformed JSON-LD at index {index}: {e}"));
            }
        };

        for entity in entities(&payload) {
            if has_type(entity, "Product") {
                if !is_truthy(entity.get("name")) {
                    return CheckResult::fail(format!("Product schema #{index} missing name"));
                }
                if !has_price(entity) {
                    return CheckResult::fail(format!("Product schema #{index} missing price"));
                }
            } else if has_type(entity, "ItemList") && !is_truthy(entity.get("itemListElement")) {
                return CheckResult::fail(format!("ItemList schema #{index} has no items"));
            }
        }
    }

    CheckResult::pass()
}

/// Objects described by one payload: the payload itself, the members of a
/// top-level array, and the members of an `@graph` array.
fn entities(payload: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    let roots: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for root in roots {
        if !root.is_object() {
            continue;
        }
        out.push(root);
        if let Some(Value::Array(graph)) = root.get("@graph") {
            out.extend(graph.iter().filter(|v| v.is_object()));
        }
    }
    out
}

fn has_type(entity: &Value, wanted: &str) -> bool {
    match entity.get("@type") {
        Some(Value::String(t)) => t == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

fn offer_has_price(offer: &Value) -> bool {
    is_truthy(offer.get("price")) || is_truthy(offer.get("lowPrice"))
}

// Missing `offers` is treated as an empty object; null or scalar offers are
// left alone.
fn has_price(entity: &Value) -> bool {
    match entity.get("offers") {
        None => false,
        Some(offer @ Value::Object(_)) => offer_has_price(offer),
        Some(Value::Array(offers)) => offers.iter().any(offer_has_price),
        Some(_) => true,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::test_support::run_body;

    fn ld(json: &str) -> String {
        format!(r#"<html><script type="application/ld+json">{json}</script></html>"#)
    }

    #[test]
    fn test_product_with_price_passes() {
        let body = ld(r#"{"@type":"Product","name":"Lamp","offers":{"price":"9.99"}}"#);
        assert!(run_body(check_structured_data, &body).passed());
    }

    #[test]
    fn test_product_with_empty_offers_fails() {
        let body = ld(r#"{"@type":"Product","name":"Lamp","offers":{}}"#);
        assert_eq!(
            run_body(check_structured_data, &body).reason(),
            Some("Product schema #1 missing price")
        );
    }

    #[test]
    fn test_product_without_offers_fails() {
        let body = ld(r#"{"@type":"Product","name":"Lamp"}"#);
        assert_eq!(
            run_body(check_structured_data, &body).reason(),
            Some("Product schema #1 missing price")
        );
    }

    #[test]
    fn test_low_price_accepted() {
        let body = ld(r#"{"@type":"Product","name":"Lamp","offers":{"lowPrice":12}}"#);
        assert!(run_body(check_structured_data, &body).passed());
    }

    #[test]
    fn test_zero_price_is_missing() {
        let body = ld(r#"{"@type":"Product","name":"Lamp","offers":{"price":0}}"#);
        assert!(!run_body(check_structured_data, &body).passed());
    }

    #[test]
    fn test_product_missing_name() {
        let body = ld(r#"{"@type":"Product","name":"","offers":{"price":"1.00"}}"#);
        assert_eq!(
            run_body(check_structured_data, &body).reason(),
            Some("Product schema #1 missing name")
        );
    }

    #[test]
    fn test_offer_array_needs_one_price() {
        let bad = ld(r#"{"@type":"Product","name":"Lamp","offers":[{"priceCurrency":"USD"}]}"#);
        assert!(!run_body(check_structured_data, &bad).passed());

        let good = ld(
            r#"{"@type":"Product","name":"Lamp","offers":[{"priceCurrency":"USD"},{"price":"5"}]}"#,
        );
        assert!(run_body(check_structured_data, &good).passed());
    }

    #[test]
    fn test_empty_item_list() {
        let body = format!(
            "{}{}",
            ld(r#"{"@type":"Organization","name":"Shop"}"#),
            ld(r#"{"@type":"ItemList","itemListElement":[]}"#)
        );
        assert_eq!(
            run_body(check_structured_data, &body).reason(),
            Some("ItemList schema #2 has no items")
        );
    }

    #[test]
    fn test_malformed_payload_reports_index() {
        let body = format!("{}{}", ld(r#"{"@type":"WebSite"}"#), ld("{not json"));
        let reason = run_body(check_structured_data, &body)
            .into_failure()
            .expect("should fail");
        assert!(reason.starts_with("Malformed JSON-LD at index 2:"), "{reason}");
    }

    #[test]
    fn test_graph_and_type_arrays() {
        let body = ld(
            r#"{"@context":"https://schema.org","@graph":[
                {"@type":"WebPage","name":"Lamp"},
                {"@type":["Product","IndividualProduct"],"name":"Lamp","offers":{"price":null}}
            ]}"#,
        );
        assert_eq!(
            run_body(check_structured_data, &body).reason(),
            Some("Product schema #1 missing price")
        );
    }

    #[test]
    fn test_top_level_array() {
        let body = ld(r#"[{"@type":"BreadcrumbList"},{"@type":"ItemList","itemListElement":[{"position":1}]}]"#);
        assert!(run_body(check_structured_data, &body).passed());
    }

    #[test]
    fn test_no_json_ld_passes() {
        assert!(run_body(check_structured_data, "<html><p>plain</p></html>").passed());
    }
}
