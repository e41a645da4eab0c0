//! Helpers for pulling structure out of loosely formatted AI text

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("fenced block pattern is valid")
});

/// Find the first JSON object in an AI response.
///
/// Fenced code blocks are searched before the raw text. Within each
/// region every `{` starts a brace-balanced candidate (string literals and
/// escapes are respected); the first candidate that decodes as an object wins.
pub fn first_json_object(text: &str) -> Option<Map<String, Value>> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|block| scan_objects(block.as_str()))
        .or_else(|| scan_objects(text))
}

fn scan_objects(text: &str) -> Option<Map<String, Value>> {
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find('{') {
        let start = cursor + found;
        match balanced_span(text, start) {
            Some(end) => {
                if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text[start..end]) {
                    return Some(map);
                }
                // Balanced but not JSON; nothing nested inside it is worth trying
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }

    None
}

/// End offset (exclusive) of the brace group opening at `start`
fn balanced_span(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Coerce a JSON value to a decimal: numbers as-is, numeric strings parsed
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(decimal_from_f64)),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a decimal from text, tolerating thousands separators and exponents
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
        .or_else(|| cleaned.parse::<f64>().ok().and_then(decimal_from_f64))
}

/// Finite floats convert; magnitudes beyond the decimal range saturate
pub fn decimal_from_f64(v: f64) -> Option<Decimal> {
    if !v.is_finite() {
        return None;
    }
    Decimal::from_f64(v).or(Some(if v > 0.0 { Decimal::MAX } else { Decimal::MIN }))
}

/// Non-empty trimmed text; numbers and booleans are rendered as text
pub fn coerce_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Collect the string entries of a JSON array, skipping blanks and non-strings
pub fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_string).collect(),
        _ => Vec::new(),
    }
}

/// First vocabulary term contained in `text`, case-insensitively.
///
/// Plain substring match: "sweetcorn" yields "corn".
pub fn find_vocabulary_term(text: &str, vocabulary: &[&'static str]) -> Option<&'static str> {
    let lower = text.to_lowercase();
    vocabulary.iter().copied().find(|term| lower.contains(term))
}

/// Every vocabulary term contained in `text`, in vocabulary order
pub fn find_vocabulary_terms(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .collect()
}

/// "sugar cane" -> "Sugar Cane"
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_in_fenced_block() {
        let text = "Here you go:\n```json\n{\"test\": 123}\n```\nThanks";
        let map = first_json_object(text).unwrap();
        assert_eq!(map["test"], Value::from(123));
    }

    #[test]
    fn test_fenced_block_preferred_over_raw_text() {
        let text = "Example {\"a\": 1} then ```{\"b\": 2}```";
        let map = first_json_object(text).unwrap();
        assert!(map.contains_key("b"));
    }

    #[test]
    fn test_object_surrounded_by_prose() {
        let text = "Result: {\"area\": 10, \"note\": \"curly } inside\"} done";
        let map = first_json_object(text).unwrap();
        assert_eq!(map["note"], Value::from("curly } inside"));
    }

    #[test]
    fn test_skips_invalid_candidates() {
        let text = "{not json} and later {\"ok\": true}";
        let map = first_json_object(text).unwrap();
        assert_eq!(map["ok"], Value::Bool(true));
    }

    #[test]
    fn test_unbalanced_text_has_no_object() {
        assert!(first_json_object("{\"open\": 1").is_none());
        assert!(first_json_object("no braces at all").is_none());
    }

    #[test]
    fn test_coerce_decimal() {
        assert_eq!(coerce_decimal(&Value::from(1500)), Some(Decimal::from(1500)));
        assert_eq!(coerce_decimal(&Value::from(0.85)), Some(Decimal::new(85, 2)));
        assert_eq!(coerce_decimal(&Value::from("1,250.5")), Some(Decimal::new(12505, 1)));
        assert_eq!(coerce_decimal(&Value::from("about 10")), None);
        assert_eq!(coerce_decimal(&Value::Null), None);
    }

    #[test]
    fn test_huge_float_saturates() {
        assert_eq!(decimal_from_f64(1e300), Some(Decimal::MAX));
        assert_eq!(decimal_from_f64(f64::NAN), None);
    }

    #[test]
    fn test_vocabulary_substring_match() {
        let vocab = &["rice", "corn", "tomato"];
        assert_eq!(find_vocabulary_term("Fresh Tomatoes here", vocab), Some("tomato"));
        assert_eq!(find_vocabulary_term("Sweetcorn and popcorn", vocab), Some("corn"));
        assert_eq!(find_vocabulary_term("no crops mentioned", vocab), None);
        assert_eq!(find_vocabulary_terms("RICE and tomato", vocab), vec!["rice", "tomato"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("tomato"), "Tomato");
        assert_eq!(title_case("sugar CANE"), "Sugar Cane");
        assert_eq!(title_case(""), "");
    }
}
