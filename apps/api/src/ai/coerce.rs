//! Lenient deserializers for model output. Language models drift from the
//! requested schema in small ways (a string where a list was asked for, a
//! score written as "85"); these accept the common variants.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a list of strings, a single string, or null. Blank items are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_strings(Value::deserialize(deserializer)?))
}

/// Accepts a number or a numeric string (`"85"`, `"85/100"`, `"7.5"`).
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_number(&Value::deserialize(deserializer)?))
}

/// Accepts a string, a list of strings (joined with spaces), or null.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined = value_to_strings(Value::deserialize(deserializer)?).join(" ");
    Ok((!joined.is_empty()).then_some(joined))
}

pub fn value_to_strings(value: Value) -> Vec<String> {
    match value {
        Value::String(s) => non_blank(s).into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => non_blank(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(map) => map
                    .get("text")
                    .and_then(Value::as_str)
                    .and_then(|s| non_blank(s.to_string())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .split('/')
            .next()
            .and_then(|head| head.trim().trim_end_matches('%').parse::<f64>().ok()),
        _ => None,
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Rounds and clamps into `[min, max]`; NaN and absent values give `None`.
pub fn clamp_score(value: Option<f64>, min: i32, max: i32) -> Option<i32> {
    value
        .filter(|v| v.is_finite())
        .map(|v| (v.round() as i32).clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "lenient_number")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "lenient_text")]
        note: Option<String>,
    }

    #[test]
    fn test_string_list_variants() {
        let p: Probe = serde_json::from_value(json!({"items": "just one"})).unwrap();
        assert_eq!(p.items, vec!["just one"]);
        let p: Probe = serde_json::from_value(json!({"items": ["a", " ", {"text": "b"}, 3]})).unwrap();
        assert_eq!(p.items, vec!["a", "b", "3"]);
        let p: Probe = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(p.items.is_empty());
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_lenient_number_variants() {
        let p: Probe = serde_json::from_value(json!({"score": "85/100"})).unwrap();
        assert_eq!(p.score, Some(85.0));
        let p: Probe = serde_json::from_value(json!({"score": "72%"})).unwrap();
        assert_eq!(p.score, Some(72.0));
        let p: Probe = serde_json::from_value(json!({"score": 7.5})).unwrap();
        assert_eq!(p.score, Some(7.5));
        let p: Probe = serde_json::from_value(json!({"score": "high"})).unwrap();
        assert_eq!(p.score, None);
    }

    #[test]
    fn test_lenient_text_joins_lists() {
        let p: Probe = serde_json::from_value(json!({"note": ["Use STAR.", "Be brief."]})).unwrap();
        assert_eq!(p.note.as_deref(), Some("Use STAR. Be brief."));
        let p: Probe = serde_json::from_value(json!({"note": ""})).unwrap();
        assert_eq!(p.note, None);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(Some(140.0), 0, 100), Some(100));
        assert_eq!(clamp_score(Some(-3.0), 0, 100), Some(0));
        assert_eq!(clamp_score(Some(7.6), 1, 10), Some(8));
        assert_eq!(clamp_score(Some(f64::NAN), 0, 100), None);
        assert_eq!(clamp_score(None, 0, 100), None);
    }
}
