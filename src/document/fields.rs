//! Text coercions used by structured-view fields.
//!
//! Structured fields are edited as plain text and converted to document
//! values on write. The document is permissive on purpose: nothing here
//! rejects input, malformed pieces are dropped or stored verbatim.

use serde_json::{Map, Value};

/// Split a comma-separated list, trimming entries and dropping empty ones.
/// Order and duplicates are kept as typed.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn list_value(text: &str) -> Value {
    Value::Array(parse_list(text).into_iter().map(Value::String).collect())
}

/// Render a list value as the comma-separated display string.
pub fn render_list(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(render_scalar)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => render_scalar(other),
        None => String::new(),
    }
}

/// Parse `key: value` lines into a mapping.
///
/// Each line splits on its first colon. Lines without a colon, or with an
/// empty key or value after trimming, are dropped. A later duplicate key
/// overwrites an earlier one.
pub fn parse_dictionary(text: &str) -> Map<String, Value> {
    let mut mapping = Map::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        mapping.insert(key.to_string(), Value::String(value.to_string()));
    }
    mapping
}

pub fn dictionary_value(text: &str) -> Value {
    Value::Object(parse_dictionary(text))
}

/// Like [`dictionary_value`] but each value goes through [`integer_value`].
pub fn integer_dictionary_value(text: &str) -> Value {
    let mapping = parse_dictionary(text)
        .into_iter()
        .map(|(key, value)| {
            let coerced = match value {
                Value::String(raw) => integer_value(&raw),
                other => other,
            };
            (key, coerced)
        })
        .collect();
    Value::Object(mapping)
}

/// Render a mapping as one `key: value` line per entry.
pub fn render_dictionary(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(mapping)) => mapping
            .iter()
            .filter_map(|(key, value)| {
                let rendered = render_scalar(value);
                (!key.trim().is_empty() && !rendered.trim().is_empty())
                    .then(|| format!("{}: {}", key, rendered))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Integer if the trimmed text parses as one, otherwise the raw text.
pub fn integer_value(text: &str) -> Value {
    match text.trim().parse::<i64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::String(text.to_string()),
    }
}

/// Display text for a single value. Nested values fall back to compact JSON.
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_trims_and_drops_empty_entries() {
        assert_eq!(parse_list("a, b ,, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_list_keeps_order_and_duplicates() {
        assert_eq!(parse_list("#b, #a, #b"), vec!["#b", "#a", "#b"]);
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_parse_dictionary_later_duplicate_wins_and_bad_lines_drop() {
        let parsed = parse_dictionary("x: 1\ny:2\nbadline\nx: 3");
        assert_eq!(Value::Object(parsed), json!({"x": "3", "y": "2"}));
    }

    #[test]
    fn test_parse_dictionary_splits_on_first_colon_only() {
        let parsed = parse_dictionary("link: https://vak.example\n: orphan\nempty:   ");
        assert_eq!(Value::Object(parsed), json!({"link": "https://vak.example"}));
    }

    #[test]
    fn test_integer_value_falls_back_to_raw_text() {
        assert_eq!(integer_value(" 280 "), json!(280));
        assert_eq!(integer_value("about 200"), json!("about 200"));
        assert_eq!(integer_value(""), json!(""));
    }

    #[test]
    fn test_integer_dictionary_mixes_numbers_and_text() {
        assert_eq!(
            integer_dictionary_value("hero: 50\nlifestyle: lots"),
            json!({"hero": 50, "lifestyle": "lots"})
        );
    }

    #[test]
    fn test_render_list_and_dictionary() {
        assert_eq!(render_list(Some(&json!(["a", "b"]))), "a, b");
        assert_eq!(render_list(None), "");
        assert_eq!(
            render_dictionary(Some(&json!({"cream": "#F5F0E8", "hero": 50}))),
            "cream: #F5F0E8\nhero: 50"
        );
        assert_eq!(render_dictionary(Some(&json!("not a map"))), "");
    }

    #[test]
    fn test_rendered_fields_parse_back_to_same_values() {
        let list = json!(["Use sentence case", "Keep overlay text short"]);
        assert_eq!(list_value(&render_list(Some(&list))), list);

        let mix = json!({"detail": 25, "hero": 50});
        assert_eq!(integer_dictionary_value(&render_dictionary(Some(&mix))), mix);
    }
}
