//! Raw-view serialization of a profile document.

use serde_json::Value;

use super::ConfigDocument;
use crate::errors::DocumentError;

/// Pretty-print the whole document with two-space indentation.
pub fn to_raw_text(document: &ConfigDocument) -> String {
    format!("{:#}", document.to_value())
}

/// Parse raw-view text back into a document.
///
/// The text must be well-formed JSON whose root is a keyed object; lists,
/// scalars and `null` at the root are rejected.
pub fn parse_raw_text(text: &str) -> Result<ConfigDocument, DocumentError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DocumentError::RawSyntax(e.to_string()))?;
    ConfigDocument::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_text_is_indented_json() {
        let doc = ConfigDocument::from_value(json!({"language": "en"})).unwrap();
        assert_eq!(to_raw_text(&doc), "{\n  \"language\": \"en\"\n}");
    }

    #[test]
    fn test_round_trip_preserves_nested_values() {
        let doc = ConfigDocument::from_value(json!({
            "caption_rules": {"max_length": 280, "emoji_limit": 2, "must_mention": []},
            "occasions": {"content_mix": {"hero": 50, "detail": 25}},
            "product_vocabulary": {"featured_part": null, "parts": {}},
            "x_flags": {"beta": true, "ratio": 0.5}
        }))
        .unwrap();
        assert_eq!(parse_raw_text(&to_raw_text(&doc)).unwrap(), doc);
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let err = parse_raw_text("{\"language\": \"en\",}").unwrap_err();
        assert!(matches!(err, DocumentError::RawSyntax(_)));
    }

    #[test]
    fn test_parse_rejects_non_object_roots() {
        assert_eq!(
            parse_raw_text("[1, 2]"),
            Err(DocumentError::RootNotObject { found: "a list" })
        );
        assert_eq!(
            parse_raw_text("null"),
            Err(DocumentError::RootNotObject { found: "null" })
        );
        assert_eq!(
            parse_raw_text("\"text\""),
            Err(DocumentError::RootNotObject { found: "a string" })
        );
    }
}
