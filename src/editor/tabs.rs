//! Structured-view layout.
//!
//! The tabs are data, not code: each field names the document path it
//! binds to and how its text is coerced. Keys outside these paths are never
//! shown here and never touched by a structured edit.

use serde_json::{Map, Value};

use crate::document::{ConfigDocument, FieldPath, fields};
use crate::errors::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, stored trimmed.
    Text,
    /// Comma-separated list of strings.
    List,
    /// `key: value` lines, string values.
    Dictionary,
    /// Integer when parseable, raw text otherwise.
    Integer,
    /// `key: value` lines with integer coercion per value.
    IntegerDictionary,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn field_path(&self) -> Result<FieldPath, DocumentError> {
        FieldPath::new(self.path.iter().copied())
    }

    /// Display text for this field from `document`. Missing values read as
    /// empty.
    pub fn read(&self, document: &ConfigDocument) -> String {
        let value = self
            .field_path()
            .ok()
            .and_then(|path| document.get(&path).cloned());
        match self.kind {
            FieldKind::List => fields::render_list(value.as_ref()),
            FieldKind::Dictionary | FieldKind::IntegerDictionary => {
                fields::render_dictionary(value.as_ref())
            }
            FieldKind::Text | FieldKind::Integer => {
                value.as_ref().map(fields::render_scalar).unwrap_or_default()
            }
        }
    }

    /// Convert operator text into the value stored at this field's path.
    pub fn coerce(&self, text: &str) -> Value {
        match self.kind {
            FieldKind::Text => Value::String(text.trim().to_string()),
            FieldKind::List => fields::list_value(text),
            FieldKind::Dictionary => fields::dictionary_value(text),
            FieldKind::Integer => fields::integer_value(text),
            FieldKind::IntegerDictionary => fields::integer_dictionary_value(text),
        }
    }
}

#[derive(Debug)]
pub struct TabSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

macro_rules! field {
    ($key:literal, $label:literal, [$($seg:literal),+], $kind:ident) => {
        FieldSpec {
            key: $key,
            label: $label,
            path: &[$($seg),+],
            kind: FieldKind::$kind,
        }
    };
}

pub const TABS: &[TabSpec] = &[
    TabSpec {
        id: "basics",
        title: "Basics",
        fields: &[
            field!("brand_tagline", "Tagline", ["brand", "tagline"], Text),
            field!("brand_language", "Language", ["language"], Text),
            field!("product_singular", "Product (singular)", ["product_vocabulary", "singular"], Text),
            field!("product_plural", "Product (plural)", ["product_vocabulary", "plural"], Text),
            field!("product_featured_part", "Featured part", ["product_vocabulary", "featured_part"], Text),
            field!("audience_profile", "Audience profile", ["audience_profile"], Text),
            field!("brand_voice", "Brand voice", ["brand_voice"], Text),
            field!("llm_guardrails", "Guardrails", ["llm_guardrails"], Text),
        ],
    },
    TabSpec {
        id: "colors",
        title: "Colors & Typography",
        fields: &[
            field!("colors_primary", "Primary colors", ["colors", "primary"], Dictionary),
            field!("colors_secondary", "Secondary colors", ["colors", "secondary"], Dictionary),
            field!("colors_accent", "Accent colors", ["colors", "accent"], Dictionary),
            field!("typography_heading_feel", "Heading feel", ["typography", "heading_feel"], Text),
            field!("typography_body_feel", "Body feel", ["typography", "body_feel"], Text),
            field!("typography_overlay_feel", "Overlay feel", ["typography", "overlay_feel"], Text),
            field!("typography_rules", "Typography rules", ["typography", "rules"], List),
        ],
    },
    TabSpec {
        id: "visual",
        title: "Visual Identity",
        fields: &[
            field!("visual_grid_aesthetic", "Grid aesthetic", ["visual_identity", "grid_aesthetic"], Text),
            field!("visual_dominant_mood", "Dominant mood", ["visual_identity", "dominant_mood"], Text),
            field!("visual_avoid", "Avoid", ["visual_identity", "avoid"], List),
            field!("visual_prefer", "Prefer", ["visual_identity", "prefer"], List),
        ],
    },
    TabSpec {
        id: "props",
        title: "Props Library",
        fields: &[
            field!("props_warm", "Warm", ["props_library", "warm"], List),
            field!("props_minimal", "Minimal", ["props_library", "minimal"], List),
            field!("props_luxe", "Luxe", ["props_library", "luxe"], List),
            field!("props_earthy", "Earthy", ["props_library", "earthy"], List),
            field!("props_never_use", "Never use", ["props_library", "never_use"], List),
        ],
    },
    TabSpec {
        id: "display",
        title: "Display Styles",
        fields: &[
            field!("display_styles", "Display styles", ["display_styles"], Dictionary),
            field!("variation_modifiers", "Variation modifiers", ["variation_modifiers"], List),
        ],
    },
    TabSpec {
        id: "hashtags",
        title: "Hashtags",
        fields: &[
            field!("hashtags_brand_always", "Always", ["hashtags", "brand_always"], List),
            field!("hashtags_craft", "Craft", ["hashtags", "craft"], List),
            field!("hashtags_product", "Product", ["hashtags", "product"], List),
            field!("hashtags_product_other", "Product (other)", ["hashtags", "product_other"], List),
            field!("hashtags_discovery", "Discovery", ["hashtags", "discovery"], List),
            field!("hashtags_occasion_festive", "Festive", ["hashtags", "occasion_festive"], List),
            field!("hashtags_occasion_wedding", "Wedding", ["hashtags", "occasion_wedding"], List),
            field!("hashtags_occasion_everyday", "Everyday", ["hashtags", "occasion_everyday"], List),
            field!("hashtags_niche", "Niche", ["hashtags", "niche"], List),
            field!("hashtags_never_use", "Never use", ["hashtags", "never_use"], List),
        ],
    },
    TabSpec {
        id: "captions",
        title: "Captions",
        fields: &[
            field!("captions_optimal_length", "Optimal length", ["caption_rules", "optimal_length"], Text),
            field!("captions_max_length", "Max length", ["caption_rules", "max_length"], Integer),
            field!("captions_emoji_limit", "Emoji limit", ["caption_rules", "emoji_limit"], Integer),
            field!("captions_must_mention", "Must mention", ["caption_rules", "must_mention"], List),
            field!("captions_banned_words", "Banned words", ["caption_rules", "banned_words"], List),
            field!("captions_cta_rotation", "CTA rotation", ["cta_rotation"], List),
        ],
    },
    TabSpec {
        id: "occasions",
        title: "Occasions",
        fields: &[
            field!("occasions_festive", "Festive", ["occasions", "festive"], List),
            field!("occasions_wedding", "Wedding", ["occasions", "wedding"], List),
            field!("occasions_everyday", "Everyday", ["occasions", "everyday"], List),
            field!("occasions_campaign", "Campaign", ["occasions", "campaign"], List),
            field!("occasions_content_mix", "Content mix (%)", ["occasions", "content_mix"], IntegerDictionary),
        ],
    },
];

pub fn tab(id: &str) -> Option<&'static TabSpec> {
    TABS.iter().find(|tab| tab.id == id)
}

pub fn field(key: &str) -> Option<&'static FieldSpec> {
    TABS.iter()
        .flat_map(|tab| tab.fields.iter())
        .find(|field| field.key == key)
}

/// Top-level keys some structured field reaches into.
pub fn covered_top_level_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = TABS
        .iter()
        .flat_map(|tab| tab.fields.iter())
        .map(|field| field.path[0])
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// A unit the backend saves on its own: the top-level keys it replaces.
#[derive(Debug)]
pub struct SectionSpec {
    pub id: &'static str,
    pub keys: &'static [&'static str],
    /// The backend takes this section as the flat field texts of its form
    /// rather than as nested sections.
    pub flat_fields: bool,
}

pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        id: "basics",
        keys: &[
            "brand",
            "language",
            "product_vocabulary",
            "audience_profile",
            "brand_voice",
            "llm_guardrails",
        ],
        flat_fields: true,
    },
    SectionSpec {
        id: "colors",
        keys: &["colors"],
        flat_fields: false,
    },
    SectionSpec {
        id: "typography",
        keys: &["typography"],
        flat_fields: false,
    },
    SectionSpec {
        id: "visual",
        keys: &["visual_identity"],
        flat_fields: false,
    },
    SectionSpec {
        id: "props",
        keys: &["props_library"],
        flat_fields: false,
    },
    SectionSpec {
        id: "display",
        keys: &["display_styles", "variation_modifiers"],
        flat_fields: false,
    },
    SectionSpec {
        id: "hashtags",
        keys: &["hashtags"],
        flat_fields: false,
    },
    SectionSpec {
        id: "captions",
        keys: &["caption_rules", "cta_rotation"],
        flat_fields: false,
    },
    SectionSpec {
        id: "occasions",
        keys: &["occasions"],
        flat_fields: false,
    },
];

impl SectionSpec {
    pub fn covers(&self, top_level: &str) -> bool {
        self.keys.contains(&top_level)
    }

    /// Structured fields whose values this section saves.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        TABS.iter()
            .flat_map(|tab| tab.fields.iter())
            .filter(|field| self.covers(field.path[0]))
    }

    /// Request body for a save of just this section.
    pub fn payload(&self, document: &ConfigDocument) -> Value {
        let mut body = Map::new();
        if self.flat_fields {
            for field in self.fields() {
                body.insert(field.key.to_string(), Value::String(field.read(document)));
            }
        } else {
            for key in self.keys {
                if let Some(value) = document.as_map().get(*key) {
                    body.insert(key.to_string(), value.clone());
                }
            }
        }
        Value::Object(body)
    }
}

pub fn section(id: &str) -> Option<&'static SectionSpec> {
    SECTIONS.iter().find(|section| section.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_field_keys_are_unique() {
        let mut seen = HashSet::new();
        for tab in TABS {
            for field in tab.fields {
                assert!(seen.insert(field.key), "duplicate field key {}", field.key);
            }
        }
    }

    #[test]
    fn test_every_field_path_is_valid() {
        for tab in TABS {
            for field in tab.fields {
                assert!(field.field_path().is_ok(), "bad path on {}", field.key);
            }
        }
    }

    #[test]
    fn test_colors_tab_binds_colors_and_typography() {
        let colors = tab("colors").unwrap();
        assert_eq!(colors.title, "Colors & Typography");
        assert!(colors
            .fields
            .iter()
            .all(|f| f.path[0] == "colors" || f.path[0] == "typography"));
    }

    #[test]
    fn test_read_renders_by_kind() {
        let doc = ConfigDocument::from_value(json!({
            "colors": {"primary": {"charcoal": "#2C2C2C"}},
            "caption_rules": {"max_length": 280},
            "typography": {"rules": ["Use sentence case", "Short overlays"]}
        }))
        .unwrap();
        assert_eq!(field("colors_primary").unwrap().read(&doc), "charcoal: #2C2C2C");
        assert_eq!(field("captions_max_length").unwrap().read(&doc), "280");
        assert_eq!(
            field("typography_rules").unwrap().read(&doc),
            "Use sentence case, Short overlays"
        );
        assert_eq!(field("brand_voice").unwrap().read(&doc), "");
    }

    #[test]
    fn test_coerce_by_kind() {
        assert_eq!(field("brand_voice").unwrap().coerce("  Warm  "), json!("Warm"));
        assert_eq!(field("captions_emoji_limit").unwrap().coerce("3"), json!(3));
        assert_eq!(field("captions_emoji_limit").unwrap().coerce("few"), json!("few"));
        assert_eq!(field("hashtags_craft").unwrap().coerce("#a, #b"), json!(["#a", "#b"]));
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_section() {
        for tab in TABS {
            for field in tab.fields {
                let owners = SECTIONS.iter().filter(|s| s.covers(field.path[0])).count();
                assert_eq!(owners, 1, "{} is saved by {} sections", field.key, owners);
            }
        }
    }

    #[test]
    fn test_basics_payload_is_flat_field_text() {
        let doc = ConfigDocument::from_value(json!({
            "brand": {"tagline": "Woven by hand"},
            "language": "en",
            "product_vocabulary": {"singular": "saree"},
            "colors": {"primary": {"ivory": "#FFFFF0"}}
        }))
        .unwrap();
        let body = section("basics").unwrap().payload(&doc);
        assert_eq!(body["brand_tagline"], json!("Woven by hand"));
        assert_eq!(body["product_singular"], json!("saree"));
        assert_eq!(body["brand_voice"], json!(""));
        assert!(body.get("colors").is_none());
    }

    #[test]
    fn test_nested_payload_sends_only_present_section_keys() {
        let doc = ConfigDocument::from_value(json!({
            "caption_rules": {"max_length": 280},
            "hashtags": {"niche": ["#handloom"]}
        }))
        .unwrap();
        assert_eq!(
            section("captions").unwrap().payload(&doc),
            json!({"caption_rules": {"max_length": 280}})
        );
        assert!(section("tagline").is_none());
    }

    #[test]
    fn test_covered_keys_exclude_unknown_namespaces() {
        let covered = covered_top_level_keys();
        assert!(covered.contains(&"colors"));
        assert!(covered.contains(&"cta_rotation"));
        assert!(!covered.contains(&"sample_artisans"));
        assert!(!covered.contains(&"product_code_pattern"));
    }
}
