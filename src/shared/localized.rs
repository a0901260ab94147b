//! Localized Content
//!
//! Content rows store their text as a JSON object keyed by language code,
//! for example `{"en": "Octopuses have three hearts.", "tr": "..."}`.
//! Quiz options use the same layout with a list per language. Older rows may
//! hold the list as a JSON-encoded string, so option lookups accept both.
//!
//! Lookups fall back to English, then to an empty value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fallback language for every lookup
pub const DEFAULT_LANGUAGE: &str = "en";

/// A language-keyed JSON object decoded from a content column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, Value>);

impl LocalizedText {
    /// Decode a stored column, treating malformed JSON as empty content
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self(map.into_iter().collect()),
            Ok(Value::String(text)) => Self::from_english(text),
            Ok(_) | Err(_) => {
                tracing::debug!("Stored localized text is not a JSON object");
                Self::default()
            }
        }
    }

    /// Build a value holding only English text
    pub fn from_english(text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(DEFAULT_LANGUAGE.to_string(), Value::String(text.into()));
        Self(map)
    }

    fn lookup(&self, lang: &str) -> Option<&Value> {
        self.0
            .get(lang)
            .filter(|v| !is_blank(v))
            .or_else(|| self.0.get(DEFAULT_LANGUAGE))
    }

    /// Text for `lang`, falling back to English
    pub fn text(&self, lang: &str) -> String {
        match self.lookup(lang) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Option list for `lang`, falling back to English
    pub fn options(&self, lang: &str) -> Vec<String> {
        match self.lookup(lang) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(raw)) => {
                serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| vec![raw.clone()])
            }
            _ => Vec::new(),
        }
    }

    /// English text, if present
    pub fn english(&self) -> Option<&str> {
        self.0.get(DEFAULT_LANGUAGE).and_then(Value::as_str)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_falls_back_to_english() {
        let text = LocalizedText::parse(r#"{"en": "Hello", "tr": "Merhaba", "de": ""}"#);
        assert_eq!(text.text("tr"), "Merhaba");
        assert_eq!(text.text("fr"), "Hello");
        assert_eq!(text.text("de"), "Hello");
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let text = LocalizedText::parse("{not json");
        assert_eq!(text.text("en"), "");
        assert!(text.options("en").is_empty());
        assert!(LocalizedText::parse("[1, 2]").english().is_none());
    }

    #[test]
    fn test_options_accept_lists_and_encoded_strings() {
        let lists = LocalizedText::parse(r#"{"en": ["A", "B", "C", "D"]}"#);
        assert_eq!(lists.options("es"), vec!["A", "B", "C", "D"]);

        let encoded = LocalizedText::parse(r#"{"en": "[\"A\", \"B\"]"}"#);
        assert_eq!(encoded.options("en"), vec!["A", "B"]);

        let plain = LocalizedText::parse(r#"{"en": "just one"}"#);
        assert_eq!(plain.options("en"), vec!["just one"]);
    }

    #[test]
    fn test_reads_seeder_column_format() {
        let mut texts = BTreeMap::new();
        texts.insert("en".to_string(), "Fact".to_string());
        texts.insert("ja".to_string(), "事実".to_string());
        let stored = serde_json::to_string(&texts).unwrap();
        let parsed = LocalizedText::parse(&stored);
        assert_eq!(parsed.text("ja"), "事実");
        assert_eq!(parsed.english(), Some("Fact"));
    }
}
