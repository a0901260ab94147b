//! Content file translation
//!
//! Walks a content JSON tree and fills one target language from English in
//! every localized object, i.e. every object holding an `"en"` key. Strings
//! and option lists are both handled:
//!
//! ```json
//! {"question_texts": {"en": "Largest planet?", "hi": ""},
//!  "options_texts": {"en": ["Mars", "Jupiter", "Venus", "Earth"]}}
//! ```
//!
//! The output file is written even when a model call fails part way, so
//! finished translations are kept and a rerun only has to redo the rest.

use std::path::Path;

use serde_json::Value;

use crate::seeding::error::SeedError;
use crate::seeding::generator::{strip_code_fence, ContentModel};
use crate::shared::i18n::is_supported_language;

/// Counts of localized objects filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateReport {
    pub texts: usize,
    pub lists: usize,
}

fn escape_pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// JSON pointers of every object that holds an `"en"` key, parents first
pub fn localized_pointers(value: &Value) -> Vec<String> {
    fn walk(value: &Value, path: String, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                if map.contains_key("en") {
                    out.push(path.clone());
                }
                for (key, child) in map {
                    walk(child, format!("{}/{}", path, escape_pointer_token(key)), out);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    walk(child, format!("{}/{}", path, index), out);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(value, String::new(), &mut out);
    out
}

/// Translate one English string into `lang`
pub async fn translate_to(model: &dyn ContentModel, text: &str, lang: &str) -> Result<String, SeedError> {
    let prompt = format!(
        "Translate the following English text into the language with code '{}'. \
         Respond with the translation only.\n\nText: \"{}\"",
        lang, text
    );
    let raw = model.complete(&prompt).await?;
    let translated = strip_code_fence(&raw).trim().trim_matches('"').trim();
    if translated.is_empty() {
        return Err(SeedError::Model(format!("empty translation for {:?}", text)));
    }
    Ok(translated.to_string())
}

/// Fill `lang` from `en` in every localized object of `data`
///
/// On error, objects filled so far keep their translations.
pub async fn fill_language(model: &dyn ContentModel, data: &mut Value, lang: &str) -> Result<TranslateReport, SeedError> {
    let mut report = TranslateReport::default();

    for pointer in localized_pointers(data) {
        let english = match data.pointer(&pointer).and_then(|obj| obj.get("en")) {
            Some(english) => english.clone(),
            None => continue,
        };

        let translated = match english {
            Value::String(text) if !text.trim().is_empty() => {
                report.texts += 1;
                Value::String(translate_to(model, &text, lang).await?)
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(text) if !text.trim().is_empty() => {
                            out.push(Value::String(translate_to(model, &text, lang).await?));
                        }
                        other => out.push(other),
                    }
                }
                report.lists += 1;
                Value::Array(out)
            }
            _ => continue,
        };

        if let Some(Value::Object(map)) = data.pointer_mut(&pointer) {
            map.insert(lang.to_string(), translated);
        }
        tracing::debug!("Translated {}", pointer);
    }

    Ok(report)
}

/// Translate `input` into `lang` and write the result to `output`
///
/// # Errors
///
/// Fails for an unsupported or English target language, unreadable input,
/// or a failed model call. In the last case `output` still receives the
/// partially translated document.
pub async fn translate_file(
    model: &dyn ContentModel,
    input: &Path,
    output: &Path,
    lang: &str,
) -> Result<TranslateReport, SeedError> {
    if lang == "en" || !is_supported_language(lang) {
        return Err(SeedError::InvalidContent(format!("unsupported target language: {}", lang)));
    }

    let raw = std::fs::read_to_string(input).map_err(|e| SeedError::io(input, e))?;
    let mut data: Value = serde_json::from_str(&raw)?;

    let outcome = fill_language(model, &mut data, lang).await;
    if let Err(e) = &outcome {
        tracing::error!("Translation interrupted: {}; saving partial result", e);
    }

    let rendered = serde_json::to_string_pretty(&data)?;
    std::fs::write(output, rendered).map_err(|e| SeedError::io(output, e))?;
    tracing::info!("Wrote {}", output.display());

    outcome
}
