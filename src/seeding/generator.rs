/**
 * Generative Content
 *
 * Creates English infos and quiz questions for a topic with a generative
 * model, translates them into every supported language through the same
 * model, and inserts them.
 *
 * # Model Output
 *
 * Models often wrap JSON in a Markdown code fence and vary key names, so
 * parsing strips fences and accepts the common aliases:
 *
 * - question: `question_text` or `question`
 * - answer: `correct_answer_index`, `correctAnswerIndex` or `answer`
 *
 * A quiz is only accepted with exactly four options and an in-range answer.
 * Translations missing a language fall back to the English text.
 *
 * # Rate Limits
 *
 * `RetryingModel` retries rate-limited calls after a fixed delay, up to a
 * bounded number of attempts.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatRequest};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::backend::content::db::ContentKind;
use crate::backend::content::topics::{is_known_topic, topic_display_name};
use crate::seeding::error::SeedError;
use crate::seeding::importer::{validate_quiz, QUIZ_OPTION_COUNT};
use crate::seeding::store::{english_text_exists, insert_info, insert_quiz, InfoRecord, QuizRecord};
use crate::shared::i18n::SUPPORTED_LANGUAGES;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(35);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A text-in, text-out generative model
#[async_trait]
pub trait ContentModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SeedError>;
}

/// `ContentModel` backed by the `genai` multi-provider client
///
/// The provider is chosen from the model name; credentials come from the
/// provider's usual environment variable (`GEMINI_API_KEY` for Gemini).
/// Every provider error surfaces as `SeedError::Model`; wrap in
/// `RetryingModel` to ride out rate limits.
pub struct GenaiModel {
    client: genai::Client,
    model: String,
}

impl GenaiModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: genai::Client::default(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ContentModel for GenaiModel {
    async fn complete(&self, prompt: &str) -> Result<String, SeedError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| SeedError::Model(e.to_string()))?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| SeedError::Model("empty response".into()))
    }
}

/// Whether a provider error message reports rate limiting
pub fn is_rate_limited(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    message.contains("429") || message.contains("RESOURCE_EXHAUSTED") || lower.contains("rate limit")
}

/// Retries rate-limited calls of an inner model after a fixed delay
///
/// Other errors are returned at once. After `max_attempts` rate-limited
/// calls the wrapper gives up with `SeedError::RateLimited` without a final
/// wait.
pub struct RetryingModel<M> {
    inner: M,
    max_attempts: u32,
    delay: Duration,
}

impl<M: ContentModel> RetryingModel<M> {
    pub fn new(inner: M) -> Self {
        Self::with_policy(inner, DEFAULT_MAX_ATTEMPTS, DEFAULT_RATE_LIMIT_DELAY)
    }

    pub fn with_policy(inner: M, max_attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: ContentModel> ContentModel for RetryingModel<M> {
    async fn complete(&self, prompt: &str) -> Result<String, SeedError> {
        for attempt in 1..=self.max_attempts {
            match self.inner.complete(prompt).await {
                Err(SeedError::Model(message)) if is_rate_limited(&message) => {
                    if attempt == self.max_attempts {
                        break;
                    }
                    tracing::warn!(
                        "Rate limited (attempt {}/{}), waiting {:?}",
                        attempt,
                        self.max_attempts,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                }
                other => return other,
            }
        }
        tracing::error!("Still rate limited after {} attempts", self.max_attempts);
        Err(SeedError::RateLimited(self.max_attempts))
    }
}

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// An English quiz question produced by the model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// An English info produced by the model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInfo {
    pub text: String,
    pub source: Option<String>,
}

fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| value[*key].as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn parse_quiz(raw: &str) -> Result<GeneratedQuiz, SeedError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;

    let question = first_str(&value, &["question_text", "question"])
        .ok_or_else(|| SeedError::InvalidContent("missing question text".into()))?
        .to_string();

    let options: Vec<String> = value["options"]
        .as_array()
        .ok_or_else(|| SeedError::InvalidContent("missing options".into()))?
        .iter()
        .filter_map(|o| o.as_str().map(|s| s.trim().to_string()))
        .collect();
    if options.len() != QUIZ_OPTION_COUNT {
        return Err(SeedError::InvalidContent(format!("expected {} options", QUIZ_OPTION_COUNT)));
    }

    let correct_answer_index = ["correct_answer_index", "correctAnswerIndex", "answer"]
        .iter()
        .find_map(|key| value[*key].as_u64())
        .ok_or_else(|| SeedError::InvalidContent("missing answer index".into()))? as usize;
    if correct_answer_index >= options.len() {
        return Err(SeedError::InvalidContent(format!("answer index {} out of range", correct_answer_index)));
    }

    Ok(GeneratedQuiz {
        question,
        options,
        correct_answer_index,
    })
}

/// Parse an info from `{"info": ..., "source": ...}` JSON, or from
/// `Info: ...` / `Source: ...` lines
pub fn parse_info(raw: &str) -> Result<GeneratedInfo, SeedError> {
    let body = strip_code_fence(raw);

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let text = first_str(&value, &["info", "info_text", "text"])
            .ok_or_else(|| SeedError::InvalidContent("missing info text".into()))?;
        return Ok(GeneratedInfo {
            text: text.to_string(),
            source: first_str(&value, &["source"]).map(str::to_string),
        });
    }

    let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());
    let text = lines
        .next()
        .map(|l| l.strip_prefix("Info:").unwrap_or(l).trim())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| SeedError::InvalidContent("empty info".into()))?;
    let source = lines
        .next()
        .map(|l| l.strip_prefix("Source:").unwrap_or(l).trim().to_string())
        .filter(|l| !l.is_empty());

    Ok(GeneratedInfo {
        text: text.to_string(),
        source,
    })
}

/// Parse a `{lang: text}` translation object, filling gaps with `english`
pub fn parse_translations(raw: &str, english: &str) -> Result<BTreeMap<String, String>, SeedError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let object = value
        .as_object()
        .ok_or_else(|| SeedError::InvalidContent("translation is not a JSON object".into()))?;

    Ok(SUPPORTED_LANGUAGES
        .iter()
        .map(|lang| {
            let text = match *lang {
                "en" => english.to_string(),
                _ => object
                    .get(*lang)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(english)
                    .to_string(),
            };
            (lang.to_string(), text)
        })
        .collect())
}

fn english_only(text: &str) -> BTreeMap<String, String> {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|lang| (lang.to_string(), text.to_string()))
        .collect()
}

/// Translate English `text` into every supported language
///
/// An unparseable model answer yields English text for every language.
pub async fn translate_text(model: &dyn ContentModel, text: &str) -> Result<BTreeMap<String, String>, SeedError> {
    let prompt = format!(
        "Translate the following English text into these languages: {}. \
         Respond with a single JSON object whose keys are the language codes \
         and whose values are the translated strings.\n\nText: \"{}\"",
        SUPPORTED_LANGUAGES.join(", "),
        text
    );
    let raw = model.complete(&prompt).await?;
    match parse_translations(&raw, text) {
        Ok(translations) => Ok(translations),
        Err(e) => {
            tracing::warn!("Unusable translation ({}), keeping English", e);
            Ok(english_only(text))
        }
    }
}

/// Translate each option and regroup them per language
pub async fn translate_options(
    model: &dyn ContentModel,
    options: &[String],
) -> Result<BTreeMap<String, Vec<String>>, SeedError> {
    let mut grouped: BTreeMap<String, Vec<String>> = SUPPORTED_LANGUAGES
        .iter()
        .map(|lang| (lang.to_string(), Vec::with_capacity(options.len())))
        .collect();

    for option in options {
        let translated = translate_text(model, option).await?;
        for (lang, list) in grouped.iter_mut() {
            list.push(translated.get(lang).cloned().unwrap_or_else(|| option.clone()));
        }
    }
    Ok(grouped)
}

/// What `generate` should create
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GenerateKind {
    Info,
    Quiz,
}

/// Outcome of a generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

fn info_prompt(topic: &str) -> String {
    format!(
        "Write one short, surprising and little-known fact about {}. \
         Respond with a JSON object: {{\"info\": \"the fact\", \"source\": \"where it comes from\"}}.",
        topic
    )
}

fn quiz_prompt(topic: &str) -> String {
    format!(
        "Create one general-knowledge multiple-choice question about {}. \
         Give exactly 4 options with exactly one correct answer. Respond with a JSON object: \
         {{\"question_text\": \"...\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"correct_answer_index\": 0}}.",
        topic
    )
}

/// Generate `count` new items of `kind` for `topic`
///
/// Each model answer is validated and checked against existing English
/// text before translation. At most three model answers per requested item
/// are tried, so a model that keeps producing unusable output terminates.
///
/// # Errors
///
/// `SeedError::InvalidContent` for an unknown topic; model and database
/// errors are propagated.
pub async fn generate(
    pool: &SqlitePool,
    model: &dyn ContentModel,
    topic: &str,
    kind: GenerateKind,
    count: usize,
) -> Result<GenerateReport, SeedError> {
    if !is_known_topic(topic) {
        return Err(SeedError::InvalidContent(format!("unknown topic: {}", topic)));
    }
    let topic_name = topic_display_name(topic);
    let mut report = GenerateReport::default();

    for _ in 0..count.saturating_mul(3) {
        if report.inserted >= count {
            break;
        }

        match kind {
            GenerateKind::Info => {
                let raw = model.complete(&info_prompt(topic_name)).await?;
                let info = match parse_info(&raw) {
                    Ok(info) => info,
                    Err(e) => {
                        tracing::debug!("Rejected info: {}", e);
                        report.invalid += 1;
                        continue;
                    }
                };
                if english_text_exists(pool, ContentKind::Info, &info.text).await? {
                    report.duplicates += 1;
                    continue;
                }
                let record = InfoRecord {
                    info_texts: translate_text(model, &info.text).await?,
                    category: topic.to_string(),
                    source: info.source,
                };
                insert_info(pool, &record).await?;
            }
            GenerateKind::Quiz => {
                let raw = model.complete(&quiz_prompt(topic_name)).await?;
                let quiz = match parse_quiz(&raw) {
                    Ok(quiz) => quiz,
                    Err(e) => {
                        tracing::debug!("Rejected quiz: {}", e);
                        report.invalid += 1;
                        continue;
                    }
                };
                if english_text_exists(pool, ContentKind::Quiz, &quiz.question).await? {
                    report.duplicates += 1;
                    continue;
                }
                let record = QuizRecord {
                    question_texts: translate_text(model, &quiz.question).await?,
                    options_texts: translate_options(model, &quiz.options).await?,
                    correct_answer_index: quiz.correct_answer_index as i64,
                    category: topic.to_string(),
                };
                validate_quiz(&record)?;
                insert_quiz(pool, &record).await?;
            }
        }

        report.inserted += 1;
        tracing::info!("Inserted {}/{} {:?} items for {}", report.inserted, count, kind, topic);
    }

    Ok(report)
}
