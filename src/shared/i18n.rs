//! Supported languages and localized user-facing messages.

/// Language codes accepted for user preferences and content lookups
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "tr", "fr", "de", "it", "es", "ru", "zh", "ja", "hi", "ar"];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Pick the first supported language among a request override and a stored
/// preference, defaulting to English
pub fn resolve_language(requested: Option<&str>, preferred: &str) -> String {
    requested
        .map(str::trim)
        .filter(|code| is_supported_language(code))
        .or_else(|| Some(preferred).filter(|code| is_supported_language(code)))
        .unwrap_or("en")
        .to_string()
}

/// Messages returned to clients when a daily allowance is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitMessage {
    DailyQuizLimitReached,
    DailyChallengeLimitReached,
}

impl LimitMessage {
    fn templates(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::DailyQuizLimitReached => &[
                ("en", "Daily quiz limit reached ({limit})."),
                ("tr", "Günlük quiz limiti doldu ({limit})."),
                ("de", "Tägliches Quiz-Limit erreicht ({limit})."),
                ("fr", "Limite quotidienne de quiz atteinte ({limit})."),
                ("it", "Limite giornaliera dei quiz raggiunta ({limit})."),
                ("es", "Límite diario de cuestionarios alcanzado ({limit})."),
                ("zh", "每日测验次数已达上限（{limit}）。"),
                ("ja", "1日のクイズ上限に達しました（{limit}）。"),
                ("hi", "दैनिक क्विज़ सीमा पहुँच गई ({limit})."),
                ("ar", "تم الوصول إلى الحد اليومي للاختبارات ({limit})."),
                ("ru", "Достигнут суточный лимит викторин ({limit})."),
            ],
            Self::DailyChallengeLimitReached => &[
                ("en", "Daily challenge limit reached ({limit})."),
                ("tr", "Günlük challenge limiti doldu ({limit})."),
                ("de", "Tägliches Challenge-Limit erreicht ({limit})."),
                ("fr", "Limite quotidienne de challenge atteinte ({limit})."),
                ("it", "Limite giornaliera delle challenge raggiunta ({limit})."),
                ("es", "Límite diario de challenge alcanzado ({limit})."),
                ("zh", "每日挑战次数已达上限（{limit}）。"),
                ("ja", "1日のチャレンジ上限に達しました（{limit}）。"),
                ("hi", "दैनिक चैलेंज सीमा पहुँच गई ({limit})."),
                ("ar", "تم الوصول إلى الحد اليومي للتحديات ({limit})."),
                ("ru", "Достигнут суточный лимит челленджей ({limit})."),
            ],
        }
    }

    /// Render the message in `lang` (English fallback) with the limit filled in
    pub fn render(self, lang: &str, limit: i64) -> String {
        let templates = self.templates();
        let template = templates
            .iter()
            .find(|(code, _)| *code == lang)
            .or_else(|| templates.iter().find(|(code, _)| *code == "en"))
            .map(|(_, t)| *t)
            .unwrap_or("{limit}");
        template.replace("{limit}", &limit.to_string())
    }
}
