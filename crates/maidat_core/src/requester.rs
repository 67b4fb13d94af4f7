//! crates/maidat_core/src/requester.rs
//!
//! The content requester: turns a day number into one schema-constrained
//! provider call and accepts the answer only if it parses into a complete
//! `DailyContent`.

use crate::domain::{DailyContent, Day, DayError};
use crate::ports::{ContentGenerationService, GenerationRequest, PortError};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

const SYSTEM_INSTRUCTIONS: &str = "You write the daily pages of a Ramadan devotional program in the spirit of Ahl al-Bayt (AS). \
Write every section in eloquent, warm Modern Standard Arabic suitable for a family gathering. \
Keep each section self-contained and free of Markdown.";

const PROMPT_TEMPLATE: &str = r#"Generate content for Day {day} of a Ramadan program called 'Ma'idat al-Nur'.
The content should follow this structure in Arabic:
1. Introduction: A Quranic verse about fasting and piety, linked to daily life.
2. Mihrab al-Layla: A passage from a famous Ramadan Dua (like Iftitah or Abu Hamza) with a brief spiritual/psychological reflection.
3. Sira wa Mawqif: A moral or human situation from the life of the Prophet (PBUH) or Ahl al-Bayt (AS), focusing on social values (mercy, generosity, etc.) and how to apply it today.
4. Fiqh al-Hayah: A simple answer to a practical jurisprudence question (ethics of work, social media, etc.).
5. Zad al-Sa'im: A health or psychological tip for the fasting person.
6. A short prayer for the reappearance of Imam Mahdi (AJ).

Return the response in JSON format."#;

pub const SCHEMA_NAME: &str = "daily_content";

//=========================================================================================
// Errors
//=========================================================================================

/// Everything that can go wrong while fetching one day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Invalid day: {0}")]
    InvalidDay(#[from] DayError),

    #[error("Provider call failed: {0}")]
    Provider(#[from] PortError),

    #[error("Provider returned content that does not match the daily schema: {0}")]
    Malformed(String),

    #[error("Provider left the required field `{0}` empty")]
    EmptyField(&'static str),
}

impl ContentError {
    /// True for transport failures and schema violations alike; the shell
    /// treats them the same way.
    pub fn is_provider_error(&self) -> bool {
        !matches!(self, ContentError::InvalidDay(_))
    }
}

//=========================================================================================
// Request construction and response handling
//=========================================================================================

/// Builds the natural-language prompt for one day.
pub fn build_prompt(day: Day) -> String {
    PROMPT_TEMPLATE.replace("{day}", &day.to_string())
}

/// Builds the full schema-constrained request for one day.
pub fn build_request(day: Day) -> GenerationRequest {
    GenerationRequest {
        system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
        prompt: build_prompt(day),
        schema_name: SCHEMA_NAME.to_string(),
        response_schema: DailyContent::response_schema(),
    }
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```(?:json)?\s*\n(.*?)\n?\s*```\s*$").expect("fence pattern is valid")
    })
}

/// Parses the provider's text into a `DailyContent`.
///
/// A single surrounding Markdown code fence is removed; nothing else is repaired.
pub fn parse_content(raw: &str) -> Result<DailyContent, ContentError> {
    let body = match code_fence().captures(raw) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => raw,
    };

    let content: DailyContent =
        serde_json::from_str(body).map_err(|e| ContentError::Malformed(e.to_string()))?;

    if let Some(path) = content.first_empty_field() {
        return Err(ContentError::EmptyField(path));
    }
    Ok(content)
}

//=========================================================================================
// The Requester
//=========================================================================================

/// Issues exactly one provider call per `fetch`. No retries, no caching.
#[derive(Clone)]
pub struct DailyContentRequester {
    provider: Arc<dyn ContentGenerationService>,
}

impl DailyContentRequester {
    pub fn new(provider: Arc<dyn ContentGenerationService>) -> Self {
        Self { provider }
    }

    /// Fetches the content for `day`, rejecting numbers outside the program
    /// before any network traffic.
    pub async fn fetch(&self, day: u32) -> Result<DailyContent, ContentError> {
        let day = Day::new(day)?;
        self.fetch_day(day).await
    }

    pub async fn fetch_day(&self, day: Day) -> Result<DailyContent, ContentError> {
        info!(day = day.get(), "Requesting daily content");
        let request = build_request(day);
        let raw = self.provider.generate_structured(&request).await?;
        debug!(day = day.get(), bytes = raw.len(), "Provider answered");
        parse_content(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::sample_content;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned answer and records every request it receives.
    struct CannedProvider {
        answer: PortResult<String>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedProvider {
        fn answering(answer: PortResult<String>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentGenerationService for CannedProvider {
        async fn generate_structured(&self, request: &GenerationRequest) -> PortResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.answer.clone()
        }
    }

    fn sample_json() -> String {
        serde_json::to_string(&sample_content()).unwrap()
    }

    #[test]
    fn prompt_names_the_day_and_all_sections() {
        let prompt = build_prompt(Day::new(17).unwrap());
        assert!(prompt.contains("Day 17 of a Ramadan program"));
        for section in ["Mihrab al-Layla", "Sira wa Mawqif", "Fiqh al-Hayah", "Zad al-Sa'im"] {
            assert!(prompt.contains(section), "missing {section}");
        }
        assert!(prompt.ends_with("Return the response in JSON format."));
    }

    #[test]
    fn parse_accepts_complete_content() {
        assert_eq!(parse_content(&sample_json()).unwrap(), sample_content());
    }

    #[test]
    fn parse_strips_a_single_code_fence() {
        let fenced = format!("```json\n{}\n```", sample_json());
        assert_eq!(parse_content(&fenced).unwrap(), sample_content());
    }

    #[test]
    fn parse_rejects_missing_closing_prayer() {
        let mut value = serde_json::to_value(sample_content()).unwrap();
        value.as_object_mut().unwrap().remove("closing_prayer");
        let err = parse_content(&value.to_string()).unwrap_err();
        assert!(matches!(err, ContentError::Malformed(ref msg) if msg.contains("closing_prayer")));
    }

    #[test]
    fn parse_rejects_missing_nested_field() {
        let mut value = serde_json::to_value(sample_content()).unwrap();
        value["sira"].as_object_mut().unwrap().remove("modern_application");
        assert!(matches!(
            parse_content(&value.to_string()),
            Err(ContentError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(
            parse_content("{\"introduction\": "),
            Err(ContentError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_blank_text() {
        let mut content = sample_content();
        content.zad = String::new();
        let raw = serde_json::to_string(&content).unwrap();
        assert_eq!(parse_content(&raw), Err(ContentError::EmptyField("zad")));
    }

    #[tokio::test]
    async fn fetch_sends_schema_constrained_request() {
        let provider = CannedProvider::answering(Ok(sample_json()));
        let requester = DailyContentRequester::new(provider.clone());

        let content = requester.fetch(3).await.unwrap();
        assert_eq!(content, sample_content());

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].schema_name, SCHEMA_NAME);
        assert_eq!(seen[0].response_schema, DailyContent::response_schema());
        assert!(seen[0].prompt.contains("Day 3 "));
    }

    #[tokio::test]
    async fn fetch_rejects_out_of_range_day_without_calling_provider() {
        let provider = CannedProvider::answering(Ok(sample_json()));
        let requester = DailyContentRequester::new(provider.clone());

        for day in [0, 31] {
            let err = requester.fetch(day).await.unwrap_err();
            assert_eq!(err, ContentError::InvalidDay(DayError::OutOfRange(day)));
            assert!(!err.is_provider_error());
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn fetch_propagates_provider_failure() {
        let provider = CannedProvider::answering(Err(PortError::Unexpected("503".to_string())));
        let requester = DailyContentRequester::new(provider);

        let err = requester.fetch(1).await.unwrap_err();
        assert_eq!(err, ContentError::Provider(PortError::Unexpected("503".to_string())));
        assert!(err.is_provider_error());
    }
}
