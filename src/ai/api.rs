use std::time::Duration;

use log::warn;
use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    fallback::fallback_example,
    set_degraded_mode,
    DegradedReason,
};
use crate::{
    core::{
        GeneratedContent,
        LanguageConfig,
        LexineError,
    },
    settings::SettingsData,
};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Outcome of a content-generation request. The provider fails closed:
/// callers always receive renderable content, tagged with how it was made,
/// and can never forget to handle the degraded path.
#[derive(Debug, Clone)]
pub enum ExampleOutcome {
    Generated(GeneratedContent),
    Degraded { content: GeneratedContent, reason: DegradedReason },
}

impl ExampleOutcome {
    pub fn content(&self) -> &GeneratedContent {
        match self {
            ExampleOutcome::Generated(content) => content,
            ExampleOutcome::Degraded { content, .. } => content,
        }
    }

    pub fn degraded_reason(&self) -> Option<DegradedReason> {
        match self {
            ExampleOutcome::Generated(_) => None,
            ExampleOutcome::Degraded { reason, .. } => Some(*reason),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: &str, text: String) -> Self {
        Self { role: role.to_string(), parts: vec![Part { text }] }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct ContentProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl ContentProvider {
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key, model: model.to_string() }
    }

    pub fn from_settings(settings: &SettingsData) -> Self {
        Self::new(settings.credential(), &settings.model)
    }

    /// Produce example content for a term. Never errors past this boundary:
    /// a provider failure substitutes fallback content and sets the degraded
    /// flag; a success clears it.
    pub async fn generate_example(&self, languages: &LanguageConfig, term: &str) -> ExampleOutcome {
        match self.request_example(languages, term).await {
            Ok(content) => {
                set_degraded_mode(false);
                ExampleOutcome::Generated(content)
            }
            Err(error) => {
                let reason = classify(&error);
                warn!("example generation failed for \"{}\": {}", term, error);
                set_degraded_mode(true);
                ExampleOutcome::Degraded { content: fallback_example(term, reason), reason }
            }
        }
    }

    async fn request_example(
        &self,
        languages: &LanguageConfig,
        term: &str,
    ) -> Result<GeneratedContent, LexineError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::new("user", example_prompt(languages, term))],
            generation_config: Some(GenerationConfig { response_mime_type: "application/json" }),
        };

        let reply = self.make_request(&request).await?;
        parse_example(&reply)
    }

    /// One full conversation turn: the accumulated transcript plus the
    /// pending message, framed by the tutor persona.
    pub(crate) async fn send_chat(
        &self,
        system_prompt: &str,
        contents: Vec<Content>,
    ) -> Result<String, LexineError> {
        let request = GenerateRequest {
            system_instruction: Some(Content::new("user", system_prompt.to_string())),
            contents,
            generation_config: None,
        };

        self.make_request(&request).await
    }

    async fn make_request(&self, request: &GenerateRequest) -> Result<String, LexineError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(LexineError::CredentialMissing)?;

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        reply_text(&body)
    }
}

fn example_prompt(languages: &LanguageConfig, term: &str) -> String {
    format!(
        "You are helping a {known} speaker learn {learning}. Write one short sentence \
         in {learning} that uses the word \"{term}\", translate that sentence into \
         {known}, and add a one-sentence usage note. Reply with a JSON object with \
         exactly these string fields: \"original\" (the {learning} sentence), \
         \"translation\" (the {known} translation) and \"context\" (the usage note).",
        known = languages.known,
        learning = languages.learning,
    )
}

fn reply_text(body: &str) -> Result<String, LexineError> {
    let reply: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LexineError::MalformedResponse(e.to_string()))?;

    reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| LexineError::MalformedResponse("reply carries no content".to_string()))
}

fn parse_example(text: &str) -> Result<GeneratedContent, LexineError> {
    serde_json::from_str(text).map_err(|e| LexineError::MalformedResponse(e.to_string()))
}

fn classify(error: &LexineError) -> DegradedReason {
    match error {
        LexineError::CredentialMissing => DegradedReason::CredentialMissing,
        _ => DegradedReason::ServiceUnavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::degraded_mode;

    #[test]
    fn test_reply_text_extracts_the_first_candidate() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hello"}]}}]}"#;
        assert_eq!(reply_text(body).unwrap(), "hello");
    }

    #[test]
    fn test_reply_without_candidates_is_malformed() {
        for body in ["{}", r#"{"candidates":[]}"#, r#"{"candidates":[{"content":null}]}"#] {
            assert!(matches!(reply_text(body), Err(LexineError::MalformedResponse(_))));
        }
    }

    #[test]
    fn test_example_parses_a_structured_reply() {
        let text = r#"{
            "original": "Widzę duży dom.",
            "translation": "I see a big house.",
            "context": "Dom is one of the most common Polish nouns."
        }"#;
        let content = parse_example(text).unwrap();
        assert_eq!(content.original, "Widzę duży dom.");
        assert_eq!(content.translation, "I see a big house.");
    }

    #[test]
    fn test_example_with_a_missing_field_is_malformed() {
        let text = r#"{"original": "Widzę dom.", "translation": "I see a house."}"#;
        assert!(matches!(parse_example(text), Err(LexineError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_credential_falls_back_and_degrades() {
        let provider = ContentProvider::new(None, DEFAULT_MODEL);
        let outcome = provider.generate_example(&LanguageConfig::default(), "dom").await;

        match outcome {
            ExampleOutcome::Degraded { content, reason } => {
                assert_eq!(reason, DegradedReason::CredentialMissing);
                assert_eq!(content, fallback_example("dom", reason));
                assert!(degraded_mode());
            }
            ExampleOutcome::Generated(_) => panic!("expected a degraded outcome"),
        }
    }
}
