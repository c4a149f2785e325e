//! Premium query synthesis from an external phrase-suggestion service.
//!
//! The service is an OpenAI-compatible chat completion endpoint asked
//! for meme keywords, one per line. Its output is only ever advisory:
//! [`premium_query`] turns any failure into an empty [`Query`] so the
//! pipeline degrades instead of erroring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{RankError, SuggestError};
use crate::http;
use crate::types::Query;

/// A source of short search phrases for a document.
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Returns the service name for logging.
    fn name(&self) -> &str;

    /// Suggest phrases for `text`, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] if the service is unreachable, rejects the
    /// request, or replies with an unusable body.
    async fn suggest(&self, text: &str) -> Result<Vec<String>, SuggestError>;
}

/// Connection and sampling settings for the Together chat API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TogetherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    /// HTTP client timeout backstop, in seconds.
    pub timeout_seconds: u64,
}

impl Default for TogetherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz".into(),
            api_key: None,
            model: "meta-llama/Llama-Vision-Free".into(),
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
            repetition_penalty: 1.0,
            timeout_seconds: 20,
        }
    }
}

impl TogetherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Stop sequences for Llama-family chat templates.
const STOP_SEQUENCES: &[&str] = &["<|eot_id|>", "<|eom_id|>"];

/// Together chat-completion client that asks for meme phrases.
pub struct TogetherSuggester {
    config: TogetherConfig,
    client: reqwest::Client,
}

impl TogetherSuggester {
    /// # Errors
    ///
    /// Returns [`RankError`] if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: TogetherConfig) -> Result<Self, RankError> {
        http::validate_base_url("together", &config.base_url)?;
        let client = http::build_client(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self { config, client })
    }

    /// Build the OpenAI-compatible JSON request body.
    fn build_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": build_prompt(text),
            }],
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
            "top_k": self.config.top_k,
            "repetition_penalty": self.config.repetition_penalty,
            "stop": STOP_SEQUENCES,
        })
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Analyze this article and suggest 10 relevant meme keywords or phrases that would make \
         good memes. Focus on humor, emotions, and key themes:\n\nArticle: {text}\n\n\
         Provide only keywords/phrases, one per line, no numbers or explanations."
    )
}

#[async_trait]
impl Suggester for TogetherSuggester {
    fn name(&self) -> &str {
        "together"
    }

    async fn suggest(&self, text: &str) -> Result<Vec<String>, SuggestError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SuggestError::MissingKey)?;

        let url = http::endpoint(&self.config.base_url, "v1/chat/completions");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_body(text))
            .send()
            .await
            .map_err(|e| SuggestError::Http(http::describe(e)))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "suggestion service responded");
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        let reply: ChatCompletion = response
            .json()
            .await
            .map_err(|e| SuggestError::Parse(http::describe(e)))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or_else(|| SuggestError::Parse("reply has no message content".into()))?;

        Ok(parse_suggestions(&content, usize::MAX))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Split a completion into phrases: one per non-blank line, trimmed,
/// at most `max`.
pub fn parse_suggestions(content: &str, max: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Build the premium query from suggested phrases.
///
/// Phrases are joined with spaces in the order returned, after keeping
/// at most `max_phrases`. A missing suggester, a failed or timed-out
/// call, or an empty reply all yield [`Query::empty`].
pub async fn premium_query(
    suggester: Option<&dyn Suggester>,
    text: &str,
    max_phrases: usize,
    timeout: Duration,
) -> Query {
    let Some(suggester) = suggester else {
        tracing::warn!("no suggestion service configured; premium query is empty");
        return Query::empty();
    };

    let outcome = match tokio::time::timeout(timeout, suggester.suggest(text)).await {
        Ok(result) => result,
        Err(_) => Err(SuggestError::Timeout(timeout.as_millis() as u64)),
    };

    match outcome {
        Ok(phrases) => {
            let query = Query::from_terms(phrases.iter().take(max_phrases));
            tracing::debug!(
                service = suggester.name(),
                phrases = phrases.len().min(max_phrases),
                "suggestions received"
            );
            tracing::trace!(query = %query, "premium query");
            query
        }
        Err(err) => {
            tracing::warn!(service = suggester.name(), error = %err, "suggestion service failed");
            Query::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSuggester(Result<Vec<String>, SuggestError>);

    #[async_trait]
    impl Suggester for FixedSuggester {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn suggest(&self, _text: &str) -> Result<Vec<String>, SuggestError> {
            self.0.clone()
        }
    }

    struct SlowSuggester;

    #[async_trait]
    impl Suggester for SlowSuggester {
        fn name(&self) -> &str {
            "slow"
        }

        async fn suggest(&self, _text: &str) -> Result<Vec<String>, SuggestError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["too late".into()])
        }
    }

    #[test]
    fn parse_suggestions_drops_blank_lines() {
        let phrases = parse_suggestions("distracted boyfriend\n\n  this is fine  \n\n", 10);
        assert_eq!(phrases, ["distracted boyfriend", "this is fine"]);
    }

    #[test]
    fn parse_suggestions_caps_count() {
        let content = (1..=15).map(|i| format!("phrase{i}")).collect::<Vec<_>>().join("\n");
        let phrases = parse_suggestions(&content, 10);
        assert_eq!(phrases.len(), 10);
        assert_eq!(phrases[9], "phrase10");
    }

    #[test]
    fn prompt_embeds_article() {
        let prompt = build_prompt("Cats take over the office");
        assert!(prompt.contains("Article: Cats take over the office"));
        assert!(prompt.contains("one per line"));
    }

    #[test]
    fn body_carries_sampling_parameters() {
        let suggester = TogetherSuggester::new(TogetherConfig::new("k")).expect("suggester");
        let body = suggester.build_body("hello");
        assert_eq!(body["model"], "meta-llama/Llama-Vision-Free");
        assert_eq!(body["top_k"], 50);
        assert_eq!(body["stop"][0], "<|eot_id|>");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn phrases_join_in_order() {
        let suggester = FixedSuggester(Ok(vec!["this is fine".into(), "stonks".into()]));
        let query = premium_query(Some(&suggester), "text", 10, Duration::from_secs(1)).await;
        assert_eq!(query.as_str(), "this is fine stonks");
    }

    #[tokio::test]
    async fn phrases_capped_by_max() {
        let suggester = FixedSuggester(Ok(vec!["one".into(), "two".into(), "three".into()]));
        let query = premium_query(Some(&suggester), "text", 2, Duration::from_secs(1)).await;
        assert_eq!(query.as_str(), "one two");
    }

    #[tokio::test]
    async fn failure_yields_empty_query() {
        let suggester = FixedSuggester(Err(SuggestError::Status(500)));
        let query = premium_query(Some(&suggester), "text", 10, Duration::from_secs(1)).await;
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn empty_reply_yields_empty_query() {
        let suggester = FixedSuggester(Ok(vec![]));
        let query = premium_query(Some(&suggester), "text", 10, Duration::from_secs(1)).await;
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn missing_suggester_yields_empty_query() {
        let query = premium_query(None, "text", 10, Duration::from_secs(1)).await;
        assert!(query.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_yields_empty_query() {
        let query = premium_query(Some(&SlowSuggester), "text", 10, Duration::from_millis(50)).await;
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn missing_key_is_error() {
        let suggester = TogetherSuggester::new(TogetherConfig::default()).expect("suggester");
        let err = suggester.suggest("text").await.unwrap_err();
        assert_eq!(err, SuggestError::MissingKey);
    }
}
