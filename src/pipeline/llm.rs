//! Chat-completions client for summarization and relevance classification.
//!
//! Talks to any OpenAI-compatible endpoint (vLLM, LM Studio, Ollama,
//! llama.cpp server, the hosted APIs) via `POST {base_url}/chat/completions`
//! with bearer auth. Both pipeline calls go through [`LlmClient::complete`];
//! they differ only in system prompt, user message, and temperature, all of
//! which live in [`crate::prompts`] and [`crate::config`].
//!
//! Calls are single-shot: a failed call surfaces immediately as
//! [`DigestError`] and the orchestrator decides whether that is fatal
//! (summarization) or a per-paper skip (classification).

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::prompts;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Token counts from a chat-completions `usage` block. Zero when the server
/// omits the block.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// One assistant reply plus its token accounting.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub content: String,
    pub usage: TokenUsage,
}

/// The relevance filter accepts a paper iff the model's reply, trimmed and
/// lowercased, is exactly `"true"`.
pub fn is_true_reply(content: &str) -> bool {
    content.trim().to_lowercase() == "true"
}

// ── Response shape ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<UsageBlock>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UsageBlock {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for one OpenAI-compatible endpoint, configured once per run.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    summary_temperature: f32,
    filter_temperature: f32,
    max_tokens: Option<u32>,
    timeout_secs: u64,
}

impl LlmClient {
    /// Build a client from the run configuration.
    pub fn new(config: &DigestConfig) -> Result<Self, DigestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| DigestError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            summary_temperature: config.summary_temperature,
            filter_temperature: config.filter_temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.api_timeout_secs,
        })
    }

    /// Summarize a paper's converted text for a high-school reader.
    pub async fn summarize(&self, markdown: &str) -> Result<ChatOutcome, DigestError> {
        self.complete(
            prompts::SUMMARIZE_SYSTEM_PROMPT,
            &prompts::paper_user_message(markdown),
            self.summary_temperature,
        )
        .await
    }

    /// Ask whether a summary describes an AI-relevant paper.
    pub async fn classify(&self, summary: &str) -> Result<(bool, TokenUsage), DigestError> {
        let outcome = self
            .complete(
                prompts::RELEVANCE_SYSTEM_PROMPT,
                &prompts::summary_user_message(summary),
                self.filter_temperature,
            )
            .await?;
        debug!("Classifier replied: {:?}", outcome.content.trim());
        Ok((is_true_reply(&outcome.content), outcome.usage))
    }

    /// One chat-completions round trip.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<ChatOutcome, DigestError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(system, user, temperature);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DigestError::LlmTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    DigestError::LlmApi {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| DigestError::LlmApi {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(DigestError::LlmApi {
                message: extract_api_error(status, &text),
            });
        }

        let parsed: CompletionBody =
            serde_json::from_str(&text).map_err(|e| DigestError::LlmApi {
                message: format!("unparseable response body: {}", e),
            })?;

        let content = parsed
            .choices
            .first()
            .ok_or_else(|| DigestError::LlmApi {
                message: "response contained no choices".to_string(),
            })?
            .message
            .content
            .clone()
            .unwrap_or_default();

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        debug!(
            "Completion: {} chars, {} prompt / {} completion tokens",
            content.len(),
            usage.prompt_tokens,
            usage.completion_tokens
        );

        Ok(ChatOutcome { content, usage })
    }

    /// Assemble the request JSON. `max_tokens` is omitted entirely when not
    /// configured so the server default applies.
    fn build_request_body(&self, system: &str, user: &str, temperature: f32) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": temperature,
        });
        if let Some(max) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        body
    }
}

/// Pull a human-readable message out of an error response body.
///
/// OpenAI-style servers nest it at `error.message`; some put it at the top
/// level; anything else is reported as a body snippet.
fn extract_api_error(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v["error"]["message"].as_str().or_else(|| v["message"].as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }
    let snippet: String = body.chars().take(200).collect();
    format!("HTTP {}: {}", status.as_u16(), snippet)
}
