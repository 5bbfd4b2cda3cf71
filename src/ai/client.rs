//! AI client for PR content generation.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::{error::AiError, prompts};
use crate::config::Config;

/// Default chat-completions endpoint when LAZYPR_BASE_URL is unset.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Hard ceiling on one summarization request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat message in a completion request.
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Chat-completions request body.
#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
}

/// One completion choice in the response.
#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// Assistant message inside a choice.
#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat-completions response body.
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

/// AI-generated PR content with structured fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrContent {
    /// Concise PR title (ideally under 80 characters).
    pub title: String,
    /// Full PR description in markdown format.
    pub description: String,
}

/// Client for turning a filtered diff into PR content.
pub struct AiClient {
    client: Client,
    model: String,
    api_key: Option<String>,
    base_url: String,
}

impl AiClient {
    /// Creates a client from resolved configuration.
    ///
    /// The model is required; the API key is optional because some
    /// endpoints (local gateways) authenticate out of band.
    pub fn new(config: &Config) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or(AiError::ModelNotConfigured)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            model,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// The model this client sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a PR title and description for a filtered diff.
    pub async fn summarize(&self, diff: &str, language: &str) -> Result<PrContent> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompts::generate_user_prompt(diff, language),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed(format!("HTTP {status}: {error_text}")).into());
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AiError::InvalidResponseFormat("No choices in response".to_string()))?;

        parse_pr_content(content)
    }
}

/// Parses the model's reply into [`PrContent`].
///
/// Tolerates a fenced code block around the JSON object; anything else
/// that fails to deserialize is an invalid-format error.
fn parse_pr_content(content: &str) -> Result<PrContent> {
    let trimmed = strip_code_fence(content.trim());

    serde_json::from_str(trimmed)
        .map_err(|e| AiError::InvalidResponseFormat(format!("{e}: {trimmed}")).into())
}

/// Removes a surrounding markdown code fence, with or without a
/// language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.split_once('\n').map(|(_, body)| body) else {
        return text;
    };
    body.strip_suffix("```").map_or(text, str::trim_end)
}
