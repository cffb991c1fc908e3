use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use super::{http_client, ChatClient};
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use agent_store_types::ChatMessage;

const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct OpenAICompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAICompletionResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

/// OpenAI-compatible chat completions client
pub struct OpenAIChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAIChatClient {
    pub fn new(api_key: Option<String>, endpoint: &str, model: &str) -> Self {
        Self {
            client: http_client(),
            api_key,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            &config.openai_endpoint,
            &config.openai_model,
        )
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> StoreResult<ChatMessage> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("Chat completions are not configured".to_string()))?;

        let request = OpenAICompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Upstream(format!("Chat completion request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::Upstream(format!("Failed to read chat completion: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Upstream(format!("Chat API error ({}): {}", status, message)));
        }

        let parsed: OpenAICompletionResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Upstream(format!("Failed to parse chat completion: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| StoreError::Upstream("Chat completion returned no content".to_string()))?;

        Ok(ChatMessage {
            role: "assistant".to_string(),
            content,
        })
    }
}
