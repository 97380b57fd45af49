use super::traits::Provider;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible chat-completions provider. Works against any endpoint
/// speaking the `/chat/completions` wire shape (OpenAI, OpenRouter, local
/// inference servers).
pub struct OpenAiCompatProvider {
    base_url: String,
    model: String,
    temperature: f64,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiCompatProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn build_request(&self, system_prompt: Option<&str>, message: &str) -> ChatRequest {
        let capacity = if system_prompt.is_some() { 2 } else { 1 };
        let mut messages = Vec::with_capacity(capacity);

        if let Some(sys) = system_prompt {
            messages.push(Message {
                role: "system",
                content: sys.to_string(),
            });
        }

        messages.push(Message {
            role: "user",
            content: message.to_string(),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
        }
    }

    fn extract_text(chat_response: &ChatResponse) -> anyhow::Result<String> {
        chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("no response from provider"))
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
    ) -> anyhow::Result<String> {
        let request = self.build_request(system_prompt, message);

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(auth_header) = self.cached_auth_header.as_ref() {
            http_request = http_request.header("Authorization", auth_header);
        }

        let response = http_request
            .send()
            .await
            .context("provider request failed")?
            .error_for_status()
            .context("provider returned an error status")?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("provider response was not valid JSON")?;

        Self::extract_text(&chat_response)
    }
}
