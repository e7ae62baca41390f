//! Azure OpenAI chat completions client

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;

/// Sampling limits applied to every completion request
#[derive(Debug, Clone, Copy)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A chat completion service taking a system instruction and one user turn.
pub trait CompletionBackend {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        params: CompletionParams,
    ) -> Result<String>;
}

/// Azure OpenAI client for chat completions
#[derive(Clone)]
pub struct AzureOpenAiClient {
    client: Client,
    api_key: String,
    url: String,
    api_version: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [Message<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat completions URL for a deployment, without the api-version query
fn completions_url(endpoint: &str, deployment: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions",
        endpoint.trim_end_matches('/'),
        deployment
    )
}

impl AzureOpenAiClient {
    pub fn new(config: &AiConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url: completions_url(&config.endpoint, &config.deployment),
            api_version: config.api_version.clone(),
        }
    }
}

impl CompletionBackend for AzureOpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        params: CompletionParams,
    ) -> Result<String> {
        let request = ChatRequest {
            messages: [
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_content,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!("POST {} (api-version {})", self.url, self.api_version);

        let response = self
            .client
            .post(&self.url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to the completion endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("No response content from the model"))
    }
}
