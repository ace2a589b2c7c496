//! OpenAI chat-completions vendor.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use campaignforge_shared::{CampaignForgeError, ProviderConfig, Result};

use crate::Provider;
use crate::http::{build_client, endpoint, send_json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Vendor `openai`: text at `choices[0].message.content`.
pub struct OpenAiProvider {
    client: Client,
}

impl OpenAiProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn send(&self, prompt: &str, config: &ProviderConfig) -> Result<String> {
        let url = endpoint(
            config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            "chat/completions",
        );
        let body = ChatRequest {
            model: &config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        debug!(%url, model = %config.model, "dispatching chat completion");
        let request = self.client.post(&url).bearer_auth(&config.api_key);
        let json = send_json(request, &body, config.timeout).await?;

        json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["message"]["content"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CampaignForgeError::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })
    }
}
