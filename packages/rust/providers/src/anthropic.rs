//! Anthropic Messages API vendor.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use campaignforge_shared::{CampaignForgeError, ProviderConfig, Result};

use crate::Provider;
use crate::http::{build_client, endpoint, send_json};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Protocol version sent on every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Vendor `anthropic`: text at `content[0].text`.
pub struct AnthropicProvider {
    client: Client,
}

impl AnthropicProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    async fn send(&self, prompt: &str, config: &ProviderConfig) -> Result<String> {
        let url = endpoint(
            config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            "messages",
        );
        let body = MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
        };

        debug!(%url, model = %config.model, "dispatching message");
        let request = self
            .client
            .post(&url)
            .header("x-api-key", &config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let json = send_json(request, &body, config.timeout).await?;

        json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["text"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CampaignForgeError::MalformedResponse("missing content[0].text".to_string())
            })
    }
}
