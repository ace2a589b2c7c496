//! AI vendor dispatch.
//!
//! This crate provides:
//! - [`Provider`]: one implementation per vendor, each owning its request
//!   and response envelopes
//! - [`ProviderRegistry`]: vendor id → provider lookup
//! - [`ProviderClient`]: the single entry point: `send(prompt, config) → text`
//!
//! Every dispatch is a single attempt. Failures propagate immediately.

mod anthropic;
mod http;
mod openai;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, instrument};

use campaignforge_shared::{CampaignForgeError, ProviderConfig, Result};

pub use anthropic::{ANTHROPIC_VERSION, AnthropicProvider};
pub use openai::OpenAiProvider;

/// User-Agent string for vendor requests.
pub(crate) const USER_AGENT: &str = concat!("CampaignForge/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A chat-completion vendor.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Vendor identifier this provider is registered under.
    fn id(&self) -> &str;

    /// Send one user prompt and return the model's raw text.
    async fn send(&self, prompt: &str, config: &ProviderConfig) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds registered providers keyed by vendor id.
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// A registry with the built-in vendors (`openai`, `anthropic`).
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Box::new(OpenAiProvider::new()?));
        registry.register(Box::new(AnthropicProvider::new()?));
        Ok(registry)
    }

    /// Add a provider, replacing any previous one with the same id.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        self.providers.insert(provider.id().to_string(), provider);
    }

    pub fn get(&self, vendor: &str) -> Option<&dyn Provider> {
        self.providers.get(vendor).map(|p| p.as_ref())
    }

    /// Registered vendor ids, sorted.
    pub fn vendors(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Dispatches prompts to whichever vendor a [`ProviderConfig`] names.
pub struct ProviderClient {
    registry: ProviderRegistry,
}

impl ProviderClient {
    /// A client backed by the built-in vendors.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(ProviderRegistry::with_defaults()?))
    }

    pub fn with_registry(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Send `prompt` to the configured vendor and return its raw text.
    ///
    /// Errors: [`CampaignForgeError::MissingConfig`] when `config` is `None`,
    /// [`CampaignForgeError::UnsupportedProvider`] for unknown vendors, and
    /// whatever the vendor reports (`Transport`, `MalformedResponse`).
    #[instrument(skip_all, fields(
        vendor = config.map(|c| c.vendor.as_str()).unwrap_or("none"),
        model = config.map(|c| c.model.as_str()).unwrap_or("none"),
        prompt_len = prompt.len(),
    ))]
    pub async fn send(&self, prompt: &str, config: Option<&ProviderConfig>) -> Result<String> {
        let config = config.ok_or(CampaignForgeError::MissingConfig)?;

        let provider = self
            .registry
            .get(&config.vendor)
            .ok_or_else(|| CampaignForgeError::UnsupportedProvider(config.vendor.clone()))?;

        let text = provider.send(prompt, config).await?;
        debug!(response_len = text.len(), "provider responded");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back, for registry tests.
    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn id(&self) -> &str {
            "echo"
        }

        async fn send(&self, prompt: &str, _config: &ProviderConfig) -> Result<String> {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[test]
    fn default_registry_has_both_vendors() {
        let registry = ProviderRegistry::with_defaults().unwrap();
        assert_eq!(registry.vendors(), vec!["anthropic", "openai"]);
        assert!(registry.get("openai").is_some());
        assert!(registry.get("gemini").is_none());
    }

    #[tokio::test]
    async fn missing_config_is_fatal() {
        let client = ProviderClient::new().unwrap();
        let err = client.send("hello", None).await.unwrap_err();
        assert!(matches!(err, CampaignForgeError::MissingConfig));
    }

    #[tokio::test]
    async fn unknown_vendor_is_unsupported() {
        let client = ProviderClient::new().unwrap();
        let config = ProviderConfig::new("gemini", "gemini-pro", "key");
        let err = client.send("hello", Some(&config)).await.unwrap_err();
        match err {
            CampaignForgeError::UnsupportedProvider(vendor) => assert_eq!(vendor, "gemini"),
            other => panic!("expected UnsupportedProvider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn registered_vendor_is_dispatched() {
        let mut registry = ProviderRegistry::empty();
        registry.register(Box::new(EchoProvider));
        let client = ProviderClient::with_registry(registry);

        let config = ProviderConfig::new("echo", "any", "key");
        let text = client.send("ping", Some(&config)).await.unwrap();
        assert_eq!(text, "echo: ping");
    }
}
