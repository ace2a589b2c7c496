//! Application configuration for CampaignForge.
//!
//! User config lives at `~/.campaignforge/campaignforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CampaignForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "campaignforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".campaignforge";

/// Desktop Chrome user agent presented by the analyzer.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ---------------------------------------------------------------------------
// Config structs (matching campaignforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// AI provider settings.
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Generation defaults.
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Website analyzer settings.
    #[serde(default)]
    pub analyzer: AnalyzerSettings,
}

/// `[provider]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Vendor identifier: "openai" or "anthropic".
    #[serde(default = "default_vendor")]
    pub vendor: String,

    /// Model identifier passed to the vendor.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single dispatch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional endpoint override (proxies, gateways, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            vendor: default_vendor(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

fn default_vendor() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_timeout_secs() -> u64 {
    120
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Number of weeks in a generated calendar.
    #[serde(default = "default_week_count")]
    pub week_count: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            week_count: default_week_count(),
        }
    }
}

fn default_week_count() -> usize {
    13
}

/// `[analyzer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_true")]
    pub capture_screenshot: bool,

    /// Where screenshots are written (defaults to the OS temp dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<String>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: default_navigation_timeout(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
            capture_screenshot: true,
            screenshot_dir: None,
        }
    }
}

fn default_navigation_timeout() -> u64 {
    30
}
fn default_viewport_width() -> u32 {
    1920
}
fn default_viewport_height() -> u32 {
    1080
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// ProviderConfig (runtime, resolved from settings + env)
// ---------------------------------------------------------------------------

/// Everything needed for one vendor dispatch.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    /// Vendor identifier, looked up in the provider registry.
    pub vendor: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// A config with the default temperature, token limit, and timeout.
    pub fn new(
        vendor: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: Duration::from_secs(default_timeout_secs()),
            base_url: None,
        }
    }

    /// Point the dispatch at a different endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The credential never reaches logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("vendor", &self.vendor)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    /// Resolve into a runtime [`ProviderConfig`], reading the API key from
    /// the configured environment variable.
    pub fn resolve(&self) -> Result<ProviderConfig> {
        let var_name = &self.api_key_env;
        let api_key = match std::env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => val,
            _ => {
                return Err(CampaignForgeError::config(format!(
                    "API key not found. Set the {var_name} environment variable \
                     for the '{}' provider.",
                    self.vendor
                )));
            }
        };

        Ok(ProviderConfig {
            vendor: self.vendor.clone(),
            model: self.model.clone(),
            api_key,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
            base_url: self.base_url.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// AnalyzerOptions (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime website-analyzer configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub navigation_timeout: Duration,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub capture_screenshot: bool,
    pub screenshot_dir: PathBuf,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::from(&AnalyzerSettings::default())
    }
}

impl From<&AnalyzerSettings> for AnalyzerOptions {
    fn from(settings: &AnalyzerSettings) -> Self {
        Self {
            navigation_timeout: Duration::from_secs(settings.navigation_timeout_secs),
            viewport_width: settings.viewport_width,
            viewport_height: settings.viewport_height,
            user_agent: settings.user_agent.clone(),
            capture_screenshot: settings.capture_screenshot,
            screenshot_dir: settings
                .screenshot_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        }
    }
}

impl From<&AppConfig> for AnalyzerOptions {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.analyzer)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.campaignforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CampaignForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.campaignforge/campaignforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CampaignForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CampaignForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CampaignForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CampaignForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CampaignForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
