//! Error types for CampaignForge.
//!
//! Library crates use [`CampaignForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Only non-recoverable conditions live here. Model output that fails to
//! parse and degraded visual-signal extraction are absorbed where they
//! happen and never surface as errors.

use std::path::PathBuf;

/// Top-level error type for all CampaignForge operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignForgeError {
    /// No provider configuration was supplied to a dispatch.
    #[error("no AI provider configuration supplied")]
    MissingConfig,

    /// The configured vendor identifier is not registered.
    #[error("unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    /// Non-success HTTP status or network failure talking to a vendor.
    #[error("transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The vendor answered successfully but the expected text path is absent.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Headless browser launch, page, or protocol failure.
    #[error("browser error: {0}")]
    Browser(String),

    /// Page navigation did not finish within its bound.
    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// A website analysis failed; wraps the underlying cause.
    #[error("analysis of {url} failed: {source}")]
    Analysis {
        url: String,
        #[source]
        source: Box<CampaignForgeError>,
    },

    /// Input parsing error (context files, artifact files).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Input validation error (bad URL, out-of-range week count, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CampaignForgeError>;

impl CampaignForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a transport error, optionally carrying the HTTP status.
    pub fn transport(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap any error as the cause of a failed website analysis.
    pub fn analysis(url: impl Into<String>, source: CampaignForgeError) -> Self {
        Self::Analysis {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// `true` for failures caused by the vendor link rather than local setup.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::MalformedResponse(_))
    }
}
