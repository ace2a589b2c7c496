//! Shared types, error model, and configuration for CampaignForge.
//!
//! This crate is the foundation depended on by all other CampaignForge crates.
//! It provides:
//! - [`CampaignForgeError`]: the unified error type
//! - [`GenerationContext`] and its summary rendering
//! - Artifact types ([`CampaignTopic`], [`DetailedCampaignPlan`], [`CampaignContent`], ...)
//! - Website types ([`WebsiteAnalysis`], [`BrandVisualAnalysis`])
//! - Configuration ([`AppConfig`], [`ProviderConfig`], [`AnalyzerOptions`], config loading)

pub mod config;
pub mod context;
pub mod error;
pub mod types;
pub mod website;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnalyzerOptions, AnalyzerSettings, AppConfig, DEFAULT_USER_AGENT, GenerationSettings,
    ProviderConfig, ProviderSettings, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use context::{
    AudienceProfile, BrandProfile, CompanyProfile, ContentPreferences, DEFAULT_CADENCE,
    GenerationContext, MarketingGoals, render_context_summary,
};
pub use error::{CampaignForgeError, Result};
pub use types::{
    BlogContent, CampaignContent, CampaignTopic, ChannelStrategy, ContentType,
    DetailedCampaignPlan, EmailContent, EngagementSimulation, SocialPost, VideoContent,
};
pub use website::{
    BrandVisualAnalysis, ColorPalette, ImageryProfile, ImageryQuality, ImageryStyle,
    LayoutProfile, LayoutStyle, OverallTone, PageContent, PageImage, PageMetadata,
    PagePerformance, Spacing, Typography, TypographyStyle, UNKNOWN_LAYOUT, VisualElements,
    WebsiteAnalysis,
};
