//! The company/brand/marketing profile that drives every prompt.
//!
//! Supplied by the caller (usually as camelCase JSON) and never mutated by
//! the generation pipeline. Every field is optional; the defaults used when
//! a field is absent are enumerated in one place, [`render_context_summary`].

use serde::{Deserialize, Serialize};

use crate::website::BrandVisualAnalysis;

/// Content cadence used when the profile does not name one.
pub const DEFAULT_CADENCE: &str = "weekly";

// ---------------------------------------------------------------------------
// GenerationContext
// ---------------------------------------------------------------------------

/// Structured company profile consumed by prompt construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationContext {
    pub company: CompanyProfile,
    pub brand: BrandProfile,
    pub audience: AudienceProfile,
    pub goals: MarketingGoals,
    pub preferences: ContentPreferences,
    /// Brand-visual profile derived from the company website, when merged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_visuals: Option<BrandVisualAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandProfile {
    /// Overall voice/tone, e.g. "conversational".
    pub tone: Option<String>,
    pub personality: Vec<String>,
    pub communication_style: Option<String>,
    pub value_propositions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudienceProfile {
    /// Free-text description of who the content is for.
    pub primary: Option<String>,
    pub demographics: Option<String>,
    pub pain_points: Vec<String>,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingGoals {
    pub primary_goals: Vec<String>,
    pub content_cadence: Option<String>,
    pub primary_channels: Vec<String>,
    pub secondary_channels: Vec<String>,
    pub experimental_channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPreferences {
    pub blog_word_count: Option<u32>,
    pub video_length: Option<String>,
    pub email_length: Option<String>,
    /// Social platforms to write posts for; falls back to the primary channels.
    pub social_platforms: Vec<String>,
}

impl GenerationContext {
    /// Return a copy of this context with a website-derived brand profile merged in.
    pub fn with_brand_visuals(mut self, visuals: BrandVisualAnalysis) -> Self {
        self.brand_visuals = Some(visuals);
        self
    }

    /// The company name, or an empty string.
    pub fn company_name(&self) -> &str {
        self.company.name.as_deref().unwrap_or("")
    }

    /// The configured cadence, or [`DEFAULT_CADENCE`].
    pub fn cadence(&self) -> &str {
        self.goals
            .content_cadence
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CADENCE)
    }
}

// ---------------------------------------------------------------------------
// Summary rendering
// ---------------------------------------------------------------------------

/// Render the context block embedded at the top of every prompt.
///
/// Field order is fixed and every optional field has a literal fallback, so
/// identical input always produces identical text:
///
/// | Line | Source | Fallback |
/// |---|---|---|
/// | Company | `company.name` | `""` |
/// | Industry | `company.industry` | `""` |
/// | Company Size | `company.size` | `""` |
/// | Description | `company.description` | `""` |
/// | Value Propositions | `brand.valuePropositions` joined by `", "` | `""` |
/// | Target Audience | `audience.demographics` | `""` |
/// | Pain Points | `audience.painPoints` joined | `""` |
/// | Brand Personality | `brand.personality` joined | `""` |
/// | Communication Style | `brand.communicationStyle` | `""` |
/// | Primary Goals | `goals.primaryGoals` joined | `""` |
/// | Content Cadence | `goals.contentCadence` | `"weekly"` |
/// | Primary Channels | `goals.primaryChannels` joined | `""` |
pub fn render_context_summary(context: &GenerationContext) -> String {
    let lines = [
        ("Company", opt(&context.company.name)),
        ("Industry", opt(&context.company.industry)),
        ("Company Size", opt(&context.company.size)),
        ("Description", opt(&context.company.description)),
        ("Value Propositions", context.brand.value_propositions.join(", ")),
        ("Target Audience", opt(&context.audience.demographics)),
        ("Pain Points", context.audience.pain_points.join(", ")),
        ("Brand Personality", context.brand.personality.join(", ")),
        ("Communication Style", opt(&context.brand.communication_style)),
        ("Primary Goals", context.goals.primary_goals.join(", ")),
        ("Content Cadence", context.cadence().to_string()),
        ("Primary Channels", context.goals.primary_channels.join(", ")),
    ];

    let mut out = String::from("COMPANY CONTEXT:\n");
    for (label, value) in lines {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&value);
        out.push('\n');
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
