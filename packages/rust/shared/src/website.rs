//! Website analysis results and the brand-visual profile derived from them.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WebsiteAnalysis
// ---------------------------------------------------------------------------

/// Everything captured from one rendered page. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAnalysis {
    /// The URL that was analyzed.
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: PageContent,
    pub metadata: PageMetadata,
    pub visual_elements: VisualElements,
    pub performance: PagePerformance,
    pub analyzed_at: DateTime<Utc>,
}

/// DOM text content. Each list is capped by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<String>,
    pub images: Vec<PageImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    pub src: String,
    pub alt: String,
}

/// `<meta>` tags. Absent tags become empty strings/lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub description: String,
    pub keywords: Vec<String>,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
}

/// Layout classification used when visual extraction could not run.
pub const UNKNOWN_LAYOUT: &str = "unknown";

/// Computed-style signals collected from the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElements {
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    /// "grid-based", "flexbox", "traditional", or "unknown".
    pub layout: String,
}

impl VisualElements {
    /// The degraded value used when visual extraction fails.
    pub fn unknown() -> Self {
        Self {
            colors: Vec::new(),
            fonts: Vec::new(),
            layout: UNKNOWN_LAYOUT.to_string(),
        }
    }
}

impl Default for VisualElements {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePerformance {
    pub load_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// BrandVisualAnalysis
// ---------------------------------------------------------------------------

/// Heuristic color/typography/layout/imagery/tone summary of a website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVisualAnalysis {
    pub color_palette: ColorPalette,
    pub typography: Typography,
    pub layout: LayoutProfile,
    pub imagery: ImageryProfile,
    pub overall_tone: OverallTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    /// Up to 8 colors.
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
    pub style: TypographyStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypographyStyle {
    Modern,
    Classic,
    Playful,
    Technical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub style: LayoutStyle,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Minimal,
    Bold,
    Corporate,
    Creative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Tight,
    Balanced,
    Airy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageryProfile {
    pub style: ImageryStyle,
    pub quality: ImageryQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageryStyle {
    Photography,
    Illustration,
    Mixed,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageryQuality {
    Professional,
    Casual,
    Artistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallTone {
    Professional,
    Friendly,
    Innovative,
    Trustworthy,
    Playful,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_visuals_are_empty() {
        let v = VisualElements::unknown();
        assert!(v.colors.is_empty());
        assert!(v.fonts.is_empty());
        assert_eq!(v.layout, "unknown");
    }

    #[test]
    fn analysis_serializes_camel_case() {
        let analysis = WebsiteAnalysis {
            url: "https://example.com".into(),
            title: "Example".into(),
            description: String::new(),
            content: PageContent::default(),
            metadata: PageMetadata::default(),
            visual_elements: VisualElements::unknown(),
            performance: PagePerformance {
                load_time_ms: 1200,
                screenshot_path: None,
            },
            analyzed_at: Utc::now(),
        };

        let json = serde_json::to_string(&analysis).expect("serialize");
        assert!(json.contains(r#""visualElements""#));
        assert!(json.contains(r#""loadTimeMs":1200"#));
        assert!(!json.contains("screenshotPath"));
    }

    #[test]
    fn brand_enums_serialize_lowercase() {
        let json = serde_json::to_string(&OverallTone::Professional).unwrap();
        assert_eq!(json, r#""professional""#);
        let json = serde_json::to_string(&Spacing::Balanced).unwrap();
        assert_eq!(json, r#""balanced""#);
    }
}
