//! Brand-visual profile derived from a website analysis.
//!
//! This is a heuristic, not visual inference: only hex colors found on the
//! page are kept, and the typography/layout/imagery/tone classifications
//! are fixed. Downstream consumers rely on the literal defaults below.

use tracing::debug;

use campaignforge_shared::{
    BrandVisualAnalysis, ColorPalette, ImageryProfile, ImageryQuality, ImageryStyle,
    LayoutProfile, LayoutStyle, OverallTone, Spacing, Typography, TypographyStyle,
    WebsiteAnalysis,
};

pub const DEFAULT_PRIMARY: &str = "#2563eb";
pub const DEFAULT_SECONDARY: &str = "#3b82f6";
pub const DEFAULT_ACCENT: &str = "#10b981";
pub const DEFAULT_FONT: &str = "Inter";

const MAX_PALETTE: usize = 8;

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// First family of a CSS `font-family` list, unquoted.
fn primary_family(font_family: &str) -> String {
    font_family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

/// Maps [`WebsiteAnalysis`] visual signals into a [`BrandVisualAnalysis`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BrandVisualExtractor;

impl BrandVisualExtractor {
    pub fn extract(&self, analysis: &WebsiteAnalysis) -> BrandVisualAnalysis {
        let hex: Vec<String> = analysis
            .visual_elements
            .colors
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| is_hex_color(c))
            .fold(Vec::new(), |mut acc, c| {
                if !acc.contains(&c) {
                    acc.push(c);
                }
                acc
            });
        debug!(
            colors = analysis.visual_elements.colors.len(),
            hex = hex.len(),
            "deriving brand palette"
        );

        let pick = |i: usize, default: &str| {
            hex.get(i).cloned().unwrap_or_else(|| default.to_string())
        };
        let primary = pick(0, DEFAULT_PRIMARY);
        let secondary = pick(1, DEFAULT_SECONDARY);
        let accent = pick(2, DEFAULT_ACCENT);

        let palette = if hex.is_empty() {
            vec![primary.clone(), secondary.clone(), accent.clone()]
        } else {
            hex.iter().take(MAX_PALETTE).cloned().collect()
        };

        let fonts: Vec<String> = analysis
            .visual_elements
            .fonts
            .iter()
            .map(|f| primary_family(f))
            .filter(|f| !f.is_empty())
            .collect();
        let heading_font = fonts.first().cloned().unwrap_or_else(|| DEFAULT_FONT.to_string());
        let body_font = fonts.get(1).cloned().unwrap_or_else(|| heading_font.clone());

        BrandVisualAnalysis {
            color_palette: ColorPalette {
                primary,
                secondary,
                accent,
                palette,
            },
            typography: Typography {
                heading_font,
                body_font,
                style: TypographyStyle::Modern,
            },
            layout: LayoutProfile {
                style: LayoutStyle::Minimal,
                spacing: Spacing::Balanced,
            },
            imagery: ImageryProfile {
                style: ImageryStyle::Photography,
                quality: ImageryQuality::Professional,
            },
            overall_tone: OverallTone::Professional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaignforge_shared::{PageContent, PageMetadata, PagePerformance, VisualElements};

    fn analysis_with(colors: &[&str], fonts: &[&str]) -> WebsiteAnalysis {
        WebsiteAnalysis {
            url: "https://northwind.example".into(),
            title: "Northwind".into(),
            description: String::new(),
            content: PageContent::default(),
            metadata: PageMetadata::default(),
            visual_elements: VisualElements {
                colors: colors.iter().map(|s| s.to_string()).collect(),
                fonts: fonts.iter().map(|s| s.to_string()).collect(),
                layout: "traditional".into(),
            },
            performance: PagePerformance::default(),
            analyzed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn empty_colors_use_literal_defaults() {
        let brand = BrandVisualExtractor.extract(&analysis_with(&[], &[]));
        assert_eq!(brand.color_palette.primary, "#2563eb");
        assert_eq!(brand.color_palette.secondary, "#3b82f6");
        assert_eq!(brand.color_palette.accent, "#10b981");
        assert_eq!(brand.typography.heading_font, "Inter");
        assert_eq!(brand.typography.body_font, "Inter");
    }

    #[test]
    fn non_hex_colors_map_to_defaults() {
        let brand = BrandVisualExtractor
            .extract(&analysis_with(&["rgb(47, 133, 90)", "white", "hsl(0 0% 0%)"], &[]));
        assert_eq!(brand.color_palette.primary, DEFAULT_PRIMARY);
        assert_eq!(
            brand.color_palette.palette,
            [DEFAULT_PRIMARY, DEFAULT_SECONDARY, DEFAULT_ACCENT]
        );
    }

    #[test]
    fn hex_colors_are_kept_in_order() {
        let colors = [
            "#2F855A", "rgb(1, 2, 3)", "#fff", "#2f855a", "#111111", "#222222", "#333333",
            "#444444", "#555555", "#666666", "#777777",
        ];
        let brand = BrandVisualExtractor.extract(&analysis_with(&colors, &[]));
        assert_eq!(brand.color_palette.primary, "#2f855a");
        assert_eq!(brand.color_palette.secondary, "#fff");
        assert_eq!(brand.color_palette.accent, "#111111");
        assert_eq!(brand.color_palette.palette.len(), 8);
    }

    #[test]
    fn fonts_and_fixed_classifications() {
        let brand = BrandVisualExtractor.extract(&analysis_with(
            &[],
            &[r#""Playfair Display", serif"#, "Inter, sans-serif"],
        ));
        assert_eq!(brand.typography.heading_font, "Playfair Display");
        assert_eq!(brand.typography.body_font, "Inter");
        assert_eq!(brand.typography.style, TypographyStyle::Modern);
        assert_eq!(brand.layout.style, LayoutStyle::Minimal);
        assert_eq!(brand.layout.spacing, Spacing::Balanced);
        assert_eq!(brand.imagery.style, ImageryStyle::Photography);
        assert_eq!(brand.imagery.quality, ImageryQuality::Professional);
        assert_eq!(brand.overall_tone, OverallTone::Professional);
    }
}
