//! Page extraction: DOM content and metadata from rendered HTML, and the
//! visual-signal script evaluated inside the live page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::warn;

use campaignforge_shared::{PageContent, PageImage, PageMetadata, VisualElements};

pub const MAX_HEADINGS: usize = 20;
pub const MAX_PARAGRAPHS: usize = 10;
pub const MAX_LINKS: usize = 50;
pub const MAX_IMAGES: usize = 20;
pub const MAX_COLORS: usize = 10;
pub const MAX_FONTS: usize = 5;

/// Paragraphs at or under this many characters are dropped.
const MIN_PARAGRAPH_CHARS: usize = 20;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("valid selector"));
    };
}

selector!(HEADINGS, "h1, h2, h3, h4, h5, h6");
selector!(PARAGRAPHS, "p");
selector!(LINKS, "a[href]");
selector!(IMAGES, "img[src]");
selector!(META_DESCRIPTION, r#"meta[name="description"]"#);
selector!(META_KEYWORDS, r#"meta[name="keywords"]"#);
selector!(OG_TITLE, r#"meta[property="og:title"]"#);
selector!(OG_DESCRIPTION, r#"meta[property="og:description"]"#);
selector!(OG_IMAGE, r#"meta[property="og:image"]"#);

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Headings, long-enough paragraphs, link targets, and images, each capped.
pub fn extract_content(doc: &Html) -> PageContent {
    let headings = doc
        .select(&HEADINGS)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .take(MAX_HEADINGS)
        .collect();

    let paragraphs = doc
        .select(&PARAGRAPHS)
        .map(element_text)
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
        .take(MAX_PARAGRAPHS)
        .collect();

    let links = doc
        .select(&LINKS)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .take(MAX_LINKS)
        .collect();

    let images = doc
        .select(&IMAGES)
        .filter_map(|el| {
            let src = el.value().attr("src")?.trim();
            (!src.is_empty()).then(|| PageImage {
                src: src.to_string(),
                alt: el.value().attr("alt").unwrap_or_default().trim().to_string(),
            })
        })
        .take(MAX_IMAGES)
        .collect();

    PageContent {
        headings,
        paragraphs,
        links,
        images,
    }
}

fn meta_content(doc: &Html, selector: &Selector) -> String {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

/// Description, keywords, and Open Graph fields; absent tags become empty.
pub fn extract_metadata(doc: &Html) -> PageMetadata {
    let keywords = meta_content(doc, &META_KEYWORDS)
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    PageMetadata {
        description: meta_content(doc, &META_DESCRIPTION),
        keywords,
        og_title: meta_content(doc, &OG_TITLE),
        og_description: meta_content(doc, &OG_DESCRIPTION),
        og_image: meta_content(doc, &OG_IMAGE),
    }
}

/// Parse rendered HTML into content and metadata.
pub fn extract_page(html: &str) -> (PageContent, PageMetadata) {
    let doc = Html::parse_document(html);
    (extract_content(&doc), extract_metadata(&doc))
}

// ---------------------------------------------------------------------------
// Visual signals
// ---------------------------------------------------------------------------

/// Collects computed colors and font families across every element and
/// reports the root element's layout mode.
pub const VISUAL_SIGNALS_SCRIPT: &str = r#"(() => {
  const colors = [];
  const fonts = [];
  for (const el of document.querySelectorAll('*')) {
    const style = window.getComputedStyle(el);
    colors.push(style.backgroundColor, style.color);
    fonts.push(style.fontFamily);
  }
  const root = window.getComputedStyle(document.documentElement);
  return {
    colors,
    fonts,
    display: root.display,
    gridTemplate: root.gridTemplateColumns || ''
  };
})()"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSignals {
    colors: Vec<String>,
    fonts: Vec<String>,
    display: String,
    grid_template: String,
}

const TRANSPARENT: [&str; 2] = ["transparent", "rgba(0, 0, 0, 0)"];

fn dedup_capped(values: impl IntoIterator<Item = String>, cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() || TRANSPARENT.contains(&value.as_str()) || out.contains(&value) {
            continue;
        }
        out.push(value);
        if out.len() == cap {
            break;
        }
    }
    out
}

/// `grid-based`, `flexbox`, or `traditional` from the root display mode.
pub fn classify_layout(display: &str, grid_template: &str) -> &'static str {
    let grid_template = grid_template.trim();
    if display.contains("grid") || (!grid_template.is_empty() && grid_template != "none") {
        "grid-based"
    } else if display.contains("flex") {
        "flexbox"
    } else {
        "traditional"
    }
}

/// Turn the script result into [`VisualElements`].
///
/// Anything unexpected degrades to empty lists and an unknown layout.
pub fn visual_elements_from(value: serde_json::Value) -> VisualElements {
    match serde_json::from_value::<RawSignals>(value) {
        Ok(raw) => VisualElements {
            colors: dedup_capped(raw.colors, MAX_COLORS),
            fonts: dedup_capped(raw.fonts, MAX_FONTS),
            layout: classify_layout(&raw.display, &raw.grid_template).to_string(),
        },
        Err(e) => {
            warn!(error = %e, "visual signals had an unexpected shape");
            VisualElements::unknown()
        }
    }
}
