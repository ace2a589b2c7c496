//! Website analysis for CampaignForge.
//!
//! - [`WebsiteAnalyzer`]: loads a page in a shared headless browser and
//!   returns a [`WebsiteAnalysis`](campaignforge_shared::WebsiteAnalysis)
//! - [`BrandVisualExtractor`]: derives a brand-visual profile from it
//! - [`browser`]: the launcher/session/page seams and their Chromium implementation

mod analyzer;
mod brand;
pub mod browser;
pub mod extract;

pub use analyzer::{AnalyzerState, WebsiteAnalyzer};
pub use brand::{
    BrandVisualExtractor, DEFAULT_ACCENT, DEFAULT_FONT, DEFAULT_PRIMARY, DEFAULT_SECONDARY,
};
pub use browser::{BrowserLauncher, BrowserSession, ChromiumLauncher, PageHandle};
