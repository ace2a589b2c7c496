//! Website analysis over a shared headless browser.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use campaignforge_shared::{
    AnalyzerOptions, BrandVisualAnalysis, CampaignForgeError, PagePerformance, Result,
    VisualElements, WebsiteAnalysis,
};

use crate::brand::BrandVisualExtractor;
use crate::browser::{BrowserLauncher, BrowserSession, ChromiumLauncher, PageHandle};
use crate::extract;

/// Lifecycle of a [`WebsiteAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    Uninitialized,
    Ready,
    /// At least one analysis holds a page.
    Analyzing,
    Closed,
}

enum Lifecycle<S> {
    Uninitialized,
    Ready(Arc<S>),
    Closed,
}

/// Decrements the active-page count when an analysis ends.
struct ActiveGuard<'a>(&'a AtomicUsize);

impl<'a> ActiveGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Loads pages in a shared browser and extracts content, metadata, and
/// visual signals.
///
/// The browser is launched by [`initialize`](Self::initialize), or lazily by
/// the first analysis, and torn down by [`cleanup`](Self::cleanup). Each
/// analysis gets its own page, closed on every exit path.
pub struct WebsiteAnalyzer<L: BrowserLauncher = ChromiumLauncher> {
    launcher: L,
    options: AnalyzerOptions,
    lifecycle: Mutex<Lifecycle<L::Session>>,
    active: AtomicUsize,
}

impl WebsiteAnalyzer<ChromiumLauncher> {
    /// An analyzer backed by a local headless Chromium.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self::with_launcher(ChromiumLauncher, options)
    }
}

impl<L: BrowserLauncher> WebsiteAnalyzer<L> {
    pub fn with_launcher(launcher: L, options: AnalyzerOptions) -> Self {
        Self {
            launcher,
            options,
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
            active: AtomicUsize::new(0),
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub async fn state(&self) -> AnalyzerState {
        match *self.lifecycle.lock().await {
            Lifecycle::Uninitialized => AnalyzerState::Uninitialized,
            Lifecycle::Closed => AnalyzerState::Closed,
            Lifecycle::Ready(_) if self.active.load(Ordering::SeqCst) > 0 => {
                AnalyzerState::Analyzing
            }
            Lifecycle::Ready(_) => AnalyzerState::Ready,
        }
    }

    /// Launch the shared browser. A no-op when already running.
    pub async fn initialize(&self) -> Result<()> {
        self.session().await.map(|_| ())
    }

    async fn session(&self) -> Result<Arc<L::Session>> {
        let mut lifecycle = self.lifecycle.lock().await;
        if let Lifecycle::Ready(session) = &*lifecycle {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(self.launcher.launch(&self.options).await?);
        *lifecycle = Lifecycle::Ready(Arc::clone(&session));
        info!("website analyzer ready");
        Ok(session)
    }

    /// Close the shared browser. Later analyses launch a new one.
    pub async fn cleanup(&self) -> Result<()> {
        let previous = std::mem::replace(&mut *self.lifecycle.lock().await, Lifecycle::Closed);
        if let Lifecycle::Ready(session) = previous {
            session.close().await?;
            info!("website analyzer closed");
        }
        Ok(())
    }

    /// Load `url` and return its full analysis.
    ///
    /// Every failure is wrapped in [`CampaignForgeError::Analysis`] carrying
    /// the URL. A failed visual-signal script or screenshot degrades instead.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn analyze_website(&self, url: &str) -> Result<WebsiteAnalysis> {
        let parsed = validate_url(url).map_err(|e| CampaignForgeError::analysis(url, e))?;
        // Past validation, results and errors both carry the normalized form.
        let url = parsed.as_str();

        let session = self
            .session()
            .await
            .map_err(|e| CampaignForgeError::analysis(url, e))?;

        let _active = ActiveGuard::enter(&self.active);
        let page = session
            .new_page()
            .await
            .map_err(|e| CampaignForgeError::analysis(url, e))?;

        let result = self.analyze_page(page.as_ref(), url).await;

        if let Err(e) = page.close().await {
            warn!(error = %e, "failed to close page");
        }

        match result {
            Ok(analysis) => {
                info!(
                    load_time_ms = analysis.performance.load_time_ms,
                    headings = analysis.content.headings.len(),
                    "website analyzed"
                );
                Ok(analysis)
            }
            Err(e) => Err(CampaignForgeError::analysis(url, e)),
        }
    }

    /// Analyze `url` and derive its brand-visual profile.
    pub async fn analyze_and_extract(
        &self,
        url: &str,
    ) -> Result<(WebsiteAnalysis, BrandVisualAnalysis)> {
        let analysis = self.analyze_website(url).await?;
        let brand = BrandVisualExtractor.extract(&analysis);
        Ok((analysis, brand))
    }

    async fn analyze_page(&self, page: &dyn PageHandle, url: &str) -> Result<WebsiteAnalysis> {
        page.set_viewport(self.options.viewport_width, self.options.viewport_height)
            .await?;
        page.set_user_agent(&self.options.user_agent).await?;

        let started = Instant::now();
        tokio::time::timeout(self.options.navigation_timeout, page.goto(url))
            .await
            .map_err(|_| CampaignForgeError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: self.options.navigation_timeout.as_secs(),
            })??;

        let title = page.title().await?.unwrap_or_default();
        let html = page.html().await?;
        let (content, metadata) = extract::extract_page(&html);

        let visual_elements = match page.evaluate(extract::VISUAL_SIGNALS_SCRIPT).await {
            Ok(value) => extract::visual_elements_from(value),
            Err(e) => {
                warn!(error = %e, "visual signal extraction failed");
                VisualElements::unknown()
            }
        };

        let screenshot_path = if self.options.capture_screenshot {
            let path = self
                .options
                .screenshot_dir
                .join(format!("campaignforge-{}.png", Uuid::now_v7()));
            match page.screenshot(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "screenshot saved");
                    Some(path)
                }
                Err(e) => {
                    warn!(error = %e, "screenshot failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(WebsiteAnalysis {
            url: url.to_string(),
            title,
            description: metadata.description.clone(),
            content,
            metadata,
            visual_elements,
            performance: PagePerformance {
                load_time_ms: started.elapsed().as_millis() as u64,
                screenshot_path,
            },
            analyzed_at: Utc::now(),
        })
    }
}

fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| CampaignForgeError::validation(format!("invalid URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CampaignForgeError::validation(format!(
            "unsupported URL scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use async_trait::async_trait;

    #[derive(Default)]
    struct Counters {
        launches: AtomicUsize,
        sessions_closed: AtomicUsize,
        pages_opened: AtomicUsize,
        pages_closed: AtomicUsize,
        /// Page calls in order, with their arguments.
        calls: StdMutex<Vec<String>>,
        screenshots: StdMutex<Vec<PathBuf>>,
    }

    impl Counters {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[derive(Clone, Copy, Default)]
    struct Behavior {
        hang_on_goto: bool,
        fail_script: bool,
        fail_screenshot: bool,
        fail_html: bool,
    }

    struct FakeLauncher {
        counters: Arc<Counters>,
        behavior: Behavior,
    }

    struct FakeSession {
        counters: Arc<Counters>,
        behavior: Behavior,
    }

    struct FakePage {
        counters: Arc<Counters>,
        behavior: Behavior,
        closed: AtomicBool,
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        type Session = FakeSession;

        async fn launch(&self, _options: &AnalyzerOptions) -> Result<FakeSession> {
            self.counters.launches.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                counters: self.counters.clone(),
                behavior: self.behavior,
            })
        }
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
            self.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakePage {
                counters: self.counters.clone(),
                behavior: self.behavior,
                closed: AtomicBool::new(false),
            }))
        }

        async fn close(&self) -> Result<()> {
            self.counters.sessions_closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl PageHandle for FakePage {
        async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
            self.counters.record(format!("viewport {width}x{height}"));
            Ok(())
        }

        async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
            self.counters.record(format!("user-agent {user_agent}"));
            Ok(())
        }

        async fn goto(&self, url: &str) -> Result<()> {
            self.counters.record(format!("goto {url}"));
            if self.behavior.hang_on_goto {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Ok(())
        }

        async fn title(&self) -> Result<Option<String>> {
            Ok(Some("Northwind Outdoor Co.".to_string()))
        }

        async fn html(&self) -> Result<String> {
            if self.behavior.fail_html {
                return Err(CampaignForgeError::Browser("target crashed".into()));
            }
            Ok(std::fs::read_to_string("../../../fixtures/html/landing.html").unwrap())
        }

        async fn evaluate(&self, _script: &str) -> Result<serde_json::Value> {
            if self.behavior.fail_script {
                return Err(CampaignForgeError::Browser("script threw".into()));
            }
            Ok(serde_json::json!({
                "colors": ["rgb(31, 41, 55)", "#2f855a", "rgb(31, 41, 55)"],
                "fonts": ["Inter, sans-serif"],
                "display": "grid",
                "gridTemplate": "240px 1fr"
            }))
        }

        async fn screenshot(&self, path: &Path) -> Result<()> {
            if self.behavior.fail_screenshot {
                return Err(CampaignForgeError::Browser("screenshot failed".into()));
            }
            self.counters.screenshots.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            assert!(!self.closed.swap(true, Ordering::SeqCst), "page closed twice");
            self.counters.pages_closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn analyzer(behavior: Behavior) -> (WebsiteAnalyzer<FakeLauncher>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let options = AnalyzerOptions {
            navigation_timeout: Duration::from_millis(50),
            viewport_width: 1366,
            viewport_height: 768,
            user_agent: "Mozilla/5.0 CampaignForgeTest".to_string(),
            screenshot_dir: PathBuf::from("/tmp/campaignforge-shots"),
            ..AnalyzerOptions::default()
        };
        let launcher = FakeLauncher {
            counters: counters.clone(),
            behavior,
        };
        (WebsiteAnalyzer::with_launcher(launcher, options), counters)
    }

    #[tokio::test]
    async fn analysis_collects_everything_and_closes_page() {
        let (analyzer, counters) = analyzer(Behavior::default());
        assert_eq!(analyzer.state().await, AnalyzerState::Uninitialized);

        let analysis = analyzer
            .analyze_website("https://northwind.example/")
            .await
            .unwrap();

        assert_eq!(analysis.title, "Northwind Outdoor Co.");
        assert_eq!(analysis.description, "Outdoor gear built to last.");
        assert_eq!(analysis.content.headings[0], "Gear up for every trail");
        assert_eq!(analysis.visual_elements.colors, ["rgb(31, 41, 55)", "#2f855a"]);
        assert_eq!(analysis.visual_elements.layout, "grid-based");
        assert_eq!(analysis.url, "https://northwind.example/");

        assert_eq!(
            counters.calls(),
            [
                "viewport 1366x768",
                "user-agent Mozilla/5.0 CampaignForgeTest",
                "goto https://northwind.example/",
            ]
        );

        let screenshot = analysis.performance.screenshot_path.expect("screenshot path");
        assert_eq!(screenshot.parent(), Some(Path::new("/tmp/campaignforge-shots")));
        let name = screenshot.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("campaignforge-") && name.ends_with(".png"));
        assert_eq!(*counters.screenshots.lock().unwrap(), [screenshot.clone()]);

        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
        assert_eq!(counters.pages_opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.pages_closed.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.state().await, AnalyzerState::Ready);
    }

    #[tokio::test]
    async fn navigation_timeout_is_analysis_error_and_page_is_closed() {
        let (analyzer, counters) = analyzer(Behavior {
            hang_on_goto: true,
            ..Behavior::default()
        });

        let err = analyzer
            .analyze_website("https://unreachable.example")
            .await
            .unwrap_err();

        match err {
            CampaignForgeError::Analysis { url, source } => {
                assert_eq!(url, "https://unreachable.example/");
                assert!(matches!(*source, CampaignForgeError::NavigationTimeout { .. }));
            }
            other => panic!("expected Analysis, got {other:?}"),
        }
        assert_eq!(counters.pages_opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.pages_closed.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.state().await, AnalyzerState::Ready);
    }

    #[tokio::test]
    async fn extraction_failure_is_fatal_but_page_still_closes() {
        let (analyzer, counters) = analyzer(Behavior {
            fail_html: true,
            ..Behavior::default()
        });

        let err = analyzer
            .analyze_website("https://northwind.example/")
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignForgeError::Analysis { .. }));
        assert_eq!(counters.pages_closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn script_and_screenshot_failures_degrade() {
        let (analyzer, _) = analyzer(Behavior {
            fail_script: true,
            fail_screenshot: true,
            ..Behavior::default()
        });

        let analysis = analyzer
            .analyze_website("https://northwind.example/")
            .await
            .unwrap();
        assert!(analysis.visual_elements.colors.is_empty());
        assert!(analysis.visual_elements.fonts.is_empty());
        assert_eq!(analysis.visual_elements.layout, "unknown");
        assert!(analysis.performance.screenshot_path.is_none());
        assert!(!analysis.content.headings.is_empty());
    }

    #[tokio::test]
    async fn invalid_url_opens_no_page() {
        let (analyzer, counters) = analyzer(Behavior::default());

        for url in ["not a url", "ftp://northwind.example/file"] {
            let err = analyzer.analyze_website(url).await.unwrap_err();
            match err {
                CampaignForgeError::Analysis { source, .. } => {
                    assert!(matches!(*source, CampaignForgeError::Validation { .. }));
                }
                other => panic!("expected Analysis, got {other:?}"),
            }
        }
        assert_eq!(counters.launches.load(Ordering::SeqCst), 0);
        assert_eq!(counters.pages_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lifecycle_initialize_cleanup_reinitialize() {
        let (analyzer, counters) = analyzer(Behavior::default());

        analyzer.initialize().await.unwrap();
        analyzer.initialize().await.unwrap();
        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.state().await, AnalyzerState::Ready);

        analyzer.cleanup().await.unwrap();
        assert_eq!(analyzer.state().await, AnalyzerState::Closed);
        assert_eq!(counters.sessions_closed.load(Ordering::SeqCst), 1);

        analyzer
            .analyze_website("https://northwind.example/")
            .await
            .unwrap();
        assert_eq!(counters.launches.load(Ordering::SeqCst), 2);
        assert_eq!(analyzer.state().await, AnalyzerState::Ready);
    }

    #[tokio::test]
    async fn concurrent_analyses_share_one_browser() {
        let (analyzer, counters) = analyzer(Behavior::default());

        let (a, b) = tokio::join!(
            analyzer.analyze_website("https://northwind.example/a"),
            analyzer.analyze_website("https://northwind.example/b"),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
        assert_eq!(counters.pages_opened.load(Ordering::SeqCst), 2);
        assert_eq!(counters.pages_closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn analyze_and_extract_derives_brand() {
        let (analyzer, _) = analyzer(Behavior::default());
        let (analysis, brand) = analyzer
            .analyze_and_extract("https://northwind.example")
            .await
            .unwrap();
        assert_eq!(analysis.url, "https://northwind.example/");
        assert_eq!(brand.color_palette.primary, "#2f855a");
        assert_eq!(brand.typography.heading_font, "Inter");
    }
}
