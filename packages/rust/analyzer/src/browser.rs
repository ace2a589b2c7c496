//! Headless browser abstraction.
//!
//! [`BrowserLauncher`] starts a [`BrowserSession`]; a session hands out
//! [`PageHandle`]s, one per analysis. The chromiumoxide-backed
//! implementation lives here; tests substitute their own.

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use campaignforge_shared::{AnalyzerOptions, CampaignForgeError, Result};

/// Extra Chromium flags for containers and CI hosts.
/// `--no-sandbox` and `--disable-setuid-sandbox` come from `no_sandbox()`.
const LAUNCH_ARGS: [&str; 2] = ["--disable-dev-shm-usage", "--disable-gpu"];

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession + 'static;

    async fn launch(&self, options: &AnalyzerOptions) -> Result<Self::Session>;
}

/// One running browser, shared by concurrent analyses.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a fresh blank page.
    async fn new_page(&self) -> Result<Box<dyn PageHandle>>;

    /// Shut the browser down. Pages still open are invalidated.
    async fn close(&self) -> Result<()>;
}

/// A single browser tab, owned by exactly one analysis.
#[async_trait]
pub trait PageHandle: Send + Sync {
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;

    async fn set_user_agent(&self, user_agent: &str) -> Result<()>;

    /// Navigate and wait for the load event. Unbounded; callers apply
    /// their own timeout.
    async fn goto(&self, url: &str) -> Result<()>;

    async fn title(&self) -> Result<Option<String>>;

    /// The rendered document as HTML.
    async fn html(&self) -> Result<String>;

    /// Evaluate a script and return its JSON result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Write a full-page PNG screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

fn browser_err(context: &str, e: impl std::fmt::Display) -> CampaignForgeError {
    CampaignForgeError::Browser(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Chromium
// ---------------------------------------------------------------------------

/// Launches a local headless Chromium through the DevTools protocol.
#[derive(Debug, Default, Clone)]
pub struct ChromiumLauncher;

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self, options: &AnalyzerOptions) -> Result<ChromiumSession> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .args(LAUNCH_ARGS)
            .window_size(options.viewport_width, options.viewport_height)
            .build()
            .map_err(|e| browser_err("invalid browser config", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| browser_err("failed to launch browser", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    error!("CDP event handler error: {e}");
                    break;
                }
            }
        });

        info!("headless browser launched");
        Ok(ChromiumSession {
            browser: Mutex::new(browser),
            handler_task,
        })
    }
}

pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| browser_err("failed to open page", e))?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler_task.abort();
        closed.map_err(|e| browser_err("failed to close browser", e))?;
        info!("headless browser closed");
        Ok(())
    }
}

pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                width as i64,
                height as i64,
                1.0,
                false,
            ))
            .await
            .map_err(|e| browser_err("failed to set viewport", e))?;
        Ok(())
    }

    async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
        self.page
            .set_user_agent(user_agent)
            .await
            .map_err(|e| browser_err("failed to set user agent", e))?;
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| browser_err("navigation failed", e))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| browser_err("navigation failed", e))?;
        debug!(%url, "page loaded");
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>> {
        self.page
            .get_title()
            .await
            .map_err(|e| browser_err("failed to read title", e))
    }

    async fn html(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| browser_err("failed to read page content", e))
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| browser_err("script evaluation failed", e))?;
        result
            .into_value()
            .map_err(|e| browser_err("script returned an unexpected value", e))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
            .await
            .map_err(|e| browser_err("screenshot failed", e))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| browser_err("failed to close page", e))
    }
}
