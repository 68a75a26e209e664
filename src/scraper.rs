use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::identity::ClientIdentity;

/// Blocking page renderer: loads a URL with script execution and returns the
/// final DOM as HTML.
///
/// Implementations may block for several seconds and must only be called from
/// a blocking context (`spawn_blocking` or a plain thread).
pub trait PageRenderer: Send + Sync {
    fn render(&self, url: &str, identity: &ClientIdentity) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub page_ready_timeout: Duration,
    pub settle_delay: Duration,
    pub scroll_steps: u32,
    pub scroll_distance_px: u32,
    pub scroll_pause: Duration,
    pub window_size: (u32, u32),
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
}

impl From<&ScraperConfig> for RenderSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            page_ready_timeout: Duration::from_secs(config.page_ready_timeout),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            scroll_steps: config.scroll_steps,
            scroll_distance_px: config.scroll_distance_px,
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            window_size: (config.window_width, config.window_height),
            headless: config.headless,
            chrome_path: config.chrome_path.as_ref().map(PathBuf::from),
        }
    }
}

/// A single-use Chromium instance with one tab.
///
/// Dropping the session closes the tab and the browser process, so every
/// exit path of a render releases it.
struct BrowserSession {
    tab: Arc<Tab>,
    // Kills the Chromium child process when dropped
    _browser: Browser,
}

impl BrowserSession {
    fn open(options: LaunchOptions<'_>, identity: &ClientIdentity) -> Result<Self> {
        let browser = Browser::new(options)
            .map_err(|e| AppError::Render(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Render(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&identity.user_agent, Some("en-US,en;q=0.9"), None)
            .map_err(|e| AppError::Render(format!("Failed to set user agent: {}", e)))?;

        // Hides navigator.webdriver and friends before any page script runs
        tab.enable_stealth_mode()
            .map_err(|e| AppError::Render(format!("Failed to enable stealth mode: {}", e)))?;

        Ok(Self {
            tab,
            _browser: browser,
        })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            tracing::debug!("Tab close during session release failed: {}", e);
        }
        tracing::debug!("Rendering session released");
    }
}

pub struct ChromeRenderer {
    settings: RenderSettings,
}

impl ChromeRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn launch_options(&self) -> Result<LaunchOptions<'static>> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(self.settings.headless)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some(self.settings.window_size))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-notifications"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
                OsStr::new("--disable-infobars"),
                OsStr::new("--no-first-run"),
                OsStr::new("--no-default-browser-check"),
            ])
            .build()
            .map_err(|e| AppError::Render(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &self.settings.chrome_path {
            launch_options.path = Some(chrome_path.clone());
        }

        Ok(launch_options)
    }

    fn scroll_script(&self) -> String {
        format!("window.scrollTo(0, window.scrollY + {})", self.settings.scroll_distance_px)
    }
}

impl PageRenderer for ChromeRenderer {
    fn render(&self, url: &str, identity: &ClientIdentity) -> Result<String> {
        let session = BrowserSession::open(self.launch_options()?, identity)?;
        let tab = &session.tab;

        tab.navigate_to(url)
            .map_err(|e| AppError::Render(format!("Navigation failed: {}", e)))?;

        let ready_timeout = self.settings.page_ready_timeout;
        tab.wait_for_element_with_custom_timeout("body", ready_timeout)
            .map_err(|e| {
                tracing::debug!(url, "Document body never appeared: {}", e);
                AppError::Timeout {
                    operation: "document body".to_string(),
                    seconds: ready_timeout.as_secs(),
                }
            })?;

        std::thread::sleep(self.settings.settle_delay);

        let script = self.scroll_script();
        for step in 0..self.settings.scroll_steps {
            tab.evaluate(&script, false)
                .map_err(|e| AppError::Render(format!("Scroll step {} failed: {}", step + 1, e)))?;
            std::thread::sleep(self.settings.scroll_pause);
        }

        let html = tab
            .get_content()
            .map_err(|e| AppError::Render(format!("Failed to get page content: {}", e)))?;

        tracing::debug!(url, bytes = html.len(), "Captured rendered document");
        Ok(html)
    }
}
