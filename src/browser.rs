use crate::config::BrowserOptions;
use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ops::Deref;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Polls `condition` every `interval` until it holds or `timeout` elapses.
/// Returns whether the condition was met.
pub fn wait_until<F>(timeout: Duration, interval: Duration, mut condition: F) -> Result<bool>
where
    F: FnMut() -> Result<bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition()? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(interval);
    }
}

/// A running Chrome with one working tab.
///
/// Chrome is shut down when the session is dropped, which also covers early
/// returns through `?`.
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
    options: BrowserOptions,
}

impl BrowserSession {
    pub fn launch(options: BrowserOptions) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", options.headless);

        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .window_size(Some(options.window_size))
            .idle_browser_timeout(options.timeout.max(Duration::from_secs(60)))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(launch_options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a tab")?;

        Ok(Self { browser, tab, options })
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    pub fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .context(format!("Failed to navigate to {}", url))?;
        self.tab
            .wait_until_navigated()
            .context(format!("Page did not finish loading: {}", url))?;
        Ok(())
    }

    pub fn click(&self, selector: &str) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.options.timeout)
            .context(format!("Element not found: {}", selector))?
            .click()
            .context(format!("Failed to click {}", selector))?;
        Ok(())
    }

    pub fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.options.timeout)
            .context(format!("Element not found: {}", selector))?
            .click()?
            .type_into(text)
            .context(format!("Failed to type into {}", selector))?;
        Ok(())
    }

    pub fn wait_for(&self, selector: &str) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.options.timeout)
            .context(format!("Timed out waiting for {}", selector))?;
        Ok(())
    }

    pub fn page_height(&self) -> Result<f64> {
        let result = self
            .tab
            .evaluate("document.body.scrollHeight", false)
            .context("Failed to read page height")?;
        Ok(result.value.and_then(|value| value.as_f64()).unwrap_or(0.0))
    }

    /// Scrolls to the bottom until the page stops growing. A round ends when
    /// the height has not changed for `scroll_settle`.
    pub fn scroll_to_bottom(&self) -> Result<usize> {
        let mut last_height = self.page_height()?;
        let mut rounds = 0;
        let mut settled = false;

        while rounds < self.options.max_scroll_rounds {
            self.tab
                .evaluate("window.scrollTo(0, document.body.scrollHeight);", false)
                .context("Failed to scroll")?;
            rounds += 1;

            let grew = wait_until(self.options.scroll_settle, self.options.poll_interval, || {
                Ok(self.page_height()? != last_height)
            })?;
            if !grew {
                settled = true;
                break;
            }

            last_height = self.page_height()?;
            debug!("Scroll round {}: page height {}", rounds, last_height);
        }

        if !settled {
            warn!("Stopped scrolling after {} rounds, page was still growing", rounds);
        }
        Ok(rounds)
    }

    pub fn remove_elements(&self, selector: &str) -> Result<u64> {
        let script = format!(
            "(() => {{ const nodes = document.querySelectorAll({}); nodes.forEach(n => n.remove()); return nodes.length; }})()",
            serde_json::to_string(selector)?
        );
        let result = self.tab.evaluate(&script, false).context("Failed to remove elements")?;
        Ok(result.value.and_then(|value| value.as_u64()).unwrap_or(0))
    }

    pub fn page_html(&self) -> Result<String> {
        let result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to capture page HTML")?;
        Ok(result
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    /// Opens `url` in a new tab that is closed again when the guard drops.
    pub fn open_tab(&self, url: &str) -> Result<ScopedTab> {
        let tab = self.browser.new_tab().context("Failed to open a tab")?;
        let scoped = ScopedTab { tab };
        scoped
            .navigate_to(url)
            .context(format!("Failed to navigate to {}", url))?;
        scoped
            .wait_until_navigated()
            .context(format!("Page did not finish loading: {}", url))?;
        Ok(scoped)
    }
}

pub struct ScopedTab {
    tab: Arc<Tab>,
}

impl Deref for ScopedTab {
    type Target = Tab;

    fn deref(&self) -> &Tab {
        &self.tab
    }
}

impl Drop for ScopedTab {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            warn!("Failed to close tab: {}", e);
        }
    }
}
