//! Shared page-object behaviour
//!
//! Waits, clicks and text input with a screenshot on failure, plus the
//! scroll search and back-to-home navigation every page relies on.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::artifacts::ScreenshotRecorder;
use crate::config::Config;
use crate::gestures::ScrollSearch;
use crate::wait::{probe_visible, Wait};
use crate::webdriver::{ElementHandle, Locator, WebDriverClient};
use crate::{Error, Result};

/// State shared by every page object
#[derive(Debug, Clone)]
pub struct BasePage {
    client: Arc<dyn WebDriverClient>,
    wait: Wait,
    recorder: ScreenshotRecorder,
    scroll: ScrollSearch,
    home_locator: Locator,
    max_return_times: u32,
}

impl BasePage {
    /// Create a base page bound to `client`, configured from `config`
    pub fn new(client: Arc<dyn WebDriverClient>, config: &Config) -> Self {
        debug!("BasePage initialized with session {}", client.session_id());
        Self {
            client,
            wait: Wait::new(config.wait_timeout()),
            recorder: ScreenshotRecorder::new(config.screenshot_dir.clone()),
            scroll: ScrollSearch::from(&config.scroll),
            home_locator: config.home_locator.clone(),
            max_return_times: config.max_return_times,
        }
    }

    pub fn with_wait(mut self, wait: Wait) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollSearch) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn client(&self) -> &dyn WebDriverClient {
        self.client.as_ref()
    }

    pub fn wait(&self) -> &Wait {
        &self.wait
    }

    pub fn scroll(&self) -> &ScrollSearch {
        &self.scroll
    }

    /// Wait until the element is visible
    pub async fn wait_visible(&self, locator: &Locator) -> Result<ElementHandle> {
        info!("Waiting for element visibility: {} (timeout: {:?})", locator, self.wait.timeout());
        let result = self.wait.visible(self.client(), locator).await;
        self.on_timeout(result, "visibility_timeout", locator).await
    }

    /// Wait until the element is visible and enabled
    pub async fn wait_clickable(&self, locator: &Locator) -> Result<ElementHandle> {
        info!("Waiting for element clickable: {} (timeout: {:?})", locator, self.wait.timeout());
        let result = self.wait.clickable(self.client(), locator).await;
        self.on_timeout(result, "clickable_timeout", locator).await
    }

    /// Wait until the element is gone or hidden
    pub async fn wait_invisible(&self, locator: &Locator) -> Result<bool> {
        let result = self.wait.invisible(self.client(), locator).await;
        self.on_timeout(result, "invisibility_timeout", locator).await
    }

    /// Click once the element is clickable
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn click(&self, locator: &Locator) -> Result<ElementHandle> {
        let element = self.wait_clickable(locator).await?;

        if let Err(e) = self.client.click(&element).await {
            error!("Failed to click element {}: {}", locator, e);
            self.capture_quietly(&format!("click_failure_{}", locator.slug())).await;
            return Err(e);
        }

        info!("Successfully clicked element: {}", locator);
        Ok(element)
    }

    /// Type `text` into the element, optionally clearing it first
    #[instrument(skip(self, locator, text), fields(locator = %locator))]
    pub async fn input_text(&self, locator: &Locator, text: &str, clear_first: bool) -> Result<ElementHandle> {
        info!("Inputting text to element {}: '{}'", locator, text);
        let element = self.wait_visible(locator).await?;

        let typed = async {
            if clear_first {
                self.client.clear(&element).await?;
                debug!("Cleared text from element {}", locator);
            }
            self.client.send_keys(&element, text).await
        };

        if let Err(e) = typed.await {
            error!("Failed to input text to element {}: {}", locator, e);
            self.capture_quietly(&format!("input_failure_{}", locator.slug())).await;
            return Err(e);
        }

        info!("Successfully input text to element {}", locator);
        Ok(element)
    }

    /// Visible text of the element, trimmed
    pub async fn text_of(&self, locator: &Locator) -> Result<String> {
        let element = self.wait_visible(locator).await?;
        let text = self.client.text(&element).await?;
        Ok(text.trim().to_string())
    }

    /// Scroll search with the configured defaults
    pub async fn swipe_until_visible(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
        self.scroll.run(self.client(), locator).await
    }

    /// Press back until the home screen shows up
    ///
    /// Returns `false` when `max_return_times` presses were not enough.
    #[instrument(skip(self))]
    pub async fn return_to_home(&self) -> Result<bool> {
        for presses in 0..=self.max_return_times {
            if probe_visible(self.client(), &self.home_locator).await?.is_some() {
                info!("Home screen reached after {} back presses", presses);
                return Ok(true);
            }

            if presses == self.max_return_times {
                break;
            }
            self.client.back().await?;
        }

        warn!(
            "Home screen not reached after {} back presses",
            self.max_return_times
        );
        Ok(false)
    }

    /// Save a screenshot named `{prefix}_{timestamp}.png`
    pub async fn capture_screenshot(&self, prefix: &str) -> Result<PathBuf> {
        self.recorder.capture(self.client(), prefix).await
    }

    async fn on_timeout<T>(&self, result: Result<T>, prefix: &str, locator: &Locator) -> Result<T> {
        match result {
            Err(e @ Error::Timeout(_)) => {
                error!("{}", e);
                self.capture_quietly(&format!("{}_{}", prefix, locator.slug())).await;
                Err(e)
            }
            other => other,
        }
    }

    /// A failed screenshot must not hide the error that triggered it
    async fn capture_quietly(&self, prefix: &str) {
        if let Err(e) = self.capture_screenshot(prefix).await {
            warn!("Failed to capture screenshot '{}': {}", prefix, e);
        }
    }
}
