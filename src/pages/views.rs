//! Views page

use tracing::{info, instrument};

use super::base::BasePage;
use crate::webdriver::Locator;
use crate::Result;

/// Entry point into the Views catalogue
#[derive(Debug, Clone)]
pub struct ViewsPage {
    base: BasePage,
}

impl ViewsPage {
    pub const VIEWS: Locator = Locator::accessibility_id("Views");
    pub const CHRONOMETER: Locator = Locator::accessibility_id("Chronometer");

    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage {
        &self.base
    }

    /// Scroll to "Views", open it and return the trimmed "Chronometer" label
    #[instrument(skip(self))]
    pub async fn open(&self) -> Result<String> {
        self.base.swipe_until_visible(&Self::VIEWS).await?;
        self.base.click(&Self::VIEWS).await?;

        let label = self.base.text_of(&Self::CHRONOMETER).await?;
        info!("Navigated to Views page, Chronometer is visible");
        Ok(label)
    }
}
