//! TextFields page

use tracing::{info, instrument};

use super::base::BasePage;
use crate::webdriver::Locator;
use crate::Result;

/// Text input demo, reached from the Views page
#[derive(Debug, Clone)]
pub struct TextFieldsPage {
    base: BasePage,
}

impl TextFieldsPage {
    pub const TEXT_FIELDS: Locator = Locator::accessibility_id("TextFields");
    pub const TITLE: Locator = Locator::xpath("//android.widget.TextView[@text='Views/TextFields']");
    pub const EDIT: Locator = Locator::id("io.appium.android.apis:id/edit");

    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    /// Open TextFields, type `text` and return what the field now holds
    #[instrument(skip(self, text))]
    pub async fn enter_text(&self, text: &str) -> Result<String> {
        self.base.swipe_until_visible(&Self::TEXT_FIELDS).await?;
        self.base.click(&Self::TEXT_FIELDS).await?;

        // page is loaded once the title shows
        self.base.wait_visible(&Self::TITLE).await?;
        self.base.input_text(&Self::EDIT, text, true).await?;

        let typed = self.base.text_of(&Self::EDIT).await?;
        info!("Text field now holds '{}'", typed);
        Ok(typed)
    }
}
