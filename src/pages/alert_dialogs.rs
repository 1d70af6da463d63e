//! Alert Dialogs page

use tracing::{info, instrument};

use super::base::BasePage;
use crate::webdriver::Locator;
use crate::Result;

#[derive(Debug, Clone)]
pub struct AlertDialogsPage {
    base: BasePage,
}

impl AlertDialogsPage {
    pub const APP: Locator = Locator::accessibility_id("App");
    pub const ALERT_DIALOGS: Locator = Locator::accessibility_id("Alert Dialogs");
    pub const OK_CANCEL_MESSAGE: Locator = Locator::accessibility_id("OK Cancel dialog with a message");
    pub const ALERT_TITLE: Locator = Locator::id("android:id/alertTitle");
    pub const CANCEL: Locator = Locator::id("android:id/button2");
    pub const OK: Locator = Locator::id("android:id/button1");

    pub fn new(base: BasePage) -> Self {
        Self { base }
    }

    /// Open the dialog, dismiss it with Cancel, reopen it, confirm with OK
    ///
    /// Returns `true` once the alert title is no longer visible.
    #[instrument(skip(self))]
    pub async fn open_and_dismiss(&self) -> Result<bool> {
        self.base.click(&Self::APP).await?;
        self.base.click(&Self::ALERT_DIALOGS).await?;
        info!("Navigated to Alert Dialogs page");

        self.base.click(&Self::OK_CANCEL_MESSAGE).await?;
        let title = self.base.text_of(&Self::ALERT_TITLE).await?;
        info!("Alert dialog title displayed: {}", title);

        self.base.click(&Self::CANCEL).await?;

        self.base.click(&Self::OK_CANCEL_MESSAGE).await?;
        self.base.click(&Self::OK).await?;

        let closed = self.base.wait_invisible(&Self::ALERT_TITLE).await?;
        info!("Alert dialog closed: {}", closed);
        Ok(closed)
    }
}
