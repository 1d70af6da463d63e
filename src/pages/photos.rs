//! Photos gallery page

use std::time::Duration;
use tracing::{info, instrument};

use super::base::BasePage;
use crate::gestures::{swipe_until_exhausted, Direction, SwipeOptions, SwipeRatios};
use crate::webdriver::Locator;
use crate::Result;

/// Gallery of photos, reached from the Views page
#[derive(Debug, Clone)]
pub struct PhotosPage {
    base: BasePage,
    swipe: SwipeOptions,
}

impl PhotosPage {
    pub const GALLERY: Locator = Locator::accessibility_id("Gallery");
    pub const PHOTOS: Locator = Locator::accessibility_id("1. Photos");
    pub const CONTAINER: Locator = Locator::id("io.appium.android.apis:id/gallery");

    /// Gallery swipes use the scroll pause configured on `base`
    pub fn new(base: BasePage) -> Self {
        let swipe = SwipeOptions {
            duration: Duration::from_millis(500),
            pause: base.scroll().pause,
            ratios: SwipeRatios::CONTAINER,
        };
        Self { base, swipe }
    }

    /// Override the timing of gallery swipes
    pub fn with_swipe_options(mut self, swipe: SwipeOptions) -> Self {
        self.swipe = swipe;
        self
    }

    /// Gallery → 1. Photos
    #[instrument(skip(self))]
    pub async fn open(&self) -> Result<()> {
        self.base.click(&Self::GALLERY).await?;
        self.base.click(&Self::PHOTOS).await?;
        info!("Navigated to Photos scene");

        let implicit = self.base.wait().timeout();
        self.base.client().set_implicit_wait(implicit).await?;
        info!("Set implicit wait to {:?} for page stabilization", implicit);
        Ok(())
    }

    /// Swipe left through the gallery until the last photo is shown
    ///
    /// Returns `false` when `max_swipes` ran out first.
    #[instrument(skip(self))]
    pub async fn swipe_to_last_photo(&self, max_swipes: u32) -> Result<bool> {
        swipe_until_exhausted(
            self.base.client(),
            &Self::CONTAINER,
            Direction::Left,
            max_swipes,
            &self.swipe,
        )
        .await
    }
}
