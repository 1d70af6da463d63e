//! Directional scroll search
//!
//! Alternates "is the element visible?" with "swipe once" until the element
//! shows up or the swipe budget is spent.

use std::time::Duration;
use tracing::{info, instrument, warn};

use super::swipe::{Direction, SwipeRatios};
use crate::config::ScrollDefaults;
use crate::wait::probe_visible;
use crate::webdriver::{ElementHandle, Locator, Point, WebDriverClient};
use crate::Result;

/// Scroll search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSearch {
    /// Maximum number of swipes
    pub max_swipes: u32,
    pub direction: Direction,
    /// Swipe gesture duration
    pub duration: Duration,
    /// Settle pause after each swipe
    pub pause: Duration,
}

impl Default for ScrollSearch {
    fn default() -> Self {
        Self {
            max_swipes: 10,
            direction: Direction::Up,
            duration: Duration::from_millis(500),
            pause: Duration::from_millis(500),
        }
    }
}

impl From<&ScrollDefaults> for ScrollSearch {
    fn from(defaults: &ScrollDefaults) -> Self {
        Self {
            max_swipes: defaults.max_swipes,
            direction: Direction::Up,
            duration: Duration::from_millis(defaults.duration_ms),
            pause: Duration::from_millis(defaults.pause_ms),
        }
    }
}

impl ScrollSearch {
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn max_swipes(mut self, max_swipes: u32) -> Self {
        self.max_swipes = max_swipes;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Run the search
    ///
    /// Returns `Ok(None)` when the element did not become visible within
    /// `max_swipes` swipes. Only "no such element" and stale references are
    /// read as absence; any other error is returned as-is.
    #[instrument(skip(self, client, locator), fields(locator = %locator, direction = %self.direction))]
    pub async fn run(
        &self,
        client: &dyn WebDriverClient,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>> {
        // measured on the first swipe, reused for the rest of this search
        let mut endpoints: Option<(Point, Point)> = None;
        let mut swipes = 0u32;

        loop {
            if let Some(element) = probe_visible(client, locator).await? {
                info!("Target element {} found after {} swipes", locator, swipes);
                return Ok(Some(element));
            }

            if swipes >= self.max_swipes {
                break;
            }

            let (start, end) = match endpoints {
                Some(points) => points,
                None => {
                    let size = client.window_size().await?;
                    let points = self.direction.endpoints(size, SwipeRatios::VIEWPORT);
                    endpoints = Some(points);
                    points
                }
            };

            client.swipe(start, end, self.duration).await?;
            swipes += 1;
            info!(
                "Swipe attempt {}/{} (direction: {})",
                swipes, self.max_swipes, self.direction
            );

            tokio::time::sleep(self.pause).await;
        }

        warn!(
            "Target element {} not found after {} swipe attempts",
            locator, self.max_swipes
        );
        Ok(None)
    }
}

/// Swipe in `direction` until the element matched by `locator` is visible
///
/// The direction is validated before any remote call is made; an unknown
/// direction is an error rather than a guess.
pub async fn swipe_until_element_appears(
    client: &dyn WebDriverClient,
    locator: &Locator,
    max_swipes: u32,
    direction: &str,
    duration: Duration,
    pause: Duration,
) -> Result<Option<ElementHandle>> {
    let direction: Direction = direction.parse()?;

    ScrollSearch {
        max_swipes,
        direction,
        duration,
        pause,
    }
    .run(client, locator)
    .await
}
