//! Swipe geometry and fixed swipes
//!
//! Coordinates are always derived from a freshly measured area (viewport or
//! container rect) so the same gesture adapts to any device resolution.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::webdriver::{Locator, Point, Rect, WebDriverClient, WindowSize};
use crate::{Error, Result};

/// Direction the finger travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Bottom to top; content scrolls down
    Up,
    /// Top to bottom; content scrolls up
    Down,
    /// Right to left
    Left,
    /// Left to right
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Opposite direction
    pub fn mirror(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Swipe endpoints across the whole viewport
    pub fn endpoints(self, size: WindowSize, ratios: SwipeRatios) -> (Point, Point) {
        self.endpoints_in(0.0, 0.0, size.width, size.height, ratios)
    }

    /// Swipe endpoints inside an element's rect
    pub fn endpoints_within(self, rect: Rect, ratios: SwipeRatios) -> (Point, Point) {
        self.endpoints_in(rect.x, rect.y, rect.width, rect.height, ratios)
    }

    fn endpoints_in(self, x: f64, y: f64, width: f64, height: f64, ratios: SwipeRatios) -> (Point, Point) {
        let (center_x, center_y) = (x + width / 2.0, y + height / 2.0);
        let (near, far) = (ratios.start, ratios.end);

        match self {
            Direction::Up => (
                Point::new(center_x, y + height * near),
                Point::new(center_x, y + height * far),
            ),
            Direction::Down => (
                Point::new(center_x, y + height * far),
                Point::new(center_x, y + height * near),
            ),
            Direction::Left => (
                Point::new(x + width * near, center_y),
                Point::new(x + width * far, center_y),
            ),
            Direction::Right => (
                Point::new(x + width * far, center_y),
                Point::new(x + width * near, center_y),
            ),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(Error::invalid_direction(other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a swipe starts and ends along its axis, as fractions of the extent
///
/// For `Up` the start is measured from the top, so the default 0.8 → 0.2
/// travels from near the bottom edge to near the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeRatios {
    pub start: f64,
    pub end: f64,
}

impl SwipeRatios {
    /// Whole-screen scrolling
    pub const VIEWPORT: SwipeRatios = SwipeRatios { start: 0.8, end: 0.2 };

    /// Paging inside a container (galleries, pagers)
    pub const CONTAINER: SwipeRatios = SwipeRatios { start: 0.9, end: 0.1 };

    pub fn new(start: f64, end: f64) -> Result<Self> {
        let valid = |r: f64| (0.0..=1.0).contains(&r);
        if !valid(start) || !valid(end) {
            return Err(Error::configuration(format!(
                "swipe ratios must lie in [0, 1], got {} -> {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }
}

impl Default for SwipeRatios {
    fn default() -> Self {
        Self::VIEWPORT
    }
}

/// Timing and geometry of fixed swipes
#[derive(Debug, Clone, Copy)]
pub struct SwipeOptions {
    /// Gesture duration
    pub duration: Duration,
    /// Settle pause after each swipe
    pub pause: Duration,
    pub ratios: SwipeRatios,
}

impl Default for SwipeOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            pause: Duration::from_millis(500),
            ratios: SwipeRatios::VIEWPORT,
        }
    }
}

/// Swipe across the viewport `times` times
///
/// A failed attempt is logged and the next one is tried; only the failure
/// of the last attempt is returned.
pub async fn swipe_times(
    client: &dyn WebDriverClient,
    direction: Direction,
    times: u32,
    options: &SwipeOptions,
) -> Result<()> {
    let size = client.window_size().await?;
    let (start, end) = direction.endpoints(size, options.ratios);

    for attempt in 1..=times {
        info!("Performing {} swipe (attempt {}/{})", direction, attempt, times);

        match client.swipe(start, end, options.duration).await {
            Ok(()) => tokio::time::sleep(options.pause).await,
            Err(e) if attempt == times => {
                warn!("Swipe {} attempt {} failed: {}", direction, attempt, e);
                return Err(e);
            }
            Err(e) => warn!("Swipe {} attempt {} failed: {}", direction, attempt, e),
        }
    }

    Ok(())
}

/// Swipe once inside the rect of the element matched by `container`
pub async fn swipe_within(
    client: &dyn WebDriverClient,
    container: &Locator,
    direction: Direction,
    options: &SwipeOptions,
) -> Result<()> {
    let element = client.find_element(container).await?;
    let rect = client.rect(&element).await?;
    let (start, end) = direction.endpoints_within(rect, options.ratios);

    client.swipe(start, end, options.duration).await?;
    tokio::time::sleep(options.pause).await;
    Ok(())
}

/// Swipe inside `container` until the view hierarchy stops changing
///
/// Returns `true` when a swipe left the page source untouched (the end of
/// the content was reached) and `false` when `max_swipes` ran out first.
pub async fn swipe_until_exhausted(
    client: &dyn WebDriverClient,
    container: &Locator,
    direction: Direction,
    max_swipes: u32,
    options: &SwipeOptions,
) -> Result<bool> {
    let mut previous = client.page_source().await?;

    for attempt in 1..=max_swipes {
        swipe_within(client, container, direction, options).await?;

        let current = client.page_source().await?;
        if current == previous {
            info!("Swipe attempt {}: reached the end of {}", attempt, container);
            return Ok(true);
        }

        info!("Swipe attempt {}: {} moved to the next page", attempt, container);
        previous = current;
    }

    info!("Max swipe attempts ({}) reached before the end of {}", max_swipes, container);
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    #[test]
    fn test_parse_direction() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("right".parse::<Direction>().unwrap(), Direction::Right);
        assert!(matches!(
            "diagonal".parse::<Direction>(),
            Err(Error::InvalidDirection(d)) if d == "diagonal"
        ));
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_up_endpoints() {
        let (start, end) = Direction::Up.endpoints(WindowSize::new(1080.0, 1920.0), SwipeRatios::VIEWPORT);
        assert_eq!(start, Point::new(540.0, 1536.0));
        assert_eq!(end, Point::new(540.0, 384.0));
    }

    #[test]
    fn test_left_endpoints() {
        let (start, end) = Direction::Left.endpoints(WindowSize::new(1000.0, 2000.0), SwipeRatios::VIEWPORT);
        assert_eq!(start, Point::new(800.0, 1000.0));
        assert_eq!(end, Point::new(200.0, 1000.0));
    }

    #[test]
    fn test_endpoints_stay_on_screen() {
        for &(w, h) in &[(1.0, 1.0), (720.0, 1280.0), (1440.0, 3200.0), (2560.0, 1600.0)] {
            for direction in ALL {
                let (start, end) = direction.endpoints(WindowSize::new(w, h), SwipeRatios::VIEWPORT);
                for p in [start, end] {
                    assert!((0.0..=w).contains(&p.x), "{:?} x out of range for {}x{}", direction, w, h);
                    assert!((0.0..=h).contains(&p.y), "{:?} y out of range for {}x{}", direction, w, h);
                }
            }
        }
    }

    #[test]
    fn test_mirror_pairs_are_symmetric() {
        let size = WindowSize::new(1080.0, 2340.0);
        for direction in ALL {
            let (start, end) = direction.endpoints(size, SwipeRatios::VIEWPORT);
            let (m_start, m_end) = direction.mirror().endpoints(size, SwipeRatios::VIEWPORT);
            assert_eq!(start, m_end);
            assert_eq!(end, m_start);
        }
    }

    #[test]
    fn test_endpoints_within_container() {
        let rect = Rect { x: 100.0, y: 300.0, width: 800.0, height: 600.0 };
        let (start, end) = Direction::Left.endpoints_within(rect, SwipeRatios::CONTAINER);
        assert_eq!(start, Point::new(820.0, 600.0));
        assert_eq!(end, Point::new(180.0, 600.0));
    }

    #[test]
    fn test_ratio_validation() {
        assert!(SwipeRatios::new(0.7, 0.3).is_ok());
        assert!(SwipeRatios::new(1.2, 0.3).is_err());
        assert!(SwipeRatios::new(0.5, -0.1).is_err());
    }
}
