//! Scroll search tests
//!
//! Drive the search against a scripted device and check swipe counts and
//! coordinates.

use std::time::Duration;

use super::search::{swipe_until_element_appears, ScrollSearch};
use super::swipe::{swipe_times, swipe_until_exhausted, Direction, SwipeOptions, SwipeRatios};
use crate::webdriver::{Locator, MockDevice, MockElement, Rect, WindowSize};
use crate::Error;

const TARGET: Locator = Locator::accessibility_id("Target");

fn device_with_target(revealed_after: u32) -> MockDevice {
    MockDevice::new(WindowSize::new(1080.0, 1920.0), "list")
        .with_element(MockElement::new(TARGET, "list").revealed_after(revealed_after))
}

fn fast_search() -> ScrollSearch {
    ScrollSearch::default().pause(Duration::ZERO)
}

#[tokio::test]
async fn test_visible_on_first_check_needs_no_swipe() {
    let device = device_with_target(0);

    let found = fast_search().run(&device, &TARGET).await.unwrap();

    assert!(found.is_some());
    assert!(device.swipes().is_empty());
    assert_eq!(device.find_calls(), 1);
}

#[tokio::test]
async fn test_found_after_three_of_ten_swipes_up() {
    let device = device_with_target(3);

    let found = swipe_until_element_appears(
        &device,
        &TARGET,
        10,
        "up",
        Duration::from_millis(500),
        Duration::ZERO,
    )
    .await
    .unwrap();

    assert!(found.is_some());
    let swipes = device.swipes();
    assert_eq!(swipes.len(), 3);
    for swipe in swipes {
        assert!((swipe.start.y - 0.8 * 1920.0).abs() < 1e-6);
        assert!((swipe.end.y - 0.2 * 1920.0).abs() < 1e-6);
        assert_eq!(swipe.start.x, 540.0);
        assert_eq!(swipe.duration, Duration::from_millis(500));
    }
}

#[tokio::test]
async fn test_exhausted_budget_returns_none() {
    let device = MockDevice::new(WindowSize::new(720.0, 1280.0), "list");

    let found = fast_search().max_swipes(10).run(&device, &TARGET).await.unwrap();

    assert!(found.is_none());
    assert_eq!(device.swipes().len(), 10);
}

#[tokio::test]
async fn test_zero_budget_checks_once_without_swiping() {
    let device = MockDevice::new(WindowSize::new(720.0, 1280.0), "list");

    let found = fast_search().max_swipes(0).run(&device, &TARGET).await.unwrap();

    assert!(found.is_none());
    assert!(device.swipes().is_empty());
    assert!(device.find_calls() <= 1);
}

#[tokio::test]
async fn test_invalid_direction_fails_before_any_remote_call() {
    let device = device_with_target(0);

    let result = swipe_until_element_appears(
        &device,
        &TARGET,
        10,
        "diagonal",
        Duration::from_millis(500),
        Duration::ZERO,
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidDirection(_))));
    assert!(device.swipes().is_empty());
    assert_eq!(device.find_calls(), 0);
}

#[tokio::test]
async fn test_hidden_element_is_not_success() {
    let device = MockDevice::new(WindowSize::new(1080.0, 1920.0), "list")
        .with_element(MockElement::new(TARGET, "list").hidden());

    let found = fast_search().max_swipes(4).run(&device, &TARGET).await.unwrap();

    assert!(found.is_none());
    assert_eq!(device.swipes().len(), 4);
}

#[tokio::test]
async fn test_left_search_uses_horizontal_midline() {
    let device = device_with_target(2);

    let found = fast_search()
        .direction(Direction::Left)
        .run(&device, &TARGET)
        .await
        .unwrap();

    assert!(found.is_some());
    let swipes = device.swipes();
    assert_eq!(swipes.len(), 2);
    assert_eq!(swipes[0].start.x, 1080.0 * 0.8);
    assert_eq!(swipes[0].end.x, 1080.0 * 0.2);
    assert_eq!(swipes[0].start.y, 960.0);
}

#[tokio::test]
async fn test_swipe_failure_propagates() {
    let device = device_with_target(5);
    device.fail_swipes();

    let result = fast_search().run(&device, &TARGET).await;

    assert!(matches!(result, Err(Error::WebDriver { .. })));
}

#[tokio::test]
async fn test_dropped_session_propagates() {
    let device = device_with_target(0);
    device.drop_session();

    let result = fast_search().run(&device, &TARGET).await;

    assert!(matches!(result, Err(Error::SessionNotFound(_))));
    assert!(device.swipes().is_empty());
}

#[tokio::test]
async fn test_swipe_times_counts() {
    let device = MockDevice::new(WindowSize::new(1080.0, 1920.0), "list");
    let options = SwipeOptions {
        pause: Duration::ZERO,
        ..Default::default()
    };

    swipe_times(&device, Direction::Up, 3, &options).await.unwrap();

    let swipes = device.swipes();
    assert_eq!(swipes.len(), 3);
    assert_eq!(swipes[0].duration, Duration::from_millis(1000));
}

#[tokio::test]
async fn test_swipe_times_reports_last_failure() {
    let device = MockDevice::new(WindowSize::new(1080.0, 1920.0), "list");
    device.fail_swipes();
    let options = SwipeOptions {
        pause: Duration::ZERO,
        ..Default::default()
    };

    let result = swipe_times(&device, Direction::Down, 2, &options).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_swipe_until_exhausted_detects_end() {
    let gallery = Locator::id("gallery");
    let device = MockDevice::new(WindowSize::new(1080.0, 1920.0), "photos")
        .with_element(MockElement::new(gallery.clone(), "photos").rect(Rect {
            x: 0.0,
            y: 300.0,
            width: 1080.0,
            height: 600.0,
        }))
        .with_scroll_limit("photos", 3);
    let options = SwipeOptions {
        pause: Duration::ZERO,
        ratios: SwipeRatios::CONTAINER,
        ..Default::default()
    };

    let reached = swipe_until_exhausted(&device, &gallery, Direction::Left, 8, &options)
        .await
        .unwrap();

    assert!(reached);
    // three swipes move the gallery, the fourth changes nothing
    let swipes = device.swipes();
    assert_eq!(swipes.len(), 4);
    assert_eq!(swipes[0].start.y, 600.0);
    assert_eq!(swipes[0].start.x, 1080.0 * 0.9);
}

#[tokio::test]
async fn test_swipe_until_exhausted_budget() {
    let gallery = Locator::id("gallery");
    let device = MockDevice::new(WindowSize::new(1080.0, 1920.0), "photos")
        .with_element(MockElement::new(gallery.clone(), "photos"));
    let options = SwipeOptions {
        pause: Duration::ZERO,
        ..Default::default()
    };

    let reached = swipe_until_exhausted(&device, &gallery, Direction::Left, 2, &options)
        .await
        .unwrap();

    assert!(!reached);
    assert_eq!(device.swipes().len(), 2);
}
