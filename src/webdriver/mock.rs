//! Mock WebDriver implementation for testing
//!
//! This module provides a recording transport and a scripted device that
//! implement the WebDriver traits without an Appium server.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::webdriver::traits::*;
use crate::webdriver::types::*;
use crate::Error;

/// One command seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport that records requests and replays queued responses
///
/// When the queue is empty every command succeeds with `null`.
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Result<Value, Error>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response value
    pub fn push_ok(&self, value: Value) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(value));
    }

    /// Queue a failed response
    pub fn push_err(&self, error: Error) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WebDriverTransport for MockTransport {
    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<Value, Error> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body,
            });

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }

    fn base_url(&self) -> &str {
        "mock://appium"
    }
}

/// What happens when a mock element is clicked
#[derive(Debug, Clone, PartialEq)]
pub enum ClickEffect {
    /// Nothing changes
    None,
    /// A new screen is pushed
    Open(String),
    /// The current screen is popped (dialog buttons, up navigation)
    Close,
}

/// Element living on one screen of a [`MockDevice`]
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    locator: Locator,
    screen: String,
    text: String,
    rect: Rect,
    displayed: bool,
    enabled: bool,
    revealed_after: u32,
    on_click: ClickEffect,
}

impl MockElement {
    /// Create an element matched by `locator`, shown on `screen`
    pub fn new<S: Into<String>>(locator: Locator, screen: S) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            locator,
            screen: screen.into(),
            text: String::new(),
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 50.0,
            },
            displayed: true,
            enabled: true,
            revealed_after: 0,
            on_click: ClickEffect::None,
        }
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Present in the hierarchy but not displayed
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Only resolvable once the screen has been swiped `swipes` times
    pub fn revealed_after(mut self, swipes: u32) -> Self {
        self.revealed_after = swipes;
        self
    }

    pub fn opens<S: Into<String>>(mut self, screen: S) -> Self {
        self.on_click = ClickEffect::Open(screen.into());
        self
    }

    pub fn closes(mut self) -> Self {
        self.on_click = ClickEffect::Close;
        self
    }
}

/// A swipe performed on a [`MockDevice`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeRecord {
    pub start: Point,
    pub end: Point,
    pub duration: Duration,
}

#[derive(Debug)]
struct DeviceState {
    window: WindowSize,
    elements: Vec<MockElement>,
    screens: Vec<String>,
    offsets: HashMap<String, u32>,
    scroll_limits: HashMap<String, u32>,
    swipes: Vec<SwipeRecord>,
    find_calls: u32,
    back_presses: u32,
    implicit_wait: Option<Duration>,
    fail_swipes: bool,
    session_lost: bool,
    quit: bool,
}

impl DeviceState {
    fn current_screen(&self) -> &str {
        self.screens.last().map(String::as_str).unwrap_or("")
    }

    fn offset(&self, screen: &str) -> u32 {
        self.offsets.get(screen).copied().unwrap_or(0)
    }

    fn is_reachable(&self, element: &MockElement) -> bool {
        element.screen == self.current_screen() && self.offset(&element.screen) >= element.revealed_after
    }

    fn check_session(&self) -> Result<(), Error> {
        if self.session_lost || self.quit {
            return Err(Error::session_not_found("mock-session"));
        }
        Ok(())
    }

    fn element(&self, handle: &ElementHandle) -> Result<&MockElement, Error> {
        self.check_session()?;
        self.elements
            .iter()
            .find(|e| e.id == handle.id())
            .filter(|e| self.is_reachable(e))
            .ok_or_else(|| Error::stale_element(handle.id()))
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut MockElement, Error> {
        self.element(handle)?;
        self.elements
            .iter_mut()
            .find(|e| e.id == handle.id())
            .ok_or_else(|| Error::stale_element(handle.id()))
    }
}

/// Scripted Android device
///
/// Screens form a stack; clicking elements pushes or pops screens and each
/// swipe scrolls the current screen one step, revealing elements declared
/// with [`MockElement::revealed_after`].
#[derive(Debug)]
pub struct MockDevice {
    session_id: String,
    state: Mutex<DeviceState>,
}

impl MockDevice {
    /// Create a device showing `home_screen`
    pub fn new<S: Into<String>>(window: WindowSize, home_screen: S) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            state: Mutex::new(DeviceState {
                window,
                elements: Vec::new(),
                screens: vec![home_screen.into()],
                offsets: HashMap::new(),
                scroll_limits: HashMap::new(),
                swipes: Vec::new(),
                find_calls: 0,
                back_presses: 0,
                implicit_wait: None,
                fail_swipes: false,
                session_lost: false,
                quit: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element
    pub fn with_element(self, element: MockElement) -> Self {
        self.state().elements.push(element);
        self
    }

    /// Stop scrolling `screen` after `swipes` swipes (end of list)
    pub fn with_scroll_limit<S: Into<String>>(self, screen: S, swipes: u32) -> Self {
        self.state().scroll_limits.insert(screen.into(), swipes);
        self
    }

    /// Make every swipe fail as if the gesture was rejected
    pub fn fail_swipes(&self) {
        self.state().fail_swipes = true;
    }

    /// Make every command fail as if the server dropped the session
    pub fn drop_session(&self) {
        self.state().session_lost = true;
    }

    /// Swipes performed so far
    pub fn swipes(&self) -> Vec<SwipeRecord> {
        self.state().swipes.clone()
    }

    /// Number of `find_element` calls so far
    pub fn find_calls(&self) -> u32 {
        self.state().find_calls
    }

    pub fn back_presses(&self) -> u32 {
        self.state().back_presses
    }

    /// Screen currently on top
    pub fn current_screen(&self) -> String {
        self.state().current_screen().to_string()
    }

    pub fn implicit_wait(&self) -> Option<Duration> {
        self.state().implicit_wait
    }

    pub fn is_quit(&self) -> bool {
        self.state().quit
    }

    /// ApiDemos layout used by the bundled scenarios
    pub fn api_demos() -> Self {
        let gallery_rect = Rect {
            x: 0.0,
            y: 300.0,
            width: 1080.0,
            height: 600.0,
        };

        MockDevice::new(WindowSize::new(1080.0, 1920.0), "home")
            .with_element(
                MockElement::new(
                    Locator::xpath("//android.widget.TextView[@text='Accessibility']"),
                    "home",
                )
                .text("Accessibility"),
            )
            .with_element(MockElement::new(Locator::accessibility_id("App"), "home").text("App").opens("app"))
            .with_element(
                MockElement::new(Locator::accessibility_id("Views"), "home")
                    .text("Views")
                    .revealed_after(2)
                    .opens("views"),
            )
            .with_scroll_limit("home", 3)
            .with_element(
                MockElement::new(Locator::accessibility_id("Alert Dialogs"), "app")
                    .text("Alert Dialogs")
                    .opens("alert_dialogs"),
            )
            .with_element(
                MockElement::new(
                    Locator::accessibility_id("OK Cancel dialog with a message"),
                    "alert_dialogs",
                )
                .text("OK Cancel dialog with a message")
                .opens("alert"),
            )
            .with_element(
                MockElement::new(Locator::id("android:id/alertTitle"), "alert")
                    .text(" Lorem ipsum dolor sit aie consectetur adipiscing "),
            )
            .with_element(MockElement::new(Locator::id("android:id/button2"), "alert").text("CANCEL").closes())
            .with_element(MockElement::new(Locator::id("android:id/button1"), "alert").text("OK").closes())
            .with_element(
                MockElement::new(Locator::accessibility_id("Chronometer"), "views").text(" Chronometer "),
            )
            .with_element(MockElement::new(Locator::accessibility_id("Gallery"), "views").text("Gallery").opens("gallery"))
            .with_element(
                MockElement::new(Locator::accessibility_id("TextFields"), "views")
                    .text("TextFields")
                    .revealed_after(6)
                    .opens("text_fields"),
            )
            .with_scroll_limit("views", 12)
            .with_element(
                MockElement::new(
                    Locator::xpath("//android.widget.TextView[@text='Views/TextFields']"),
                    "text_fields",
                )
                .text("Views/TextFields"),
            )
            .with_element(MockElement::new(Locator::id("io.appium.android.apis:id/edit"), "text_fields"))
            .with_element(MockElement::new(Locator::accessibility_id("1. Photos"), "gallery").text("1. Photos").opens("photos"))
            .with_element(MockElement::new(Locator::id("io.appium.android.apis:id/gallery"), "photos").rect(gallery_rect))
            .with_scroll_limit("photos", 5)
    }
}

#[async_trait]
impl WebDriverClient for MockDevice {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, Error> {
        let mut state = self.state();
        state.check_session()?;
        state.find_calls += 1;

        state
            .elements
            .iter()
            .find(|e| &e.locator == locator && state.is_reachable(e))
            .map(|e| ElementHandle::new(e.id.clone()))
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>, Error> {
        let state = self.state();
        state.check_session()?;

        Ok(state
            .elements
            .iter()
            .filter(|e| &e.locator == locator && state.is_reachable(e))
            .map(|e| ElementHandle::new(e.id.clone()))
            .collect())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, Error> {
        Ok(self.state().element(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, Error> {
        Ok(self.state().element(element)?.enabled)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), Error> {
        let mut state = self.state();
        let effect = state.element(element)?.on_click.clone();

        match effect {
            ClickEffect::None => {}
            ClickEffect::Open(screen) => state.screens.push(screen),
            ClickEffect::Close => {
                if state.screens.len() > 1 {
                    state.screens.pop();
                }
            }
        }

        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), Error> {
        self.state().element_mut(element)?.text.clear();
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), Error> {
        self.state().element_mut(element)?.text.push_str(text);
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, Error> {
        Ok(self.state().element(element)?.text.clone())
    }

    async fn rect(&self, element: &ElementHandle) -> Result<Rect, Error> {
        Ok(self.state().element(element)?.rect)
    }

    async fn window_size(&self) -> Result<WindowSize, Error> {
        let state = self.state();
        state.check_session()?;
        Ok(state.window)
    }

    async fn swipe(&self, start: Point, end: Point, duration: Duration) -> Result<(), Error> {
        let mut state = self.state();
        state.check_session()?;

        if state.fail_swipes {
            return Err(Error::webdriver("unknown error", "swipe gesture rejected"));
        }

        state.swipes.push(SwipeRecord { start, end, duration });

        let screen = state.current_screen().to_string();
        let limit = state.scroll_limits.get(&screen).copied().unwrap_or(u32::MAX);
        let offset = state.offsets.entry(screen).or_insert(0);
        *offset = (*offset + 1).min(limit);

        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, Error> {
        self.state().check_session()?;
        // Minimal PNG signature + IHDR prefix
        Ok(vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
            0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
        ])
    }

    async fn page_source(&self) -> Result<String, Error> {
        let state = self.state();
        state.check_session()?;

        let screen = state.current_screen();
        Ok(format!(
            "<hierarchy screen=\"{}\" offset=\"{}\"/>",
            screen,
            state.offset(screen)
        ))
    }

    async fn back(&self) -> Result<(), Error> {
        let mut state = self.state();
        state.check_session()?;
        state.back_presses += 1;
        if state.screens.len() > 1 {
            state.screens.pop();
        }
        Ok(())
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), Error> {
        let mut state = self.state();
        state.check_session()?;
        state.implicit_wait = Some(timeout);
        Ok(())
    }

    async fn quit(&self) -> Result<(), Error> {
        let mut state = self.state();
        state.check_session()?;
        state.quit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_replays_queue() {
        let transport = MockTransport::new();
        transport.push_ok(serde_json::json!(1));
        transport.push_err(Error::timeout("slow"));

        assert_eq!(transport.send(HttpMethod::Get, "/a", None).await.unwrap(), 1);
        assert!(transport.send(HttpMethod::Get, "/b", None).await.is_err());
        assert!(transport.send(HttpMethod::Get, "/c", None).await.unwrap().is_null());
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_device_navigation_stack() {
        let device = MockDevice::api_demos();

        let app = device.find_element(&Locator::accessibility_id("App")).await.unwrap();
        device.click(&app).await.unwrap();
        assert_eq!(device.current_screen(), "app");

        // handle from the previous screen is no longer attached
        assert!(matches!(device.is_displayed(&app).await, Err(Error::StaleElement(_))));

        device.back().await.unwrap();
        assert_eq!(device.current_screen(), "home");
        assert!(device.is_displayed(&app).await.unwrap());
    }

    #[tokio::test]
    async fn test_device_reveals_after_swipes() {
        let device = MockDevice::api_demos();
        let views = Locator::accessibility_id("Views");
        let (a, b) = (Point::new(540.0, 1536.0), Point::new(540.0, 384.0));

        assert!(device.find_element(&views).await.is_err());
        device.swipe(a, b, Duration::ZERO).await.unwrap();
        assert!(device.find_element(&views).await.is_err());
        device.swipe(a, b, Duration::ZERO).await.unwrap();
        assert!(device.find_element(&views).await.is_ok());
        assert_eq!(device.swipes().len(), 2);
    }

    #[tokio::test]
    async fn test_device_text_editing() {
        let device = MockDevice::new(WindowSize::new(100.0, 100.0), "main")
            .with_element(MockElement::new(Locator::id("edit"), "main").text("old"));

        let edit = device.find_element(&Locator::id("edit")).await.unwrap();
        device.clear(&edit).await.unwrap();
        device.send_keys(&edit, "new").await.unwrap();
        assert_eq!(device.text(&edit).await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_device_dropped_session() {
        let device = MockDevice::api_demos();
        device.drop_session();

        assert!(matches!(
            device.find_element(&Locator::accessibility_id("App")).await,
            Err(Error::SessionNotFound(_))
        ));
        assert!(device.window_size().await.is_err());
    }
}
