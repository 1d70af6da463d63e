//! WebDriver layer traits
//!
//! This module defines the abstract interfaces for talking to a remote
//! Appium/W3C WebDriver session.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::types::{ElementHandle, Locator, Point, Rect, WindowSize};

/// HTTP verbs used by the WebDriver protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// WebDriver transport trait
///
/// Sends one command to the remote end and returns the unwrapped `value`
/// of the response. Remote errors are mapped onto [`crate::Error`].
#[async_trait]
pub trait WebDriverTransport: Send + Sync + std::fmt::Debug {
    /// Send a command; `path` is relative to the server root, e.g. `/session/abc/element`
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, crate::Error>;

    /// Server root URL
    fn base_url(&self) -> &str;
}

/// WebDriver client trait
///
/// One live remote session controlling the device under test. Callers own
/// the session exclusively; every call completes before the next is issued.
#[async_trait]
pub trait WebDriverClient: Send + Sync + std::fmt::Debug {
    /// Remote session ID
    fn session_id(&self) -> &str;

    /// Resolve a locator against the current view
    ///
    /// Fails with [`crate::Error::ElementNotFound`] when nothing matches.
    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, crate::Error>;

    /// Resolve all matches of a locator (possibly none)
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>, crate::Error>;

    /// Check if element is displayed
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, crate::Error>;

    /// Check if element is enabled
    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, crate::Error>;

    /// Click element
    async fn click(&self, element: &ElementHandle) -> Result<(), crate::Error>;

    /// Clear an editable element
    async fn clear(&self, element: &ElementHandle) -> Result<(), crate::Error>;

    /// Type text into element
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), crate::Error>;

    /// Get element text
    async fn text(&self, element: &ElementHandle) -> Result<String, crate::Error>;

    /// Get element geometry
    async fn rect(&self, element: &ElementHandle) -> Result<Rect, crate::Error>;

    /// Visible viewport size
    async fn window_size(&self) -> Result<WindowSize, crate::Error>;

    /// Single-finger swipe from `start` to `end`
    async fn swipe(&self, start: Point, end: Point, duration: Duration) -> Result<(), crate::Error>;

    /// Capture a PNG screenshot
    async fn screenshot(&self) -> Result<Vec<u8>, crate::Error>;

    /// Serialized view hierarchy
    async fn page_source(&self) -> Result<String, crate::Error>;

    /// Press the system back button
    async fn back(&self) -> Result<(), crate::Error>;

    /// Set the server-side implicit wait
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), crate::Error>;

    /// End the session
    async fn quit(&self) -> Result<(), crate::Error>;
}
