//! Remote session implementation
//!
//! This module provides a typed WebDriver client bound to one remote
//! session, built on top of any [`WebDriverTransport`].

use super::traits::*;
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Remote session implementation
#[derive(Debug, Clone)]
pub struct RemoteSession {
    /// Underlying transport
    transport: Arc<dyn WebDriverTransport>,
    /// Session ID assigned by the server
    session_id: String,
}

impl RemoteSession {
    /// Attach to an existing session
    pub fn attach<S: Into<String>>(transport: Arc<dyn WebDriverTransport>, session_id: S) -> Self {
        Self {
            transport,
            session_id: session_id.into(),
        }
    }

    /// Negotiate a new session with the given capabilities
    pub async fn create(
        transport: Arc<dyn WebDriverTransport>,
        capabilities: Map<String, Value>,
    ) -> Result<Self, Error> {
        info!("Creating session on {}", transport.base_url());

        let body = json!({
            "capabilities": {
                "alwaysMatch": capabilities,
                "firstMatch": [{}],
            }
        });

        let value = transport.send(HttpMethod::Post, "/session", Some(body)).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::webdriver("session not created", "response without sessionId"))?
            .to_string();

        info!("Session {} created", session_id);
        Ok(Self::attach(transport, session_id))
    }

    /// Send a command scoped to this session
    async fn command(&self, method: HttpMethod, suffix: &str, body: Option<Value>) -> Result<Value, Error> {
        let path = format!("/session/{}{}", self.session_id, suffix);
        self.transport.send(method, &path, body).await
    }

    /// Send a command scoped to one element
    async fn element_command(
        &self,
        method: HttpMethod,
        element: &ElementHandle,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        self.command(method, &format!("/element/{}{}", element.id(), suffix), body)
            .await
    }

    /// W3C pointer action sequence for a single touch swipe
    pub(crate) fn swipe_actions(start: Point, end: Point, duration: Duration) -> Value {
        json!({
            "actions": [{
                "type": "pointer",
                "id": "finger1",
                "parameters": { "pointerType": "touch" },
                "actions": [
                    { "type": "pointerMove", "duration": 0, "x": start.x.round() as i64, "y": start.y.round() as i64, "origin": "viewport" },
                    { "type": "pointerDown", "button": 0 },
                    { "type": "pointerMove", "duration": duration.as_millis() as u64, "x": end.x.round() as i64, "y": end.y.round() as i64, "origin": "viewport" },
                    { "type": "pointerUp", "button": 0 }
                ]
            }]
        })
    }

    fn expect_bool(value: Value, what: &str) -> Result<bool, Error> {
        value
            .as_bool()
            .ok_or_else(|| Error::internal(format!("{} returned non-boolean: {}", what, value)))
    }

    fn expect_string(value: Value, what: &str) -> Result<String, Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::internal(format!("{} returned non-string: {}", what, other))),
        }
    }
}

#[async_trait]
impl WebDriverClient for RemoteSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementHandle, Error> {
        debug!("Finding element {}", locator);

        let value = self
            .command(HttpMethod::Post, "/element", Some(locator.to_wire()))
            .await
            .map_err(|e| match e {
                Error::ElementNotFound(_) => Error::element_not_found(locator.to_string()),
                other => other,
            })?;

        WireElement::resolve_value(value)
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>, Error> {
        debug!("Finding elements {}", locator);

        let value = self
            .command(HttpMethod::Post, "/elements", Some(locator.to_wire()))
            .await?;

        match value {
            Value::Array(items) => items.into_iter().map(WireElement::resolve_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::internal(format!("Invalid elements result: {}", other))),
        }
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, Error> {
        let value = self
            .element_command(HttpMethod::Get, element, "/displayed", None)
            .await?;
        Self::expect_bool(value, "displayed")
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, Error> {
        let value = self
            .element_command(HttpMethod::Get, element, "/enabled", None)
            .await?;
        Self::expect_bool(value, "enabled")
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), Error> {
        self.element_command(HttpMethod::Post, element, "/click", None)
            .await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), Error> {
        self.element_command(HttpMethod::Post, element, "/clear", None)
            .await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), Error> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        self.element_command(
            HttpMethod::Post,
            element,
            "/value",
            Some(json!({ "text": text, "value": chars })),
        )
        .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, Error> {
        let value = self
            .element_command(HttpMethod::Get, element, "/text", None)
            .await?;
        Self::expect_string(value, "text")
    }

    async fn rect(&self, element: &ElementHandle) -> Result<Rect, Error> {
        let value = self
            .element_command(HttpMethod::Get, element, "/rect", None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn window_size(&self) -> Result<WindowSize, Error> {
        let value = self.command(HttpMethod::Get, "/window/rect", None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn swipe(&self, start: Point, end: Point, duration: Duration) -> Result<(), Error> {
        debug!(
            "Swiping ({:.0},{:.0}) -> ({:.0},{:.0}) over {:?}",
            start.x, start.y, end.x, end.y, duration
        );

        self.command(
            HttpMethod::Post,
            "/actions",
            Some(Self::swipe_actions(start, end, duration)),
        )
        .await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, Error> {
        info!("Capturing screenshot");

        let value = self.command(HttpMethod::Get, "/screenshot", None).await?;
        let data = value
            .as_str()
            .ok_or_else(|| Error::internal("No data in screenshot result"))?;

        BASE64
            .decode(data)
            .map_err(|e| Error::internal(format!("Failed to decode screenshot: {}", e)))
    }

    async fn page_source(&self) -> Result<String, Error> {
        let value = self.command(HttpMethod::Get, "/source", None).await?;
        Self::expect_string(value, "page source")
    }

    async fn back(&self) -> Result<(), Error> {
        self.command(HttpMethod::Post, "/back", None).await?;
        Ok(())
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), Error> {
        self.command(
            HttpMethod::Post,
            "/timeouts",
            Some(json!({ "implicit": timeout.as_millis() as u64 })),
        )
        .await?;
        Ok(())
    }

    async fn quit(&self) -> Result<(), Error> {
        info!("Deleting session {}", self.session_id);
        self.command(HttpMethod::Delete, "", None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::mock::MockTransport;

    fn session(transport: &Arc<MockTransport>) -> RemoteSession {
        RemoteSession::attach(transport.clone(), "s-1")
    }

    #[tokio::test]
    async fn test_create_session_sends_capabilities() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!({ "sessionId": "abc", "capabilities": {} }));

        let mut caps = Map::new();
        caps.insert("platformName".to_string(), json!("Android"));
        let session = RemoteSession::create(transport.clone(), caps).await.unwrap();
        assert_eq!(session.session_id(), "abc");

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "/session");
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["capabilities"]["alwaysMatch"]["platformName"], "Android");
    }

    #[tokio::test]
    async fn test_create_session_without_id() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!({ "capabilities": {} }));

        let result = RemoteSession::create(transport, Map::new()).await;
        assert!(matches!(result, Err(Error::WebDriver { .. })));
    }

    #[tokio::test]
    async fn test_find_element_resolves_w3c_reference() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!({ W3C_ELEMENT_KEY: "el-7" }));

        let element = session(&transport)
            .find_element(&Locator::accessibility_id("Views"))
            .await
            .unwrap();
        assert_eq!(element.id(), "el-7");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/session/s-1/element");
        assert_eq!(requests[0].body.as_ref().unwrap()["using"], "accessibility id");
    }

    #[tokio::test]
    async fn test_find_element_not_found_names_locator() {
        let transport = Arc::new(MockTransport::new());
        transport.push_err(Error::element_not_found("An element could not be located"));

        let err = session(&transport)
            .find_element(&Locator::id("android:id/button1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(ref m) if m.contains("android:id/button1")));
    }

    #[tokio::test]
    async fn test_find_elements_mixed_shapes() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!([{ W3C_ELEMENT_KEY: "a" }, { "ELEMENT": "b" }]));

        let elements = session(&transport)
            .find_elements(&Locator::xpath("//android.widget.TextView"))
            .await
            .unwrap();
        let ids: Vec<&str> = elements.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_swipe_builds_touch_actions() {
        let transport = Arc::new(MockTransport::new());

        session(&transport)
            .swipe(Point::new(540.0, 1536.0), Point::new(540.0, 384.0), Duration::from_millis(500))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/session/s-1/actions");
        let body = requests[0].body.as_ref().unwrap();
        let finger = &body["actions"][0];
        assert_eq!(finger["parameters"]["pointerType"], "touch");
        assert_eq!(finger["actions"][0]["y"], 1536);
        assert_eq!(finger["actions"][2]["y"], 384);
        assert_eq!(finger["actions"][2]["duration"], 500);
        assert_eq!(finger["actions"][3]["type"], "pointerUp");
    }

    #[tokio::test]
    async fn test_screenshot_decodes_base64() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!("iVBORw0KGgo="));

        let bytes = session(&transport).screenshot().await.unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[tokio::test]
    async fn test_window_size_from_rect() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!({ "x": 0, "y": 0, "width": 1080, "height": 1920 }));

        let size = session(&transport).window_size().await.unwrap();
        assert_eq!(size, WindowSize::new(1080.0, 1920.0));
    }

    #[tokio::test]
    async fn test_displayed_rejects_non_boolean() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!("yes"));

        let result = session(&transport)
            .is_displayed(&ElementHandle::new("e"))
            .await;
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[tokio::test]
    async fn test_text_and_source_reject_non_string() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!({ "text": "Views" }));

        let text = session(&transport).text(&ElementHandle::new("e")).await;
        assert!(matches!(text, Err(Error::Internal(_))));

        // nothing queued: the transport answers null
        let source = session(&transport).page_source().await;
        assert!(matches!(source, Err(Error::Internal(_))));
    }

    #[tokio::test]
    async fn test_empty_text_is_not_an_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(json!(""));

        let text = session(&transport).text(&ElementHandle::new("e")).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_quit_deletes_session() {
        let transport = Arc::new(MockTransport::new());
        session(&transport).quit().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].path, "/session/s-1");
    }
}
