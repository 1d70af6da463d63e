//! WebDriver HTTP transport
//!
//! This module provides the reqwest-based connection to an Appium server.
//! It only frames JSON commands and unwraps the W3C response envelope; all
//! automation semantics stay on the server.

use super::traits::{HttpMethod, WebDriverTransport};
use crate::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP transport implementation
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Server root, without trailing slash
    base_url: String,
    /// Shared HTTP client
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `base_url` - Appium server URL (e.g., "http://127.0.0.1:4723")
    /// * `request_timeout` - Upper bound for a single command round-trip
    pub fn new<S: Into<String>>(base_url: S, request_timeout: Duration) -> Result<Self, Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating WebDriver transport for {}", base_url);

        let client = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Unwrap the `{"value": ...}` envelope, turning W3C error payloads into errors
    fn unwrap_envelope(success: bool, status: u16, body: Value) -> Result<Value, Error> {
        let value = match body {
            Value::Object(mut map) => map.remove("value").unwrap_or(Value::Null),
            Value::Null => Value::Null,
            other => other,
        };

        if let Some(code) = value.get("error").and_then(Value::as_str) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("");
            return Err(Error::from_w3c(code, message));
        }

        if !success {
            return Err(Error::webdriver(
                "unknown error",
                format!("HTTP {} without W3C error payload", status),
            ));
        }

        Ok(value)
    }
}

#[async_trait]
impl WebDriverTransport for HttpTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method.as_str(), url);

        let request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Delete => self.client.delete(&url),
            // POST commands always carry a JSON object, even when empty
            HttpMethod::Post => self
                .client
                .post(&url)
                .json(&body.unwrap_or_else(|| serde_json::json!({}))),
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Self::unwrap_envelope(status.is_success(), status.as_u16(), body)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_success() {
        let value = HttpTransport::unwrap_envelope(true, 200, json!({"value": {"width": 1080}})).unwrap();
        assert_eq!(value["width"], 1080);
    }

    #[test]
    fn test_unwrap_null_value() {
        let value = HttpTransport::unwrap_envelope(true, 200, json!({"value": null})).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_unwrap_w3c_error() {
        let err = HttpTransport::unwrap_envelope(
            false,
            404,
            json!({"value": {"error": "no such element", "message": "not here", "stacktrace": ""}}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(m) if m == "not here"));
    }

    #[test]
    fn test_unwrap_http_failure_without_payload() {
        let err = HttpTransport::unwrap_envelope(false, 502, Value::Null).unwrap_err();
        assert!(matches!(err, Error::WebDriver { .. }));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let transport = HttpTransport::new("http://127.0.0.1:4723/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:4723");
    }
}
