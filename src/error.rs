//! Unified error types for Droid-Pilot

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Droid-Pilot
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reported by the remote WebDriver endpoint
    #[error("WebDriver error ({code}): {message}")]
    WebDriver { code: String, message: String },

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element reference no longer attached to the view hierarchy
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Swipe direction outside up/down/left/right
    #[error("Invalid swipe direction '{0}', expected one of up/down/left/right")]
    InvalidDirection(String),

    /// Unknown locator strategy or malformed locator
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scenario assertion failed
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new WebDriver error from a W3C error code and message
    pub fn webdriver<C: Into<String>, M: Into<String>>(code: C, message: M) -> Self {
        Error::WebDriver {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new session not found error
    pub fn session_not_found<S: Into<String>>(id: S) -> Self {
        Error::SessionNotFound(id.into())
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(what: S) -> Self {
        Error::ElementNotFound(what.into())
    }

    /// Create a new stale element error
    pub fn stale_element<S: Into<String>>(id: S) -> Self {
        Error::StaleElement(id.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new invalid direction error
    pub fn invalid_direction<S: Into<String>>(direction: S) -> Self {
        Error::InvalidDirection(direction.into())
    }

    /// Create a new invalid locator error
    pub fn invalid_locator<S: Into<String>>(msg: S) -> Self {
        Error::InvalidLocator(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new assertion failure
    pub fn assertion_failed<S: Into<String>>(msg: S) -> Self {
        Error::AssertionFailed(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// True when the error only means "the element is not there right now".
    ///
    /// Polling loops treat these as a negative answer and keep going; every
    /// other variant is a real failure and is propagated.
    pub fn is_absence(&self) -> bool {
        matches!(self, Error::ElementNotFound(_) | Error::StaleElement(_))
    }

    /// Map a W3C error code (the `error` field of a failed response) to an error
    pub fn from_w3c(code: &str, message: &str) -> Self {
        match code {
            "no such element" => Error::element_not_found(message),
            "stale element reference" => Error::stale_element(message),
            "invalid session id" => Error::session_not_found(message),
            "timeout" | "script timeout" => Error::timeout(message),
            _ => Error::webdriver(code, message),
        }
    }
}
