//! WebDriver wire-level data types
//!
//! Locators, geometry and the element-reference shim that turns whatever the
//! remote backend returns into a single [`ElementHandle`] type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::{Error, Result};

/// W3C element reference key
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-28c025000000";

/// Element reference key used by legacy JSON Wire Protocol backends
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Locator strategies accepted by Appium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum By {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "accessibility id")]
    AccessibilityId,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "class name")]
    ClassName,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "-android uiautomator")]
    AndroidUiAutomator,
}

/// Strategy names and the aliases people write in config files
static STRATEGIES: phf::Map<&'static str, By> = phf::phf_map! {
    "id" => By::Id,
    "accessibility id" => By::AccessibilityId,
    "accessibility_id" => By::AccessibilityId,
    "xpath" => By::XPath,
    "class name" => By::ClassName,
    "class_name" => By::ClassName,
    "name" => By::Name,
    "-android uiautomator" => By::AndroidUiAutomator,
    "android_uiautomator" => By::AndroidUiAutomator,
};

impl By {
    /// Strategy name as sent in the `using` field
    pub fn as_str(&self) -> &'static str {
        match self {
            By::Id => "id",
            By::AccessibilityId => "accessibility id",
            By::XPath => "xpath",
            By::ClassName => "class name",
            By::Name => "name",
            By::AndroidUiAutomator => "-android uiautomator",
        }
    }
}

impl std::str::FromStr for By {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        STRATEGIES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| Error::invalid_locator(format!("unknown strategy '{}'", s)))
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (strategy, value) pair identifying a UI element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub value: Cow<'static, str>,
}

impl Locator {
    /// Build a locator; usable in `const` page-object declarations
    pub const fn new(by: By, value: &'static str) -> Self {
        Self {
            by,
            value: Cow::Borrowed(value),
        }
    }

    /// Build a locator from an owned value
    pub fn owned<S: Into<String>>(by: By, value: S) -> Self {
        Self {
            by,
            value: Cow::Owned(value.into()),
        }
    }

    pub const fn id(value: &'static str) -> Self {
        Self::new(By::Id, value)
    }

    pub const fn accessibility_id(value: &'static str) -> Self {
        Self::new(By::AccessibilityId, value)
    }

    pub const fn xpath(value: &'static str) -> Self {
        Self::new(By::XPath, value)
    }

    /// Request body for `POST /element`
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            "using": self.by.as_str(),
            "value": self.value,
        })
    }

    /// Filesystem-friendly form of the value, used in screenshot names
    pub fn slug(&self) -> String {
        self.value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .trim_matches('_')
            .to_string()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.by, self.value)
    }
}

/// Visible viewport of the device under test
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl WindowSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Element geometry as returned by `GET /element/{id}/rect`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Screen coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Resolved element handle used everywhere above the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }

    /// Remote element ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Probe an arbitrary JSON value for an element reference
    ///
    /// Returns `None` when the value is not shaped like an element, which
    /// lets wait conditions pass booleans and strings through untouched.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => reference_id(map).map(Self::new),
            _ => None,
        }
    }

    /// W3C JSON form of this handle, used as an action origin
    pub fn to_wire(&self) -> Value {
        serde_json::json!({
            W3C_ELEMENT_KEY: self.id,
            LEGACY_ELEMENT_KEY: self.id,
        })
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn reference_id(map: &Map<String, Value>) -> Option<String> {
    map.get(W3C_ELEMENT_KEY)
        .or_else(|| map.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Element reference exactly as it arrives from the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireElement {
    /// Bare element ID string
    Raw(String),
    /// Dictionary carrying the ID under a well-known key
    Structured(Map<String, Value>),
}

impl WireElement {
    /// Resolve into the concrete handle type
    pub fn resolve(self) -> Result<ElementHandle> {
        match self {
            WireElement::Raw(id) => Ok(ElementHandle::new(id)),
            WireElement::Structured(map) => reference_id(&map).map(ElementHandle::new).ok_or_else(|| {
                Error::internal(format!(
                    "element reference without '{}' key: {}",
                    W3C_ELEMENT_KEY,
                    Value::Object(map)
                ))
            }),
        }
    }

    /// Decode and resolve a JSON value in one step
    pub fn resolve_value(value: Value) -> Result<ElementHandle> {
        let wire: WireElement = serde_json::from_value(value)?;
        wire.resolve()
    }
}
