//! Configuration management for Droid-Pilot
//!
//! One configuration surface covers both local emulator runs and cloud
//! device farms; the difference between the two is expressed by
//! [`Profile`] instead of separate configuration files.

use crate::webdriver::types::{By, Locator};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Explicit wait floor for cloud device farms, in seconds
const CLOUD_MIN_TIMEOUT_SECS: u64 = 30;

/// `newCommandTimeout` floor for cloud device farms, in seconds
const CLOUD_MIN_NEW_COMMAND_TIMEOUT: u64 = 120;

const ENV_PREFIX: &str = "DROID_";

/// Device serial override, kept apart from the nested capability keys
const UDID_VAR: &str = "DROID_UDID";

/// Execution environment of the device under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Local emulator or USB device behind a local Appium server
    #[default]
    Local,
    /// Hosted device farm; slower round-trips, longer timeouts
    Cloud,
}

impl std::str::FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Profile::Local),
            "cloud" => Ok(Profile::Cloud),
            other => Err(Error::configuration(format!("Unknown profile: {}", other))),
        }
    }
}

/// Defaults for the directional scroll search
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollDefaults {
    /// Maximum number of swipes per search
    pub max_swipes: u32,

    /// Swipe gesture duration in milliseconds
    pub duration_ms: u64,

    /// Settle pause after each swipe in milliseconds
    pub pause_ms: u64,
}

impl Default for ScrollDefaults {
    fn default() -> Self {
        Self {
            max_swipes: 10,
            duration_ms: 500,
            pause_ms: 500,
        }
    }
}

/// Suite configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Appium server URL
    pub remote_url: String,

    /// Execution profile
    pub profile: Profile,

    /// Capabilities sent when a session is created
    pub capabilities: Map<String, Value>,

    /// Explicit wait timeout in seconds
    pub timeout_secs: u64,

    /// Implicit wait applied to every new session, in seconds
    pub implicit_timeout_secs: u64,

    /// HTTP request timeout per WebDriver command, in seconds
    pub request_timeout_secs: u64,

    /// Text typed by the text field scenario
    pub input_text: String,

    /// Element that identifies the app's home screen
    pub home_locator: Locator,

    /// Maximum back presses while returning to the home screen
    pub max_return_times: u32,

    /// Screenshot directory
    pub screenshot_dir: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Scroll search defaults
    pub scroll: ScrollDefaults,
}

/// Capabilities for the ApiDemos app on a local emulator
fn default_capabilities() -> Map<String, Value> {
    let caps = serde_json::json!({
        "platformName": "Android",
        "appium:deviceName": "LDPlayer",
        "appium:appPackage": "io.appium.android.apis",
        "appium:appActivity": "io.appium.android.apis.ApiDemos",
        "appium:automationName": "UiAutomator2",
        "appium:noReset": false,
        "appium:udid": "emulator-5554",
        "appium:newCommandTimeout": 30
    });

    match caps {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: "http://127.0.0.1:4723".to_string(),
            profile: Profile::Local,
            capabilities: default_capabilities(),
            timeout_secs: 15,
            implicit_timeout_secs: 10,
            request_timeout_secs: 60,
            input_text: "Today is a sunny day!".to_string(),
            home_locator: Locator::new(
                By::XPath,
                "//android.widget.TextView[@text='Accessibility']",
            ),
            max_return_times: 5,
            screenshot_dir: PathBuf::from("screenshots"),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            scroll: ScrollDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults and `DROID_*` variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration by layering defaults, an optional file and `DROID_*` variables
    ///
    /// Nested keys use a double underscore, e.g. `DROID_SCROLL__MAX_SWIPES=4`.
    /// `DROID_UDID` overrides the `appium:udid` capability.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let vars = env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        Self::load_with_env(path, vars)
    }

    fn load_with_env(path: Option<&str>, vars: config::Map<String, String>) -> Result<Self> {
        let udid = vars.get(UDID_VAR).cloned();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let layered = builder
            .add_source(
                config::Environment::with_prefix("DROID")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .build()
            .map_err(|e| Error::configuration(format!("Failed to load config: {}", e)))?;

        let mut config: Config = layered
            .try_deserialize()
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        if let Some(udid) = udid {
            config
                .capabilities
                .insert("appium:udid".to_string(), Value::String(udid));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every scenario fail in a confusing way
    pub fn validate(&self) -> Result<()> {
        if self.remote_url.trim().is_empty() {
            return Err(Error::configuration("remote_url must not be empty"));
        }

        if !self.remote_url.starts_with("http://") && !self.remote_url.starts_with("https://") {
            return Err(Error::configuration(format!(
                "remote_url must be an http(s) URL: {}",
                self.remote_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::configuration("timeout_secs must be positive"));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::configuration("request_timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Explicit wait timeout, raised to the cloud floor for hosted devices
    pub fn wait_timeout(&self) -> Duration {
        let secs = match self.profile {
            Profile::Local => self.timeout_secs,
            Profile::Cloud => self.timeout_secs.max(CLOUD_MIN_TIMEOUT_SECS),
        };
        Duration::from_secs(secs)
    }

    /// Implicit wait applied to new sessions
    pub fn implicit_timeout(&self) -> Duration {
        Duration::from_secs(self.implicit_timeout_secs)
    }

    /// HTTP timeout per command
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Capabilities for a fresh, isolated session
    ///
    /// `noReset` is always forced off so each scenario starts from a clean app.
    pub fn session_capabilities(&self) -> Map<String, Value> {
        let mut caps = self.capabilities.clone();

        caps.remove("noReset");
        caps.insert("appium:noReset".to_string(), Value::Bool(false));

        if self.profile == Profile::Cloud {
            let key = if caps.contains_key("newCommandTimeout") {
                "newCommandTimeout"
            } else {
                "appium:newCommandTimeout"
            };
            let current = caps.get(key).and_then(Value::as_u64).unwrap_or(0);
            caps.insert(
                key.to_string(),
                Value::from(current.max(CLOUD_MIN_NEW_COMMAND_TIMEOUT)),
            );
        }

        caps
    }
}
