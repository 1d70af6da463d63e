//! Droid-Pilot: page-object UI automation for Android apps
//!
//! This library drives Android apps through an Appium server over the W3C
//! WebDriver protocol: explicit waits, resolution-independent swipes, a
//! directional scroll search, page objects and a scenario runner.

pub mod error;
pub mod config;
pub mod telemetry;

pub mod webdriver;
pub mod wait;
pub mod gestures;
pub mod artifacts;
pub mod pages;
pub mod harness;

// Re-exports
pub use error::{Error, Result};

/// Droid-Pilot library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
