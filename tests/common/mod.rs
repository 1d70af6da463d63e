//! Common test utilities
//!
//! This module provides shared configuration helpers for all integration tests.

#![allow(dead_code)]

use droid_pilot::config::{Config, ScrollDefaults};
use std::path::Path;

/// Configuration tuned for scripted devices: short waits, no settle pauses
pub fn fast_config(remote_url: &str, screenshots: &Path) -> Config {
    Config {
        remote_url: remote_url.to_string(),
        timeout_secs: 1,
        implicit_timeout_secs: 2,
        request_timeout_secs: 5,
        screenshot_dir: screenshots.to_path_buf(),
        scroll: ScrollDefaults {
            pause_ms: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// PNG files in `dir`
pub fn png_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.ends_with(".png"))
                .collect()
        })
        .unwrap_or_default()
}
