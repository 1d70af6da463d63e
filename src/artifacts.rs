//! Screenshot artifacts
//!
//! Screenshots are written as `{prefix}_{YYYYmmdd_HHMMSS_mmm}.png` so that
//! repeated captures of the same failure never overwrite each other.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::webdriver::WebDriverClient;
use crate::Result;

/// Writes screenshots into one directory
#[derive(Debug, Clone)]
pub struct ScreenshotRecorder {
    dir: PathBuf,
}

impl ScreenshotRecorder {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Timestamped file name for `prefix`
    pub fn file_name(prefix: &str) -> String {
        format!("{}_{}.png", prefix, Local::now().format("%Y%m%d_%H%M%S_%3f"))
    }

    /// Capture the current screen of `client`
    pub async fn capture(&self, client: &dyn WebDriverClient, prefix: &str) -> Result<PathBuf> {
        let png = client.screenshot().await?;
        let path = self.save(prefix, &png).await?;
        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }

    /// Write already captured PNG bytes
    pub async fn save(&self, prefix: &str, png: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(Self::file_name(prefix));
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }
}
