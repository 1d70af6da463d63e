//! Scenario catalogue
//!
//! Each scenario drives one page-object flow from the home screen and
//! checks its result.

use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::pages::{AlertDialogsPage, BasePage, PhotosPage, TextFieldsPage, ViewsPage};
use crate::{Error, Result};

/// Swipe budget for reaching the last photo
const PHOTO_MAX_SWIPES: u32 = 8;

/// Bundled end-to-end scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    ViewsNavigation,
    TextFieldsInput,
    AlertDialogsClose,
    PhotosSwipe,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::ViewsNavigation,
        Scenario::TextFieldsInput,
        Scenario::AlertDialogsClose,
        Scenario::PhotosSwipe,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ViewsNavigation => "views_navigation",
            Scenario::TextFieldsInput => "text_fields_input",
            Scenario::AlertDialogsClose => "alert_dialogs_close",
            Scenario::PhotosSwipe => "photos_swipe",
        }
    }

    /// Run the scenario body on an open session
    pub async fn execute(self, base: BasePage, config: &Config) -> Result<()> {
        match self {
            Scenario::ViewsNavigation => {
                let label = ViewsPage::new(base).open().await?;
                ensure(
                    label.contains("Chronometer"),
                    format!("'Chronometer' not found on Views page, got '{}'", label),
                )
            }
            Scenario::TextFieldsInput => {
                ViewsPage::new(base.clone()).open().await?;
                let typed = TextFieldsPage::new(base).enter_text(&config.input_text).await?;
                ensure(
                    typed.contains(&config.input_text),
                    format!(
                        "text field should contain '{}', actual '{}'",
                        config.input_text, typed
                    ),
                )
            }
            Scenario::AlertDialogsClose => {
                let closed = AlertDialogsPage::new(base).open_and_dismiss().await?;
                ensure(closed, "alert dialog still visible after OK")
            }
            Scenario::PhotosSwipe => {
                ViewsPage::new(base.clone()).open().await?;
                let photos = PhotosPage::new(base);
                photos.open().await?;
                let reached = photos.swipe_to_last_photo(PHOTO_MAX_SWIPES).await?;
                ensure(
                    reached,
                    format!("last photo not reached within {} swipes", PHOTO_MAX_SWIPES),
                )
            }
        }
    }
}

fn ensure<S: Into<String>>(condition: bool, message: S) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::assertion_failed(message))
    }
}

impl std::str::FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Unknown scenario '{}', expected one of: {}",
                    s,
                    Scenario::ALL.map(|sc| sc.name()).join(", ")
                ))
            })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one scenario run
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    /// Failure message when the scenario did not pass
    pub error: Option<String>,
    /// Screenshot captured at the point of failure
    pub screenshot: Option<std::path::PathBuf>,
    pub duration: Duration,
}

impl ScenarioOutcome {
    pub(crate) fn log(&self) {
        if self.passed {
            info!("Scenario {} passed in {:?}", self.name, self.duration);
        } else {
            warn!(
                "Scenario {} failed in {:?}: {}",
                self.name,
                self.duration,
                self.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
