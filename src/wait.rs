//! Explicit waits
//!
//! Condition polling on top of a [`WebDriverClient`]. A condition answers
//! `Ok(Some(value))` when satisfied and `Ok(None)` when not yet; absence
//! errors (no such element, stale reference) also count as "not yet", every
//! other error ends the wait immediately.

use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::webdriver::{ElementHandle, Locator, WebDriverClient};
use crate::{Error, Result};

/// Default interval between two condition checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result of a wait whose condition yields raw JSON
///
/// Element references are recognised and resolved here so callers never
/// have to special-case backends that hand back element dictionaries.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    Element(ElementHandle),
    Value(Value),
}

impl From<Value> for WaitOutcome {
    fn from(value: Value) -> Self {
        match ElementHandle::from_value(&value) {
            Some(handle) => {
                debug!("Converting W3C element dictionary to element handle {}", handle);
                WaitOutcome::Element(handle)
            }
            None => WaitOutcome::Value(value),
        }
    }
}

/// Single visibility check without polling
///
/// Absence and "resolved but hidden" both yield `Ok(None)`.
pub async fn probe_visible(
    client: &dyn WebDriverClient,
    locator: &Locator,
) -> Result<Option<ElementHandle>> {
    let element = match client.find_element(locator).await {
        Ok(element) => element,
        Err(e) if e.is_absence() => return Ok(None),
        Err(e) => return Err(e),
    };

    match client.is_displayed(&element).await {
        Ok(true) => Ok(Some(element)),
        Ok(false) => {
            debug!("{} resolved but is not displayed", locator);
            Ok(None)
        }
        Err(e) if e.is_absence() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Condition poller
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `condition` until it yields a value or the timeout elapses
    ///
    /// The condition is always checked at least once, even with a zero timeout.
    pub async fn until<T, F, Fut>(&self, what: &str, mut condition: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match condition().await {
                Ok(Some(value)) => {
                    debug!("{} satisfied after {} checks", what, attempts);
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if e.is_absence() => {
                    debug!("{} not yet satisfied: {}", what, e);
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= self.timeout {
                return Err(Error::timeout(format!(
                    "{} not satisfied within {:?}",
                    what, self.timeout
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Like [`Wait::until`] for conditions returning raw JSON
    pub async fn until_value<F, Fut>(&self, what: &str, condition: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<Value>>>,
    {
        let value = self.until(what, condition).await?;
        Ok(WaitOutcome::from(value))
    }

    /// Wait until the element resolves
    #[instrument(skip(self, client, locator), fields(locator = %locator))]
    pub async fn present(&self, client: &dyn WebDriverClient, locator: &Locator) -> Result<ElementHandle> {
        let what = format!("presence of {}", locator);
        self.until(&what, move || async move {
            let element = client.find_element(locator).await?;
            Ok::<_, Error>(Some(element))
        })
        .await
    }

    /// Wait until the element resolves and is displayed
    #[instrument(skip(self, client, locator), fields(locator = %locator))]
    pub async fn visible(&self, client: &dyn WebDriverClient, locator: &Locator) -> Result<ElementHandle> {
        let what = format!("visibility of {}", locator);
        self.until(&what, move || async move {
            let element = client.find_element(locator).await?;
            let displayed = client.is_displayed(&element).await?;
            Ok::<_, Error>(displayed.then_some(element))
        })
        .await
    }

    /// Wait until the element is displayed and enabled
    #[instrument(skip(self, client, locator), fields(locator = %locator))]
    pub async fn clickable(&self, client: &dyn WebDriverClient, locator: &Locator) -> Result<ElementHandle> {
        let what = format!("clickability of {}", locator);
        self.until(&what, move || async move {
            let element = client.find_element(locator).await?;
            if !client.is_displayed(&element).await? {
                return Ok(None);
            }
            let enabled = client.is_enabled(&element).await?;
            Ok::<_, Error>(enabled.then_some(element))
        })
        .await
    }

    /// Wait until the element is gone or hidden; returns `true` once it is
    #[instrument(skip(self, client, locator), fields(locator = %locator))]
    pub async fn invisible(&self, client: &dyn WebDriverClient, locator: &Locator) -> Result<bool> {
        let what = format!("invisibility of {}", locator);
        self.until(&what, move || async move {
            let element = match client.find_element(locator).await {
                Ok(element) => element,
                Err(e) if e.is_absence() => return Ok(Some(true)),
                Err(e) => return Err(e),
            };

            match client.is_displayed(&element).await {
                Ok(true) => Ok(None),
                Ok(false) => Ok(Some(true)),
                Err(e) if e.is_absence() => Ok(Some(true)),
                Err(e) => Err(e),
            }
        })
        .await
    }
}
