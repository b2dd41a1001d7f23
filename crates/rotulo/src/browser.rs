//! Browser facade handed to page actions.
//!
//! Bundles the shared driver with the harness configuration and exposes
//! synchronized interactions: every click waits for clickability, every
//! fill waits for visibility. Driver failures are converted here.

use crate::config::HarnessConfig;
use crate::driver::{DriverError, ElementHandle, WebDriver};
use crate::element::Element;
use crate::result::{RotuloError, RotuloResult};
use crate::wait::{WaitOptions, Waiter};
use std::sync::Arc;
use tracing::debug;

/// Convert a driver failure into the crate's vocabulary
///
/// A vanished node is `NotFound`; anything else is a broken driver and
/// fails the step as `InitializationFailure`.
pub(crate) fn from_driver(error: DriverError, element: &Element) -> RotuloError {
    debug!(%error, selector = %element.selector(), "driver call failed");
    if error.is_gone() {
        RotuloError::not_found("element", element.selector().to_string(), "")
    } else {
        RotuloError::init(format!("driver failed on {}: {error}", element.selector()))
    }
}

/// Driver plus configuration
#[derive(Debug, Clone)]
pub struct Browser {
    driver: Arc<dyn WebDriver>,
    config: Arc<HarnessConfig>,
}

impl Browser {
    /// Create a browser facade
    #[must_use]
    pub fn new(driver: Arc<dyn WebDriver>, config: HarnessConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn WebDriver {
        self.driver.as_ref()
    }

    /// Harness configuration
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Waiter using the configured default timeout
    #[must_use]
    pub fn wait(&self) -> Waiter<'_> {
        self.wait_for(self.config.default_timeout_ms)
    }

    /// Waiter with an explicit timeout
    #[must_use]
    pub fn wait_for(&self, timeout_ms: u64) -> Waiter<'_> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(self.config.poll_interval_ms);
        Waiter::new(self.driver.as_ref(), options)
            .with_recovery_attempts(self.config.reload_recovery_attempts)
    }

    /// Find the live node behind a proxy, without waiting
    pub fn find(&self, element: &Element) -> RotuloResult<ElementHandle> {
        self.driver
            .find_element(element.selector())
            .map_err(|e| from_driver(e, element))
    }

    /// Whether the element is currently displayed; absence reads as false
    #[must_use]
    pub fn is_visible(&self, element: &Element) -> bool {
        self.driver
            .find_element(element.selector())
            .and_then(|h| self.driver.is_displayed(&h))
            .unwrap_or(false)
    }

    /// Wait until clickable, then click
    ///
    /// A node replaced between the wait and the click is found again once.
    pub fn click(&self, element: &Element) -> RotuloResult<()> {
        let handle = self.wait().clickable(element)?;
        match self.driver.click(&handle) {
            Err(DriverError::StaleElement(_)) => {
                debug!(selector = %element.selector(), "stale on click, retrying");
                let fresh = self.wait().clickable(element)?;
                self.driver
                    .click(&fresh)
                    .map_err(|e| from_driver(e, element))
            }
            other => other.map_err(|e| from_driver(e, element)),
        }
    }

    /// Wait until visible, clear, then type
    pub fn fill(&self, element: &Element, text: &str) -> RotuloResult<()> {
        let handle = self.wait().visible(element)?;
        self.driver
            .clear(&handle)
            .and_then(|()| self.driver.send_keys(&handle, text))
            .map_err(|e| from_driver(e, element))
    }

    /// Visible text of the element
    pub fn text_of(&self, element: &Element) -> RotuloResult<String> {
        let handle = self.wait().visible(element)?;
        self.driver
            .text(&handle)
            .map_err(|e| from_driver(e, element))
    }

    /// Assert the element's visible text
    pub fn assert_text(&self, element: &Element, expected: &str) -> RotuloResult<()> {
        let actual = self.text_of(element)?;
        if actual == expected {
            Ok(())
        } else {
            Err(RotuloError::assertion(format!(
                "{} has text '{actual}', expected '{expected}'",
                element.selector()
            )))
        }
    }

    /// Current browser URL, if any
    pub fn current_url(&self) -> RotuloResult<Option<String>> {
        self.driver.current_url().map_err(|e| {
            debug!(%e, "current_url failed");
            RotuloError::init(format!("cannot read current URL: {e}"))
        })
    }

    /// Navigate and wait for the document to be ready
    pub fn navigate(&self, url: &str) -> RotuloResult<()> {
        self.driver.navigate(url).map_err(|e| {
            debug!(%e, url, "navigation failed");
            RotuloError::init(format!("navigation to {url} failed: {e}"))
        })?;
        self.wait().document_ready()?;
        Ok(())
    }
}
