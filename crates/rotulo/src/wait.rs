//! Synchronization waits.
//!
//! Every wait has the same shape: poll a condition at a fixed cadence until
//! it holds (`Satisfied`) or the timeout elapses (`TimedOut`). Polling
//! blocks the calling thread; the scenario runs sequentially anyway.
//!
//! Two waits carry bounded recovery: [`Waiter::prepared`] and
//! [`Waiter::document_ready`] may reload the page a configured number of
//! times (one by default) before giving up.

use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::driver::{DriverError, ElementHandle, WebDriver, READY_STATE_SCRIPT};
use crate::element::Element;
use crate::result::{RotuloError, RotuloResult};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Same cadence, half the timeout
    #[must_use]
    pub const fn halved(self) -> Self {
        self.with_timeout(self.timeout_ms / 2)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a satisfied wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition was probed
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Outcome of one probe of a condition
#[derive(Debug)]
pub enum Probe<T> {
    /// Condition holds, carrying its value
    Ready(T),
    /// Condition does not hold yet
    Pending,
    /// The driver failed while probing
    Failed(DriverError),
}

#[derive(Debug)]
enum Polled<T> {
    Satisfied(T, WaitResult),
    TimedOut { last_error: Option<DriverError> },
    Aborted(DriverError),
}

/// What a failed probe does to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    KeepPolling,
    Abort,
}

fn poll<T, F>(options: WaitOptions, waited_for: &str, on_failure: OnFailure, mut probe: F) -> Polled<T>
where
    F: FnMut() -> Probe<T>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut attempts = 0;
    let mut last_error = None;

    loop {
        attempts += 1;
        match probe() {
            Probe::Ready(value) => {
                return Polled::Satisfied(
                    value,
                    WaitResult {
                        elapsed: start.elapsed(),
                        attempts,
                        waited_for: waited_for.to_string(),
                    },
                );
            }
            Probe::Pending => {}
            Probe::Failed(error) => {
                debug!(waited_for, attempts, %error, "probe failed");
                if on_failure == OnFailure::Abort {
                    return Polled::Aborted(error);
                }
                last_error = Some(error);
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Polled::TimedOut { last_error };
        }
        std::thread::sleep(options.poll_interval().min(timeout - elapsed));
    }
}

/// What to do with an alert once it shows up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertAction {
    /// Press OK
    Accept,
    /// Press Cancel
    Dismiss,
}

// =============================================================================
// WAITER
// =============================================================================

/// Waiter for synchronization operations against a driver
#[derive(Debug, Clone, Copy)]
pub struct Waiter<'a> {
    driver: &'a dyn WebDriver,
    options: WaitOptions,
    recovery_attempts: u32,
}

impl<'a> Waiter<'a> {
    /// Create a waiter with explicit options and one recovery attempt
    #[must_use]
    pub fn new(driver: &'a dyn WebDriver, options: WaitOptions) -> Self {
        Self {
            driver,
            options,
            recovery_attempts: 1,
        }
    }

    /// Override the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = timeout_ms;
        self
    }

    /// Override the reload recovery budget
    #[must_use]
    pub const fn with_recovery_attempts(mut self, attempts: u32) -> Self {
        self.recovery_attempts = attempts;
        self
    }

    /// Current options
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    fn timeout_error(&self, options: WaitOptions, waited_for: &str, last: Option<DriverError>) -> RotuloError {
        if let Some(error) = last {
            debug!(waited_for, %error, "last probe failure before timeout");
        }
        RotuloError::timeout(options.timeout_ms, waited_for)
    }

    /// Wait for an arbitrary probe; driver failures count as "not yet"
    pub fn until<T, F>(&self, waited_for: &str, probe: F) -> RotuloResult<T>
    where
        F: FnMut() -> Probe<T>,
    {
        match poll(self.options, waited_for, OnFailure::KeepPolling, probe) {
            Polled::Satisfied(value, _) => Ok(value),
            Polled::TimedOut { last_error } => {
                Err(self.timeout_error(self.options, waited_for, last_error))
            }
            Polled::Aborted(error) => Err(self.timeout_error(self.options, waited_for, Some(error))),
        }
    }

    /// Wait for predicate to return true
    pub fn wait_for_function<F>(&self, mut predicate: F) -> RotuloResult<WaitResult>
    where
        F: FnMut() -> bool,
    {
        let waited_for = "custom function";
        match poll(self.options, waited_for, OnFailure::KeepPolling, || {
            if predicate() {
                Probe::Ready(())
            } else {
                Probe::Pending
            }
        }) {
            Polled::Satisfied((), result) => Ok(result),
            _ => Err(RotuloError::timeout(self.options.timeout_ms, waited_for)),
        }
    }

    fn element_state<F>(&self, element: &Element, check: F) -> Probe<ElementHandle>
    where
        F: Fn(&ElementHandle) -> Result<bool, DriverError>,
    {
        match self.driver.find_element(element.selector()) {
            Ok(handle) => match check(&handle) {
                Ok(true) => Probe::Ready(handle),
                Ok(false) => Probe::Pending,
                Err(e) => Probe::Failed(e),
            },
            Err(e) => Probe::Failed(e),
        }
    }

    /// Wait until the element is displayed
    pub fn visible(&self, element: &Element) -> RotuloResult<ElementHandle> {
        let waited_for = format!("{} to be visible", element.selector());
        self.until(&waited_for, || {
            self.element_state(element, |h| self.driver.is_displayed(h))
        })
    }

    /// Wait until the element is displayed and enabled
    pub fn clickable(&self, element: &Element) -> RotuloResult<ElementHandle> {
        let waited_for = format!("{} to be clickable", element.selector());
        self.until(&waited_for, || {
            self.element_state(element, |h| {
                Ok(self.driver.is_displayed(h)? && self.driver.is_enabled(h)?)
            })
        })
    }

    /// Wait until the element is enabled
    pub fn enabled(&self, element: &Element) -> RotuloResult<ElementHandle> {
        let waited_for = format!("{} to be enabled", element.selector());
        self.until(&waited_for, || {
            self.element_state(element, |h| self.driver.is_enabled(h))
        })
    }

    /// Wait until the element is absent or hidden; staleness counts as gone
    pub fn gone(&self, element: &Element) -> RotuloResult<()> {
        let waited_for = format!("{} to disappear", element.selector());
        self.until(&waited_for, || match self.driver.find_element(element.selector()) {
            Err(e) if e.is_gone() => Probe::Ready(()),
            Err(e) => Probe::Failed(e),
            Ok(handle) => match self.driver.is_displayed(&handle) {
                Ok(false) => Probe::Ready(()),
                Err(e) if e.is_gone() => Probe::Ready(()),
                Ok(true) => Probe::Pending,
                Err(e) => Probe::Failed(e),
            },
        })
    }

    /// Wait until the element no longer matches any node
    pub fn gone_from_dom(&self, element: &Element) -> RotuloResult<()> {
        let waited_for = format!("{} to leave the DOM", element.selector());
        self.until(&waited_for, || match self.driver.find_element(element.selector()) {
            Err(e) if e.is_gone() => Probe::Ready(()),
            Err(e) => Probe::Failed(e),
            Ok(_) => Probe::Pending,
        })
    }

    /// Wait until the page source contains `text`
    pub fn text_in_page(&self, text: &str) -> RotuloResult<()> {
        let waited_for = format!("text '{text}' on the page");
        self.until(&waited_for, || match self.driver.page_source() {
            Ok(source) if source.contains(text) => Probe::Ready(()),
            Ok(_) => Probe::Pending,
            Err(e) => Probe::Failed(e),
        })
    }

    /// Wait until an input's value contains `text`
    pub fn text_in_input(&self, element: &Element, text: &str) -> RotuloResult<()> {
        let waited_for = format!("{} to contain '{text}'", element.selector());
        self.until(&waited_for, || {
            match self.element_state(element, |h| {
                Ok(self
                    .driver
                    .attribute(h, "value")?
                    .is_some_and(|v| v.contains(text)))
            }) {
                Probe::Ready(_) => Probe::Ready(()),
                Probe::Pending => Probe::Pending,
                Probe::Failed(e) => Probe::Failed(e),
            }
        })
    }

    /// Wait for a window handle not present in `baseline`
    pub fn new_window(&self, baseline: &[String]) -> RotuloResult<String> {
        self.until("a new window", || match self.driver.window_handles() {
            Ok(handles) => handles
                .into_iter()
                .find(|h| !baseline.contains(h))
                .map_or(Probe::Pending, Probe::Ready),
            Err(e) => Probe::Failed(e),
        })
    }

    /// Wait for an alert, check its text, then accept or dismiss it
    ///
    /// An empty `expected` skips the text check. Returns the alert text.
    pub fn alert(&self, expected: &str, action: AlertAction) -> RotuloResult<String> {
        let text = self.until("an alert", || match self.driver.alert_text() {
            Ok(text) => Probe::Ready(text),
            Err(DriverError::NoAlert) => Probe::Pending,
            Err(e) => Probe::Failed(e),
        })?;

        if !expected.is_empty() && text != expected {
            return Err(RotuloError::assertion(format!(
                "alert text '{text}' does not match expected '{expected}'"
            )));
        }

        let handled = match action {
            AlertAction::Accept => self.driver.accept_alert(),
            AlertAction::Dismiss => self.driver.dismiss_alert(),
        };
        handled.map_err(|e| {
            debug!(%e, "alert vanished before it could be handled");
            RotuloError::assertion(format!("alert '{text}' closed before it could be handled"))
        })?;
        Ok(text)
    }

    /// Wait for `document.readyState == "complete"`
    ///
    /// A failing readiness query triggers a reload and a fresh wait, as long
    /// as recovery attempts remain.
    pub fn document_ready(&self) -> RotuloResult<WaitResult> {
        let waited_for = "document to be ready";
        let mut remaining = self.recovery_attempts;

        loop {
            let outcome = poll(self.options, waited_for, OnFailure::Abort, || {
                match self.driver.execute_script(READY_STATE_SCRIPT) {
                    Ok(state) if state.as_str() == Some("complete") => Probe::Ready(()),
                    Ok(_) => Probe::Pending,
                    Err(e) => Probe::Failed(e),
                }
            });

            match outcome {
                Polled::Satisfied((), result) => return Ok(result),
                Polled::Aborted(error) if remaining > 0 => {
                    remaining -= 1;
                    warn!(%error, remaining, "readiness check failed, reloading page");
                    self.reload()?;
                }
                Polled::Aborted(error) => {
                    return Err(self.timeout_error(self.options, waited_for, Some(error)));
                }
                Polled::TimedOut { last_error } => {
                    return Err(self.timeout_error(self.options, waited_for, last_error));
                }
            }
        }
    }

    /// Wait for a page's anchor element
    ///
    /// The first attempt gets half the timeout. Each recovery attempt
    /// reloads the page and waits the full timeout.
    pub fn prepared(&self, anchor: &Element) -> RotuloResult<ElementHandle> {
        let waited_for = format!("{} to be visible (page readiness)", anchor.selector());
        let mut probe = || self.element_state(anchor, |h| self.driver.is_displayed(h));

        let mut options = self.options.halved();
        let mut remaining = self.recovery_attempts;
        loop {
            let last_error = match poll(options, &waited_for, OnFailure::KeepPolling, &mut probe) {
                Polled::Satisfied(handle, _) => return Ok(handle),
                Polled::TimedOut { last_error } => last_error,
                Polled::Aborted(error) => Some(error),
            };
            if remaining == 0 {
                return Err(self.timeout_error(options, &waited_for, last_error));
            }
            remaining -= 1;
            warn!(anchor = %anchor.selector(), remaining, "page not prepared, reloading");
            self.reload()?;
            options = self.options;
        }
    }

    fn reload(&self) -> RotuloResult<()> {
        self.driver.reload().map_err(|e| {
            debug!(%e, "reload failed");
            RotuloError::init(format!("page reload failed: {e}"))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
