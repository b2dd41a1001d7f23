//! WebDriver - Abstract Browser Automation Trait
//!
//! The engine never talks to a browser directly. Anything that can find
//! nodes, click them and report window/alert state implements [`WebDriver`]:
//! a WebDriver client, a CDP bridge, a mobile driver, or the in-memory
//! [`MockDriver`] used by the test suite.
//!
//! The trait is synchronous: waits block the scenario thread between polls.

use crate::element::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Result type for driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Failures reported by a driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// No node matches the selector
    #[error("no such element: {0}")]
    NoSuchElement(String),
    /// The node behind a handle was detached from the document
    #[error("stale element reference: {0}")]
    StaleElement(String),
    /// No alert is open
    #[error("no alert open")]
    NoAlert,
    /// Script evaluation failed
    #[error("script failed: {0}")]
    Script(String),
    /// Navigation failed
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// Target URL
        url: String,
        /// Error message
        message: String,
    },
    /// Any other driver failure
    #[error("driver error: {0}")]
    Other(String),
}

impl DriverError {
    /// The node is gone: detached or no longer matched
    #[must_use]
    pub const fn is_gone(&self) -> bool {
        matches!(self, Self::NoSuchElement(_) | Self::StaleElement(_))
    }
}

/// Element handle for DOM interactions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier of the live node
    pub id: String,
    /// Element tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// Abstract driver trait for browser automation
pub trait WebDriver: Send + Sync + std::fmt::Debug {
    /// Find the live node for a selector
    fn find_element(&self, selector: &Selector) -> DriverResult<ElementHandle>;

    /// Click a node
    fn click(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Type text into a node
    fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()>;

    /// Clear an input node
    fn clear(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Whether a node is displayed
    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether a node is enabled
    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Visible text of a node
    fn text(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Attribute or property value of a node
    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;

    /// Handles of all open windows/tabs
    fn window_handles(&self) -> DriverResult<Vec<String>>;

    /// Navigate to URL
    fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Current URL, if the browser has one
    fn current_url(&self) -> DriverResult<Option<String>>;

    /// Reload page
    fn reload(&self) -> DriverResult<()>;

    /// Text of the open alert
    fn alert_text(&self) -> DriverResult<String>;

    /// Accept the open alert
    fn accept_alert(&self) -> DriverResult<()>;

    /// Dismiss the open alert
    fn dismiss_alert(&self) -> DriverResult<()>;

    /// Execute JavaScript in page context
    fn execute_script(&self, script: &str) -> DriverResult<serde_json::Value>;

    /// Full page source
    fn page_source(&self) -> DriverResult<String>;
}

/// Script used to query document readiness
pub const READY_STATE_SCRIPT: &str = "return document.readyState";

/// A scripted node inside [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Tag name reported by handles
    pub tag_name: String,
    /// Whether the node is attached to the document
    pub present: bool,
    /// Whether the node is displayed
    pub displayed: bool,
    /// Whether the node is enabled
    pub enabled: bool,
    /// Visible text
    pub text: String,
    /// Input value
    pub value: String,
    /// Becomes displayed after the next reload
    pub shown_after_reload: bool,
    stale_on: Option<&'static str>,
    generation: u32,
}

impl MockElement {
    /// A present, displayed, enabled node
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            present: true,
            displayed: true,
            enabled: true,
            text: String::new(),
            value: String::new(),
            shown_after_reload: false,
            stale_on: None,
            generation: 0,
        }
    }

    /// Set visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set displayed flag
    #[must_use]
    pub const fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Set enabled flag
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Hidden until the page reloads
    #[must_use]
    pub const fn shown_after_reload(mut self) -> Self {
        self.displayed = false;
        self.shown_after_reload = true;
        self
    }

    /// Re-rendered right before the next `call` (e.g. `"click"`), which
    /// then fails with a stale reference
    #[must_use]
    pub const fn goes_stale_on(mut self, call: &'static str) -> Self {
        self.stale_on = Some(call);
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: Option<String>,
    elements: HashMap<Selector, MockElement>,
    windows: Vec<String>,
    alert: Option<String>,
    ready_state: String,
    scripts_fail_until_reload: bool,
    reloads: u32,
    page_text: String,
    js_results: Vec<serde_json::Value>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing
///
/// All methods take `&self`, so one `Arc<MockDriver>` can be handed to a
/// session while the test keeps another clone to change page state from a
/// helper thread.
#[derive(Debug)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create new mock driver with one window and a complete document
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                windows: vec!["main".to_string()],
                ready_state: "complete".to_string(),
                ..MockState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // a panicking test thread must not wedge the others
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Add or replace a mock node
    pub fn add_element(&self, selector: Selector, element: MockElement) {
        let _ = self.state().elements.insert(selector, element);
    }

    /// Mutate a mock node in place
    pub fn update_element<F: FnOnce(&mut MockElement)>(&self, selector: &Selector, f: F) {
        if let Some(element) = self.state().elements.get_mut(selector) {
            f(element);
        }
    }

    /// Detach a node: it no longer matches, old handles go stale
    pub fn remove_element(&self, selector: &Selector) {
        self.update_element(selector, |e| {
            e.present = false;
            e.generation += 1;
        });
    }

    /// Re-render a node: same selector, new live node
    pub fn replace_element(&self, selector: &Selector) {
        self.update_element(selector, |e| e.generation += 1);
    }

    /// Set current URL without recording a navigation
    pub fn set_url(&self, url: impl Into<String>) {
        self.state().url = Some(url.into());
    }

    /// Open a new window/tab
    pub fn open_window(&self, handle: impl Into<String>) {
        self.state().windows.push(handle.into());
    }

    /// Open an alert
    pub fn open_alert(&self, message: impl Into<String>) {
        self.state().alert = Some(message.into());
    }

    /// Whether an alert is open
    #[must_use]
    pub fn alert_open(&self) -> bool {
        self.state().alert.is_some()
    }

    /// Set `document.readyState`
    pub fn set_ready_state(&self, state: impl Into<String>) {
        self.state().ready_state = state.into();
    }

    /// Make every script fail until the next reload
    pub fn fail_scripts_until_reload(&self) {
        self.state().scripts_fail_until_reload = true;
    }

    /// Set the page text
    pub fn set_page_text(&self, text: impl Into<String>) {
        self.state().page_text = text.into();
    }

    /// Queue a result for the next non-readiness script
    pub fn push_js_result(&self, result: serde_json::Value) {
        self.state().js_results.push(result);
    }

    /// Number of reloads performed
    #[must_use]
    pub fn reloads(&self) -> u32 {
        self.state().reloads
    }

    /// Input value of a node
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.state().elements.get(selector).map(|e| e.value.clone())
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_history.iter().any(|c| c.starts_with(method))
    }

    fn record(&self, call: String) {
        self.state().call_history.push(call);
    }

    fn with_live<T>(
        &self,
        call: &str,
        handle: &ElementHandle,
        f: impl FnOnce(&mut MockElement) -> T,
    ) -> DriverResult<T> {
        let mut state = self.state();
        let (selector, generation) = parse_handle(&handle.id)
            .ok_or_else(|| DriverError::StaleElement(handle.id.clone()))?;
        let live = state
            .elements
            .iter_mut()
            .find(|(s, _)| s.to_string() == selector)
            .map(|(_, e)| e);
        match live {
            Some(e) if e.stale_on == Some(call) => {
                e.stale_on = None;
                e.generation += 1;
                Err(DriverError::StaleElement(handle.id.clone()))
            }
            Some(e) if e.present && e.generation == generation => Ok(f(e)),
            _ => Err(DriverError::StaleElement(handle.id.clone())),
        }
    }
}

fn parse_handle(id: &str) -> Option<(&str, u32)> {
    let (selector, generation) = id.rsplit_once('#')?;
    Some((selector, generation.parse().ok()?))
}

impl WebDriver for MockDriver {
    fn find_element(&self, selector: &Selector) -> DriverResult<ElementHandle> {
        let state = self.state();
        match state.elements.get(selector) {
            Some(e) if e.present => Ok(ElementHandle::new(
                format!("{selector}#{}", e.generation),
                e.tag_name.clone(),
            )),
            _ => Err(DriverError::NoSuchElement(selector.to_string())),
        }
    }

    fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        self.with_live("click", element, |_| ())?;
        self.record(format!("click:{}", element.id));
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> DriverResult<()> {
        self.with_live("send_keys", element, |e| e.value.push_str(text))?;
        self.record(format!("send_keys:{}:{text}", element.id));
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> DriverResult<()> {
        self.with_live("clear", element, |e| e.value.clear())?;
        self.record(format!("clear:{}", element.id));
        Ok(())
    }

    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.with_live("is_displayed", element, |e| e.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool> {
        self.with_live("is_enabled", element, |e| e.enabled)
    }

    fn text(&self, element: &ElementHandle) -> DriverResult<String> {
        self.with_live("text", element, |e| e.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        self.with_live("attribute", element, |e| match name {
            "value" => Some(e.value.clone()),
            "textContent" | "innerText" => Some(e.text.clone()),
            _ => None,
        })
    }

    fn window_handles(&self) -> DriverResult<Vec<String>> {
        Ok(self.state().windows.clone())
    }

    fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(format!("navigate:{url}"));
        self.state().url = Some(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> DriverResult<Option<String>> {
        Ok(self.state().url.clone())
    }

    fn reload(&self) -> DriverResult<()> {
        self.record("reload".to_string());
        let mut state = self.state();
        state.reloads += 1;
        state.scripts_fail_until_reload = false;
        for element in state.elements.values_mut() {
            if element.shown_after_reload {
                element.displayed = true;
                element.shown_after_reload = false;
            }
        }
        Ok(())
    }

    fn alert_text(&self) -> DriverResult<String> {
        self.state().alert.clone().ok_or(DriverError::NoAlert)
    }

    fn accept_alert(&self) -> DriverResult<()> {
        self.state().alert.take().ok_or(DriverError::NoAlert)?;
        self.record("accept_alert".to_string());
        Ok(())
    }

    fn dismiss_alert(&self) -> DriverResult<()> {
        self.state().alert.take().ok_or(DriverError::NoAlert)?;
        self.record("dismiss_alert".to_string());
        Ok(())
    }

    fn execute_script(&self, script: &str) -> DriverResult<serde_json::Value> {
        let mut state = self.state();
        if state.scripts_fail_until_reload {
            return Err(DriverError::Script("page is not responding".to_string()));
        }
        if script == READY_STATE_SCRIPT {
            return Ok(serde_json::Value::String(state.ready_state.clone()));
        }
        if state.js_results.is_empty() {
            return Err(DriverError::Script("no mock JS result set".to_string()));
        }
        Ok(state.js_results.remove(0))
    }

    fn page_source(&self) -> DriverResult<String> {
        Ok(self.state().page_text.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod mock_driver_tests {
        use super::*;

        #[test]
        fn test_find_missing_element() {
            let driver = MockDriver::new();
            let err = driver.find_element(&Selector::id("nope")).unwrap_err();
            assert!(err.is_gone());
        }

        #[test]
        fn test_find_and_click() {
            let driver = MockDriver::new();
            driver.add_element(Selector::id("go"), MockElement::new("button"));
            let handle = driver.find_element(&Selector::id("go")).unwrap();
            assert_eq!(handle.tag_name, "button");
            driver.click(&handle).unwrap();
            assert!(driver.was_called("click"));
        }

        #[test]
        fn test_replaced_element_goes_stale() {
            let driver = MockDriver::new();
            let selector = Selector::id("row");
            driver.add_element(selector.clone(), MockElement::new("tr"));
            let old = driver.find_element(&selector).unwrap();
            driver.replace_element(&selector);
            assert_eq!(
                driver.is_displayed(&old),
                Err(DriverError::StaleElement(old.id.clone()))
            );
            let fresh = driver.find_element(&selector).unwrap();
            assert!(driver.is_displayed(&fresh).unwrap());
        }

        #[test]
        fn test_removed_element_not_found() {
            let driver = MockDriver::new();
            let selector = Selector::id("toast");
            driver.add_element(selector.clone(), MockElement::new("div"));
            driver.remove_element(&selector);
            assert!(driver.find_element(&selector).is_err());
        }

        #[test]
        fn test_send_keys_and_clear() {
            let driver = MockDriver::new();
            let selector = Selector::name("q");
            driver.add_element(selector.clone(), MockElement::new("input"));
            let handle = driver.find_element(&selector).unwrap();
            driver.send_keys(&handle, "rust").unwrap();
            assert_eq!(driver.value_of(&selector), Some("rust".to_string()));
            assert_eq!(
                driver.attribute(&handle, "value").unwrap(),
                Some("rust".to_string())
            );
            driver.clear(&handle).unwrap();
            assert_eq!(driver.value_of(&selector), Some(String::new()));
        }

        #[test]
        fn test_alert_lifecycle() {
            let driver = MockDriver::new();
            assert_eq!(driver.alert_text(), Err(DriverError::NoAlert));
            driver.open_alert("Saved");
            assert_eq!(driver.alert_text().unwrap(), "Saved");
            driver.accept_alert().unwrap();
            assert!(!driver.alert_open());
        }

        #[test]
        fn test_ready_state_and_failures() {
            let driver = MockDriver::new();
            assert_eq!(
                driver.execute_script(READY_STATE_SCRIPT).unwrap(),
                serde_json::json!("complete")
            );
            driver.fail_scripts_until_reload();
            assert!(driver.execute_script(READY_STATE_SCRIPT).is_err());
            driver.reload().unwrap();
            assert!(driver.execute_script(READY_STATE_SCRIPT).is_ok());
            assert_eq!(driver.reloads(), 1);
        }

        #[test]
        fn test_reload_reveals_element() {
            let driver = MockDriver::new();
            let selector = Selector::id("banner");
            driver.add_element(selector.clone(), MockElement::new("div").shown_after_reload());
            let handle = driver.find_element(&selector).unwrap();
            assert!(!driver.is_displayed(&handle).unwrap());
            driver.reload().unwrap();
            assert!(driver.is_displayed(&handle).unwrap());
        }

        #[test]
        fn test_navigate_history() {
            let driver = MockDriver::new();
            assert_eq!(driver.current_url().unwrap(), None);
            driver.navigate("https://shop.test/cart").unwrap();
            assert_eq!(
                driver.current_url().unwrap().as_deref(),
                Some("https://shop.test/cart")
            );
            assert_eq!(driver.history(), vec!["navigate:https://shop.test/cart"]);
        }

        #[test]
        fn test_js_results_queue() {
            let driver = MockDriver::new();
            assert!(driver.execute_script("return 1").is_err());
            driver.push_js_result(serde_json::json!(1));
            assert_eq!(driver.execute_script("return 1").unwrap(), serde_json::json!(1));
        }
    }

    #[test]
    fn test_driver_error_is_gone() {
        assert!(DriverError::StaleElement("x".into()).is_gone());
        assert!(DriverError::NoSuchElement("x".into()).is_gone());
        assert!(!DriverError::NoAlert.is_gone());
    }
}
