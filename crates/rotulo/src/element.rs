//! Element proxies held by page objects.
//!
//! An [`Element`] is a lazy proxy: it stores how to find a node, never the
//! node itself. Every interaction asks the driver for a fresh handle, so a
//! node the browser replaced since the last read is found again.
//!
//! Proxies are reference-counted. Cloning shares the proxy, and
//! [`Element::same_as`] compares proxy identity, which is what redirect
//! edges use. `==` compares structure (selector and kind) only.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Visible text selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Element id attribute
    Id(String),
    /// Element name attribute
    Name(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a name selector
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Equivalent CSS/XPath expression, for drivers that only speak those
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) | Self::XPath(s) => s.clone(),
            Self::Text(t) => format!("//*[normalize-space(text())={t:?}]"),
            Self::TestId(id) => format!("[data-testid={id:?}]"),
            Self::Id(id) => format!("#{id}"),
            Self::Name(name) => format!("[name={name:?}]"),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(s) => write!(f, "text={s}"),
            Self::TestId(s) => write!(f, "testid={s}"),
            Self::Id(s) => write!(f, "id={s}"),
            Self::Name(s) => write!(f, "name={s}"),
        }
    }
}

/// Declared kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementKind {
    /// Untyped element
    #[default]
    Plain,
    /// Clickable button
    Button,
    /// Text field
    TextInput,
    /// Hyperlink
    Link,
    /// Check box
    CheckBox,
    /// Data table
    Table,
}

impl ElementKind {
    /// Whether the kind is semantic rather than plain
    #[must_use]
    pub const fn is_typed(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ElementProxy {
    selector: Selector,
    kind: ElementKind,
}

/// A lazily-resolved element proxy
#[derive(Debug, Clone)]
pub struct Element {
    proxy: Arc<ElementProxy>,
}

impl Element {
    /// Create a plain element proxy
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self::typed(selector, ElementKind::Plain)
    }

    /// Create an element proxy of a given kind
    #[must_use]
    pub fn typed(selector: Selector, kind: ElementKind) -> Self {
        Self {
            proxy: Arc::new(ElementProxy { selector, kind }),
        }
    }

    /// Create a button proxy
    #[must_use]
    pub fn button(selector: Selector) -> Self {
        Self::typed(selector, ElementKind::Button)
    }

    /// Create a text input proxy
    #[must_use]
    pub fn text_input(selector: Selector) -> Self {
        Self::typed(selector, ElementKind::TextInput)
    }

    /// Create a link proxy
    #[must_use]
    pub fn link(selector: Selector) -> Self {
        Self::typed(selector, ElementKind::Link)
    }

    /// Create a css-selected plain proxy
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Selector::css(selector))
    }

    /// The selector used to find the live node
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.proxy.selector
    }

    /// Declared kind
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.proxy.kind
    }

    /// Reference identity: true only for clones of the same proxy
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.proxy, &other.proxy)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.proxy == other.proxy
    }
}

impl Eq for Element {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_same_proxy() {
        let a = Element::css("#email");
        let b = a.clone();
        assert!(a.same_as(&b));
    }

    #[test]
    fn test_equal_but_not_identical() {
        let a = Element::css("#email");
        let b = Element::css("#email");
        assert_eq!(a, b);
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Element::button(Selector::id("go")).kind(), ElementKind::Button);
        assert_eq!(
            Element::text_input(Selector::name("q")).kind(),
            ElementKind::TextInput
        );
        assert_eq!(Element::link(Selector::text("Home")).kind(), ElementKind::Link);
        assert!(!Element::css("div").kind().is_typed());
        assert!(ElementKind::Table.is_typed());
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(Selector::css("a.b").to_string(), "css=a.b");
        assert_eq!(Selector::test_id("x").to_string(), "testid=x");
    }

    #[test]
    fn test_selector_to_query() {
        assert_eq!(Selector::id("main").to_query(), "#main");
        assert_eq!(Selector::test_id("go").to_query(), "[data-testid=\"go\"]");
        assert_eq!(Selector::xpath("//a").to_query(), "//a");
        assert!(Selector::text("Pay").to_query().contains("\"Pay\""));
    }
}
