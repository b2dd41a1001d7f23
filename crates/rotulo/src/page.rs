//! Declarative page objects.
//!
//! A page type describes itself once through a [`PageManifest`]: its title,
//! URL fragment, titled elements, nested blocks, redirect edges and titled
//! actions. The registry turns the manifest into a descriptor; nothing is
//! discovered by introspection at runtime.
//!
//! # Example
//!
//! ```ignore
//! struct LoginPage {
//!     email: Element,
//!     submit: Element,
//!     header: HeaderBlock,
//! }
//!
//! impl Page for LoginPage {
//!     fn manifest() -> PageManifest<Self> {
//!         PageManifest::<Self>::new("Login")
//!             .url("/login")
//!             .anchor("email")
//!             .element("email", |p| &p.email)
//!             .redirects_to::<DashboardPage>()
//!             .button("submit", |p| &p.submit)
//!             .block("header", |p| &p.header, HeaderBlock::manifest())
//!             .action0(&["submit", "войти"], |p, browser| browser.click(&p.submit))
//!     }
//!
//!     fn open(_browser: &Browser) -> RotuloResult<Self> {
//!         Ok(Self { /* ... */ })
//!     }
//! }
//! ```

use crate::browser::Browser;
use crate::element::{Element, ElementKind};
use crate::result::{RotuloError, RotuloResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

/// A type-erased page (or block) instance
pub type AnyPage = dyn Any + Send;

pub(crate) type ElementAccessor = Arc<dyn Fn(&AnyPage) -> Option<Element> + Send + Sync>;
pub(crate) type ActionInvoker =
    Arc<dyn Fn(&mut AnyPage, &Browser, &ActionArgs) -> RotuloResult<Value> + Send + Sync>;

/// A page object addressable by title
pub trait Page: Any + Send + Sized {
    /// Declarative description of the page
    fn manifest() -> PageManifest<Self>;

    /// Build a fresh instance bound to the browser's current document
    fn open(browser: &Browser) -> RotuloResult<Self>;
}

// =============================================================================
// PAGE KEY
// =============================================================================

/// Identity of a page type, usable without naming the type
#[derive(Clone, Copy)]
pub struct PageKey {
    type_id: TypeId,
    type_name: &'static str,
    manifest: fn() -> ManifestParts,
    open: fn(&Browser) -> RotuloResult<Box<AnyPage>>,
}

fn erased_manifest<P: Page>() -> ManifestParts {
    P::manifest().into_parts()
}

fn open_boxed<P: Page>(browser: &Browser) -> RotuloResult<Box<AnyPage>> {
    Ok(Box::new(P::open(browser)?))
}

impl PageKey {
    /// Key of a page type
    #[must_use]
    pub fn of<P: Page>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
            manifest: erased_manifest::<P>,
            open: open_boxed::<P>,
        }
    }

    /// `TypeId` of the page type
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the page type
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn manifest(&self) -> ManifestParts {
        (self.manifest)()
    }

    pub(crate) fn open(&self, browser: &Browser) -> RotuloResult<Box<AnyPage>> {
        (self.open)(browser)
    }
}

impl PartialEq for PageKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for PageKey {}

impl std::hash::Hash for PageKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Debug for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PageKey").field(&self.type_name).finish()
    }
}

/// Module path of a type name: `shop::pages::Login` -> `shop::pages`
#[must_use]
pub fn namespace_of(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit_once("::").map_or("", |(ns, _)| ns)
}

// =============================================================================
// ACTION ARGUMENTS
// =============================================================================

/// One positional argument of a titled action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionArg {
    /// A single string
    Text(String),
    /// A list of strings
    List(Vec<String>),
    /// A data table (rows of cells)
    Table(Vec<Vec<String>>),
}

impl From<&str> for ActionArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ActionArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ActionArg {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<Vec<String>>> for ActionArg {
    fn from(value: Vec<Vec<String>>) -> Self {
        Self::Table(value)
    }
}

/// Positional arguments handed to an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs(Vec<ActionArg>);

impl ActionArgs {
    /// Wrap positional arguments
    #[must_use]
    pub fn new(args: Vec<ActionArg>) -> Self {
        Self(args)
    }

    /// No arguments
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Text arguments
    #[must_use]
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(|v| ActionArg::Text(v.into())).collect())
    }

    /// Number of arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All arguments
    #[must_use]
    pub fn as_slice(&self) -> &[ActionArg] {
        &self.0
    }

    /// Argument at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActionArg> {
        self.0.get(index)
    }

    /// Text argument at `index`
    pub fn text(&self, index: usize) -> RotuloResult<&str> {
        match self.0.get(index) {
            Some(ActionArg::Text(s)) => Ok(s),
            other => Err(arg_mismatch(index, "text", other)),
        }
    }

    /// List argument at `index`
    pub fn list(&self, index: usize) -> RotuloResult<&[String]> {
        match self.0.get(index) {
            Some(ActionArg::List(items)) => Ok(items),
            other => Err(arg_mismatch(index, "list", other)),
        }
    }

    /// Table argument at `index`
    pub fn table(&self, index: usize) -> RotuloResult<&[Vec<String>]> {
        match self.0.get(index) {
            Some(ActionArg::Table(rows)) => Ok(rows),
            other => Err(arg_mismatch(index, "table", other)),
        }
    }
}

fn arg_mismatch(index: usize, expected: &str, found: Option<&ActionArg>) -> RotuloError {
    let found = match found {
        None => "nothing",
        Some(ActionArg::Text(_)) => "text",
        Some(ActionArg::List(_)) => "list",
        Some(ActionArg::Table(_)) => "table",
    };
    RotuloError::assertion(format!("argument {index}: expected {expected}, got {found}"))
}

impl From<Vec<ActionArg>> for ActionArgs {
    fn from(value: Vec<ActionArg>) -> Self {
        Self(value)
    }
}

// =============================================================================
// MANIFEST ENTRIES
// =============================================================================

#[derive(Clone)]
pub(crate) struct ElementEntry {
    pub(crate) title: String,
    pub(crate) path: Vec<String>,
    pub(crate) kind: ElementKind,
    pub(crate) redirect: Option<PageKey>,
    pub(crate) accessor: ElementAccessor,
}

impl ElementEntry {
    fn lift<P, B>(self, segment: Option<&str>, lens: fn(&P) -> &B) -> Self
    where
        P: Any + Send,
        B: Any + Send,
    {
        let inner = self.accessor;
        let mut path = self.path;
        if let Some(segment) = segment {
            path.insert(0, segment.to_string());
        }
        Self {
            path,
            accessor: Arc::new(move |page: &AnyPage| {
                let page = page.downcast_ref::<P>()?;
                let part: &AnyPage = lens(page);
                inner(part)
            }),
            ..self
        }
    }
}

#[derive(Clone)]
pub(crate) struct BlockEntry {
    pub(crate) title: String,
    pub(crate) elements: Vec<ElementEntry>,
}

#[derive(Clone)]
pub(crate) struct ActionEntry {
    pub(crate) titles: Vec<String>,
    pub(crate) arity: usize,
    pub(crate) owner: &'static str,
    pub(crate) invoker: ActionInvoker,
}

impl ActionEntry {
    fn lift<P, B>(self, lens: fn(&mut P) -> &mut B) -> Self
    where
        P: Any + Send,
        B: Any + Send,
    {
        let inner = self.invoker;
        Self {
            invoker: Arc::new(move |page: &mut AnyPage, browser: &Browser, args: &ActionArgs| {
                let page = page
                    .downcast_mut::<P>()
                    .ok_or_else(|| wrong_instance(type_name::<P>()))?;
                let part: &mut AnyPage = lens(page);
                inner(part, browser, args)
            }),
            ..self
        }
    }
}

fn wrong_instance(expected: &str) -> RotuloError {
    RotuloError::init(format!("page instance is not a {expected}"))
}

/// Type-erased manifest contents
#[derive(Clone, Default)]
pub(crate) struct ManifestParts {
    pub(crate) title: String,
    pub(crate) url: Option<String>,
    pub(crate) anchor: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) elements: Vec<ElementEntry>,
    pub(crate) blocks: Vec<BlockEntry>,
    pub(crate) actions: Vec<ActionEntry>,
    inherited_elements: Vec<ElementEntry>,
    inherited_blocks: Vec<BlockEntry>,
    inherited_actions: Vec<ActionEntry>,
    pub(crate) errors: Vec<String>,
}

impl ManifestParts {
    /// Own entries first, then inherited ones
    pub(crate) fn flatten(mut self) -> Self {
        self.elements.append(&mut self.inherited_elements);
        self.blocks.append(&mut self.inherited_blocks);
        self.actions.append(&mut self.inherited_actions);
        self
    }
}

// =============================================================================
// PAGE MANIFEST
// =============================================================================

/// Builder describing a page type
pub struct PageManifest<P> {
    parts: ManifestParts,
    last_element: Option<usize>,
    last_action: Option<usize>,
    _page: PhantomData<fn() -> P>,
}

impl<P> std::fmt::Debug for PageManifest<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageManifest")
            .field("title", &self.parts.title)
            .field("url", &self.parts.url)
            .field("elements", &self.parts.elements.len())
            .field("blocks", &self.parts.blocks.len())
            .field("actions", &self.parts.actions.len())
            .finish_non_exhaustive()
    }
}

impl<P: Any + Send> PageManifest<P> {
    /// Start a manifest for a page titled `title`
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            parts: ManifestParts {
                title: title.into(),
                ..ManifestParts::default()
            },
            last_element: None,
            last_action: None,
            _page: PhantomData,
        }
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.parts.title
    }

    /// URL fragment used by URL-based navigation
    #[must_use]
    pub fn url(mut self, fragment: impl Into<String>) -> Self {
        self.parts.url = Some(fragment.into());
        self
    }

    /// Title of the element whose visibility means "page is ready"
    #[must_use]
    pub fn anchor(mut self, element_title: impl Into<String>) -> Self {
        self.parts.anchor = Some(element_title.into());
        self
    }

    /// Override the namespace (defaults to the type's module path)
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.parts.namespace = Some(namespace.into());
        self
    }

    /// Declare a plain titled element
    #[must_use]
    pub fn element(self, title: impl Into<String>, field: fn(&P) -> &Element) -> Self {
        self.element_of(title, ElementKind::Plain, field)
    }

    /// Declare a titled button
    #[must_use]
    pub fn button(self, title: impl Into<String>, field: fn(&P) -> &Element) -> Self {
        self.element_of(title, ElementKind::Button, field)
    }

    /// Declare a titled text input
    #[must_use]
    pub fn input(self, title: impl Into<String>, field: fn(&P) -> &Element) -> Self {
        self.element_of(title, ElementKind::TextInput, field)
    }

    /// Declare a titled element of a given kind
    #[must_use]
    pub fn element_of(
        mut self,
        title: impl Into<String>,
        kind: ElementKind,
        field: fn(&P) -> &Element,
    ) -> Self {
        let title = title.into();
        self.parts.elements.push(ElementEntry {
            path: vec![title.clone()],
            title,
            kind,
            redirect: None,
            accessor: Arc::new(move |page: &AnyPage| page.downcast_ref::<P>().map(|p| field(p).clone())),
        });
        self.last_element = Some(self.parts.elements.len() - 1);
        self
    }

    /// Declare a plain titled element whose interaction leads to page `Q`
    #[must_use]
    pub fn element_with_redirect<Q: Page>(
        self,
        title: impl Into<String>,
        field: fn(&P) -> &Element,
    ) -> Self {
        self.element(title, field).redirects_to::<Q>()
    }

    /// Interacting with the element declared just before leads to page `Q`
    #[must_use]
    pub fn redirects_to<Q: Page>(mut self) -> Self {
        match self.last_element {
            Some(index) => self.parts.elements[index].redirect = Some(PageKey::of::<Q>()),
            None => self.parts.errors.push(format!(
                "redirect to {} declared before any element",
                type_name::<Q>()
            )),
        }
        self
    }

    /// Declare a nested block of titled elements
    #[must_use]
    pub fn block<B: Any + Send>(
        mut self,
        title: impl Into<String>,
        field: fn(&P) -> &B,
        manifest: BlockManifest<B>,
    ) -> Self {
        let title = title.into();
        let elements = manifest
            .elements
            .into_iter()
            .map(|entry| entry.lift(Some(title.as_str()), field))
            .collect();
        self.parts.errors.extend(manifest.errors);
        self.parts.blocks.push(BlockEntry { title, elements });
        self.last_element = None;
        self
    }

    /// Inherit everything declared by an embedded base page
    ///
    /// Inherited entries always rank after the page's own entries.
    #[must_use]
    pub fn extends<B: Any + Send>(
        mut self,
        base: PageManifest<B>,
        field: fn(&P) -> &B,
        field_mut: fn(&mut P) -> &mut B,
    ) -> Self {
        let base = base.parts.flatten();
        self.parts.errors.extend(base.errors);
        self.parts
            .inherited_elements
            .extend(base.elements.into_iter().map(|e| e.lift(None, field)));
        self.parts.inherited_blocks.extend(base.blocks.into_iter().map(|b| BlockEntry {
            title: b.title,
            elements: b.elements.into_iter().map(|e| e.lift(None, field)).collect(),
        }));
        self.parts
            .inherited_actions
            .extend(base.actions.into_iter().map(|a| a.lift(field_mut)));
        if self.parts.url.is_none() {
            self.parts.url = base.url;
        }
        if self.parts.anchor.is_none() {
            self.parts.anchor = base.anchor;
        }
        self
    }

    /// Declare a titled action taking `arity` arguments
    #[must_use]
    pub fn action<F>(mut self, titles: &[&str], arity: usize, action: F) -> Self
    where
        F: Fn(&mut P, &Browser, &ActionArgs) -> RotuloResult<Value> + Send + Sync + 'static,
    {
        self.last_element = None;
        if titles.is_empty() {
            self.parts
                .errors
                .push(format!("action with arity {arity} declared without a title"));
            return self;
        }
        let invoker: ActionInvoker = Arc::new(move |page: &mut AnyPage, browser: &Browser, args: &ActionArgs| {
            let page = page
                .downcast_mut::<P>()
                .ok_or_else(|| wrong_instance(type_name::<P>()))?;
            action(page, browser, args)
        });
        self.parts.actions.push(ActionEntry {
            titles: titles.iter().map(|t| (*t).to_string()).collect(),
            arity,
            owner: type_name::<P>(),
            invoker,
        });
        self.last_action = Some(self.parts.actions.len() - 1);
        self
    }

    /// Declare a titled action without arguments and without a result
    #[must_use]
    pub fn action0<F>(self, titles: &[&str], action: F) -> Self
    where
        F: Fn(&mut P, &Browser) -> RotuloResult<()> + Send + Sync + 'static,
    {
        self.action(titles, 0, move |page, browser, _| {
            action(page, browser).map(|()| Value::Null)
        })
    }

    /// Declare a titled action taking one text argument
    #[must_use]
    pub fn action1<F>(self, titles: &[&str], action: F) -> Self
    where
        F: Fn(&mut P, &Browser, &str) -> RotuloResult<()> + Send + Sync + 'static,
    {
        self.action(titles, 1, move |page, browser, args| {
            action(page, browser, args.text(0)?).map(|()| Value::Null)
        })
    }

    /// Add an alias to the last declared action
    #[must_use]
    pub fn alias(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        match self.last_action {
            Some(index) => {
                let titles = &mut self.parts.actions[index].titles;
                if !titles.contains(&title) {
                    titles.push(title);
                }
            }
            None => self
                .parts
                .errors
                .push(format!("alias '{title}' declared before any action")),
        }
        self
    }

    pub(crate) fn into_parts(self) -> ManifestParts {
        self.parts
    }
}

// =============================================================================
// BLOCK MANIFEST
// =============================================================================

/// Builder describing a reusable block of titled elements
pub struct BlockManifest<B> {
    elements: Vec<ElementEntry>,
    errors: Vec<String>,
    _block: PhantomData<fn() -> B>,
}

impl<B> std::fmt::Debug for BlockManifest<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockManifest")
            .field("elements", &self.elements.len())
            .finish_non_exhaustive()
    }
}

impl<B: Any + Send> Default for BlockManifest<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Any + Send> BlockManifest<B> {
    /// Start an empty block manifest
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            errors: Vec::new(),
            _block: PhantomData,
        }
    }

    /// Declare a plain titled element
    #[must_use]
    pub fn element(self, title: impl Into<String>, field: fn(&B) -> &Element) -> Self {
        self.element_of(title, ElementKind::Plain, field)
    }

    /// Declare a titled button
    #[must_use]
    pub fn button(self, title: impl Into<String>, field: fn(&B) -> &Element) -> Self {
        self.element_of(title, ElementKind::Button, field)
    }

    /// Declare a titled element of a given kind
    #[must_use]
    pub fn element_of(
        mut self,
        title: impl Into<String>,
        kind: ElementKind,
        field: fn(&B) -> &Element,
    ) -> Self {
        let title = title.into();
        self.elements.push(ElementEntry {
            path: vec![title.clone()],
            title,
            kind,
            redirect: None,
            accessor: Arc::new(move |block: &AnyPage| block.downcast_ref::<B>().map(|b| field(b).clone())),
        });
        self
    }

    /// Interacting with the element declared just before leads to page `Q`
    #[must_use]
    pub fn redirects_to<Q: Page>(mut self) -> Self {
        match self.elements.last_mut() {
            Some(entry) => entry.redirect = Some(PageKey::of::<Q>()),
            None => self.errors.push(format!(
                "redirect to {} declared before any block element",
                type_name::<Q>()
            )),
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::element::Selector;

    struct Header {
        logout: Element,
    }

    struct Base {
        help: Element,
    }

    struct Login {
        base: Base,
        email: Element,
        header: Header,
    }

    impl Page for Login {
        fn manifest() -> PageManifest<Self> {
            PageManifest::<Self>::new("Login")
                .url("/login")
                .extends(
                    PageManifest::<Base>::new("Base")
                        .element("help", |b| &b.help)
                        .action0(&["help"], |_, _| Ok(())),
                    |p| &p.base,
                    |p| &mut p.base,
                )
                .input("email", |p| &p.email)
                .block(
                    "header",
                    |p| &p.header,
                    BlockManifest::<Header>::new().button("logout", |h| &h.logout),
                )
                .action0(&["submit"], |_, _| Ok(()))
                .alias("войти")
        }

        fn open(_browser: &Browser) -> RotuloResult<Self> {
            Ok(sample())
        }
    }

    fn sample() -> Login {
        Login {
            base: Base {
                help: Element::css("#help"),
            },
            email: Element::css("#email"),
            header: Header {
                logout: Element::css("#logout"),
            },
        }
    }

    #[test]
    fn test_namespace_of() {
        assert_eq!(namespace_of("shop::pages::Login"), "shop::pages");
        assert_eq!(namespace_of("Login"), "");
        assert_eq!(namespace_of("a::Wrapper<b::C>"), "a");
    }

    #[test]
    fn test_own_entries_precede_inherited() {
        let parts = Login::manifest().into_parts().flatten();
        let titles: Vec<_> = parts.elements.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["email", "help"]);
        let actions: Vec<_> = parts.actions.iter().map(|a| a.titles.clone()).collect();
        assert_eq!(actions[0], vec!["submit".to_string(), "войти".to_string()]);
        assert_eq!(actions[1], vec!["help".to_string()]);
    }

    #[test]
    fn test_accessors_read_live_fields() {
        let parts = Login::manifest().into_parts().flatten();
        let page: Box<AnyPage> = Box::new(sample());
        let email = (parts.elements[0].accessor)(page.as_ref()).unwrap();
        assert_eq!(email.selector(), &Selector::css("#email"));
        let help = (parts.elements[1].accessor)(page.as_ref()).unwrap();
        assert_eq!(help.selector(), &Selector::css("#help"));
        let logout = (parts.blocks[0].elements[0].accessor)(page.as_ref()).unwrap();
        assert_eq!(logout.selector(), &Selector::css("#logout"));
    }

    #[test]
    fn test_block_paths() {
        let parts = Login::manifest().into_parts();
        assert_eq!(parts.blocks[0].elements[0].path, vec!["header", "logout"]);
        assert_eq!(parts.blocks[0].elements[0].kind, ElementKind::Button);
    }

    #[test]
    fn test_accessor_rejects_foreign_instance() {
        let parts = Login::manifest().into_parts();
        let other: Box<AnyPage> = Box::new(42_u32);
        assert!((parts.elements[0].accessor)(other.as_ref()).is_none());
    }

    #[test]
    fn test_misplaced_declarations_are_recorded() {
        let parts = PageManifest::<Login>::new("Broken")
            .redirects_to::<Login>()
            .alias("nothing")
            .action(&[], 0, |_, _, _| Ok(Value::Null))
            .into_parts();
        assert_eq!(parts.errors.len(), 3);
    }

    #[test]
    fn test_redirect_after_action_is_recorded() {
        let parts = PageManifest::<Login>::new("Broken")
            .input("email", |p| &p.email)
            .action0(&["submit"], |_, _| Ok(()))
            .redirects_to::<Login>()
            .into_parts();
        assert!(parts.elements[0].redirect.is_none());
        assert_eq!(parts.errors.len(), 1);
        assert!(parts.errors[0].contains("before any element"));
    }

    #[test]
    fn test_page_key_identity() {
        let a = PageKey::of::<Login>();
        assert_eq!(a, PageKey::of::<Login>());
        assert!(a.type_name().ends_with("Login"));
        assert_eq!(a.manifest().title, "Login");
    }

    mod action_args_tests {
        use super::*;

        #[test]
        fn test_typed_access() {
            let args = ActionArgs::new(vec![
                "a".into(),
                vec!["x".to_string()].into(),
                vec![vec!["1".to_string()]].into(),
            ]);
            assert_eq!(args.text(0).unwrap(), "a");
            assert_eq!(args.list(1).unwrap(), ["x".to_string()]);
            assert_eq!(args.table(2).unwrap().len(), 1);
            assert!(args.text(1).is_err());
            assert!(args.text(9).is_err());
        }

        #[test]
        fn test_texts() {
            let args = ActionArgs::texts(["a", "b"]);
            assert_eq!(args.len(), 2);
            assert!(!args.is_empty());
            assert!(ActionArgs::none().is_empty());
        }
    }
}
