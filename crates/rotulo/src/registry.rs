//! Title registry.
//!
//! Turns page manifests into [`PageDescriptor`]s, caches them per page type
//! and answers "which page carries this title". Descriptors are immutable
//! once built and shared as `Arc`s; [`TitleRegistry::reset`] drops the cache.

use crate::browser::Browser;
use crate::config::HarnessConfig;
use crate::element::{Element, ElementKind};
use crate::i18n::{translate_or_literal, LiteralTranslator, Locale, Translator};
use crate::page::{
    namespace_of, ActionArgs, ActionEntry, ActionInvoker, AnyPage, BlockEntry, ElementAccessor,
    ElementEntry, Page, PageKey,
};
use crate::result::{RotuloError, RotuloResult};
use serde_json::Value;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// A titled element of a page or block
#[derive(Clone)]
pub struct ElementDescriptor {
    title: String,
    path: Vec<String>,
    kind: ElementKind,
    redirect: Option<PageKey>,
    accessor: ElementAccessor,
}

impl ElementDescriptor {
    fn from_entry(entry: ElementEntry) -> Self {
        Self {
            title: entry.title,
            path: entry.path,
            kind: entry.kind,
            redirect: entry.redirect,
            accessor: entry.accessor,
        }
    }

    /// Declared title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Member path from the page root
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Declared kind
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Page reached by interacting with this element
    #[must_use]
    pub const fn redirect(&self) -> Option<PageKey> {
        self.redirect
    }

    /// Read the member's current value from a page instance
    #[must_use]
    pub fn read(&self, page: &AnyPage) -> Option<Element> {
        (self.accessor)(page)
    }
}

impl std::fmt::Debug for ElementDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementDescriptor")
            .field("title", &self.title)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

/// A titled block and its elements
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    title: String,
    elements: Vec<ElementDescriptor>,
}

impl BlockDescriptor {
    fn from_entry(entry: BlockEntry) -> Self {
        Self {
            title: entry.title,
            elements: entry
                .elements
                .into_iter()
                .map(ElementDescriptor::from_entry)
                .collect(),
        }
    }

    /// Block title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Elements declared in the block
    #[must_use]
    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }
}

/// A titled action
#[derive(Clone)]
pub struct ActionDescriptor {
    titles: Vec<String>,
    arity: usize,
    owner: &'static str,
    invoker: ActionInvoker,
}

impl ActionDescriptor {
    fn from_entry(entry: ActionEntry) -> Self {
        Self {
            titles: entry.titles,
            arity: entry.arity,
            owner: entry.owner,
            invoker: entry.invoker,
        }
    }

    /// Declared titles (aliases)
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of parameters
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Type that declared the action
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Whether `title` is one of this action's titles in `locale`
    #[must_use]
    pub fn answers_to(&self, translator: &dyn Translator, locale: &Locale, title: &str) -> bool {
        self.titles
            .iter()
            .any(|t| translate_or_literal(translator, self.owner, locale, t) == title)
    }

    /// Run the action against a page instance
    pub fn invoke(
        &self,
        page: &mut AnyPage,
        browser: &Browser,
        args: &ActionArgs,
    ) -> RotuloResult<Value> {
        (self.invoker)(page, browser, args)
    }
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("titles", &self.titles)
            .field("arity", &self.arity)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Everything known about a page type
pub struct PageDescriptor {
    key: PageKey,
    title: String,
    namespace: String,
    url: Option<String>,
    anchor: Option<String>,
    elements: Vec<ElementDescriptor>,
    blocks: Vec<BlockDescriptor>,
    actions: Vec<ActionDescriptor>,
    commands: HashMap<Locale, HashMap<String, usize>>,
    translator: Arc<dyn Translator>,
}

impl PageDescriptor {
    /// Page type
    #[must_use]
    pub const fn key(&self) -> PageKey {
        self.key
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Namespace (module path) of the page type
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// URL fragment, if declared
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Title of the readiness anchor element, if declared
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Own and inherited elements, own first
    #[must_use]
    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    /// Blocks in declaration order
    #[must_use]
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    /// Actions, most-derived first
    #[must_use]
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Translator the command map was built with
    #[must_use]
    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Precomputed action index for a title in a locale
    ///
    /// `None` from the outer lookup means the locale was not known at
    /// registration time.
    #[must_use]
    pub fn command(&self, locale: &Locale, title: &str) -> Option<Option<usize>> {
        self.commands
            .get(locale)
            .map(|titles| titles.get(title).copied())
    }

    /// Whether `title` names this page in `locale`
    #[must_use]
    pub fn is_titled(&self, locale: &Locale, title: &str) -> bool {
        self.title == title
            || translate_or_literal(self.translator.as_ref(), self.key.type_name(), locale, &self.title)
                == title
    }

    /// Build a fresh instance of the page type
    pub fn open(&self, browser: &Browser) -> RotuloResult<Box<AnyPage>> {
        self.key.open(browser)
    }
}

impl std::fmt::Debug for PageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDescriptor")
            .field("title", &self.title)
            .field("type", &self.key.type_name())
            .field("namespace", &self.namespace)
            .field("url", &self.url)
            .field("anchor", &self.anchor)
            .field("elements", &self.elements)
            .field("blocks", &self.blocks)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Default)]
struct RegistryState {
    known: Vec<PageKey>,
    described: HashMap<TypeId, Arc<PageDescriptor>>,
}

/// Process-wide cache of page descriptors
pub struct TitleRegistry {
    state: RwLock<RegistryState>,
    translator: Arc<dyn Translator>,
    strict_titles: bool,
}

impl std::fmt::Debug for TitleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (known, described) = self
            .state
            .read()
            .map(|s| (s.known.len(), s.described.len()))
            .unwrap_or_default();
        f.debug_struct("TitleRegistry")
            .field("known", &known)
            .field("described", &described)
            .field("translator", &self.translator)
            .field("strict_titles", &self.strict_titles)
            .finish()
    }
}

impl Default for TitleRegistry {
    fn default() -> Self {
        Self::new(Arc::new(LiteralTranslator))
    }
}

impl TitleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            translator,
            strict_titles: false,
        }
    }

    /// Start a registry builder
    #[must_use]
    pub fn builder() -> TitleRegistryBuilder {
        TitleRegistryBuilder::default()
    }

    /// Reject title collisions instead of warning
    #[must_use]
    pub fn with_strict_titles(mut self, strict: bool) -> Self {
        self.strict_titles = strict;
        self
    }

    /// Translator used for effective titles
    #[must_use]
    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Register a page type and return its descriptor
    pub fn register<P: Page>(&self) -> RotuloResult<Arc<PageDescriptor>> {
        self.describe(PageKey::of::<P>())
    }

    /// Descriptor for a page key, building and caching it on first use
    pub fn describe(&self, key: PageKey) -> RotuloResult<Arc<PageDescriptor>> {
        if let Some(found) = self.read()?.described.get(&key.type_id()) {
            return Ok(Arc::clone(found));
        }
        let built = Arc::new(self.build(key)?);
        let mut state = self.write()?;
        if let Some(other) = state
            .described
            .values()
            .find(|d| d.title == built.title && d.key != key)
        {
            let message = format!(
                "page title '{}' declared by both {} and {}",
                built.title,
                other.key.type_name(),
                key.type_name()
            );
            if self.strict_titles {
                return Err(RotuloError::init(message));
            }
            warn!("{message}; first registered wins");
        }
        if !state.known.contains(&key) {
            state.known.push(key);
        }
        let entry = state.described.entry(key.type_id()).or_insert(built);
        Ok(Arc::clone(entry))
    }

    /// Find a page by title, in `namespace` first, then under `prefix`
    pub fn find_page(
        &self,
        title: &str,
        locale: &Locale,
        namespace: Option<&str>,
        prefix: &str,
    ) -> RotuloResult<Option<Arc<PageDescriptor>>> {
        let known = self.read()?.known.clone();
        let mut candidates = Vec::with_capacity(known.len());
        for key in known {
            candidates.push(self.describe(key)?);
        }
        let titled = |d: &&Arc<PageDescriptor>| d.is_titled(locale, title);
        if let Some(namespace) = namespace {
            if let Some(found) = candidates
                .iter()
                .filter(titled)
                .find(|d| d.namespace == namespace)
            {
                return Ok(Some(Arc::clone(found)));
            }
        }
        Ok(candidates
            .iter()
            .filter(titled)
            .find(|d| d.namespace.starts_with(prefix))
            .cloned())
    }

    /// Titles of every registered page, in registration order
    pub fn page_titles(&self) -> RotuloResult<Vec<String>> {
        let state = self.read()?;
        Ok(state
            .known
            .iter()
            .filter_map(|k| state.described.get(&k.type_id()))
            .map(|d| d.title.clone())
            .collect())
    }

    /// Number of page types known to the registry
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.known.len()).unwrap_or(0)
    }

    /// Whether no page type is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached descriptor; registered page types are kept
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.write() {
            state.described.clear();
            debug!(pages = state.known.len(), "title registry reset");
        }
    }

    fn read(&self) -> RotuloResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|_| RotuloError::init("title registry lock poisoned"))
    }

    fn write(&self) -> RotuloResult<std::sync::RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|_| RotuloError::init("title registry lock poisoned"))
    }

    fn build(&self, key: PageKey) -> RotuloResult<PageDescriptor> {
        let parts = key.manifest().flatten();
        if !parts.errors.is_empty() {
            return Err(RotuloError::init(format!(
                "invalid manifest for {}: {}",
                key.type_name(),
                parts.errors.join("; ")
            )));
        }
        if parts.title.is_empty() {
            return Err(RotuloError::init(format!(
                "{} declares an empty page title",
                key.type_name()
            )));
        }

        let elements: Vec<_> = parts
            .elements
            .into_iter()
            .map(ElementDescriptor::from_entry)
            .collect();
        let blocks: Vec<_> = parts
            .blocks
            .into_iter()
            .map(BlockDescriptor::from_entry)
            .collect();
        let actions: Vec<_> = parts
            .actions
            .into_iter()
            .map(ActionDescriptor::from_entry)
            .collect();

        self.check_element_titles(&parts.title, &elements, &blocks)?;
        self.check_action_titles(&parts.title, &actions)?;

        if let Some(anchor) = &parts.anchor {
            let declared = elements
                .iter()
                .chain(blocks.iter().flat_map(|b| b.elements.iter()))
                .any(|e| &e.title == anchor);
            if !declared {
                return Err(RotuloError::init(format!(
                    "anchor '{anchor}' of page '{}' is not a declared element",
                    parts.title
                )));
            }
        }

        let commands = self.command_maps(&actions);
        let namespace = parts
            .namespace
            .unwrap_or_else(|| namespace_of(key.type_name()).to_string());
        debug!(
            page = %parts.title,
            page_type = key.type_name(),
            elements = elements.len(),
            blocks = blocks.len(),
            actions = actions.len(),
            "page registered"
        );
        Ok(PageDescriptor {
            key,
            title: parts.title,
            namespace,
            url: parts.url,
            anchor: parts.anchor,
            elements,
            blocks,
            actions,
            commands,
            translator: Arc::clone(&self.translator),
        })
    }

    fn check_element_titles(
        &self,
        page: &str,
        elements: &[ElementDescriptor],
        blocks: &[BlockDescriptor],
    ) -> RotuloResult<()> {
        let mut seen = HashSet::new();
        let all = elements
            .iter()
            .chain(blocks.iter().flat_map(|b| b.elements.iter()));
        for element in all {
            if !seen.insert(element.title.as_str()) {
                self.collision(format!(
                    "element title '{}' declared twice on page '{page}' (at {})",
                    element.title,
                    element.path.join(".")
                ))?;
            }
        }
        Ok(())
    }

    fn check_action_titles(&self, page: &str, actions: &[ActionDescriptor]) -> RotuloResult<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for action in actions {
            for title in &action.titles {
                match seen.get(title.as_str()) {
                    // inherited actions overridden by a derived one are expected
                    Some(owner) if *owner == action.owner => self.collision(format!(
                        "action title '{title}' declared twice by {} on page '{page}'",
                        action.owner
                    ))?,
                    Some(_) => {}
                    None => {
                        let _ = seen.insert(title.as_str(), action.owner);
                    }
                }
            }
        }
        Ok(())
    }

    fn collision(&self, message: String) -> RotuloResult<()> {
        if self.strict_titles {
            Err(RotuloError::init(message))
        } else {
            warn!("{message}; first declared wins");
            Ok(())
        }
    }

    fn command_maps(&self, actions: &[ActionDescriptor]) -> HashMap<Locale, HashMap<String, usize>> {
        let mut locales = self.translator.locales();
        locales.push(Locale::root());
        locales
            .into_iter()
            .map(|locale| {
                let mut map = HashMap::new();
                for (index, action) in actions.iter().enumerate() {
                    for title in &action.titles {
                        let effective =
                            translate_or_literal(self.translator.as_ref(), action.owner, &locale, title);
                        let _ = map.entry(effective).or_insert(index);
                    }
                }
                (locale, map)
            })
            .collect()
    }
}

/// Builder pre-registering page types
#[derive(Default)]
pub struct TitleRegistryBuilder {
    translator: Option<Arc<dyn Translator>>,
    strict_titles: bool,
    pages: Vec<PageKey>,
}

impl std::fmt::Debug for TitleRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRegistryBuilder")
            .field("strict_titles", &self.strict_titles)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

impl TitleRegistryBuilder {
    /// Translator for effective titles
    #[must_use]
    pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }

    /// Take registration policy from the harness configuration
    #[must_use]
    pub fn config(mut self, config: &HarnessConfig) -> Self {
        self.strict_titles = config.strict_titles;
        self
    }

    /// Reject title collisions
    #[must_use]
    pub fn strict_titles(mut self, strict: bool) -> Self {
        self.strict_titles = strict;
        self
    }

    /// Pre-register a page type
    #[must_use]
    pub fn page<P: Page>(self) -> Self {
        self.page_key(PageKey::of::<P>())
    }

    /// Pre-register a page by key
    #[must_use]
    pub fn page_key(mut self, key: PageKey) -> Self {
        if !self.pages.contains(&key) {
            self.pages.push(key);
        }
        self
    }

    /// Build the registry, describing every pre-registered page
    pub fn build(self) -> RotuloResult<TitleRegistry> {
        let translator = self
            .translator
            .unwrap_or_else(|| Arc::new(LiteralTranslator));
        let registry = TitleRegistry::new(translator).with_strict_titles(self.strict_titles);
        for key in self.pages {
            let _ = registry.describe(key)?;
        }
        Ok(registry)
    }
}
