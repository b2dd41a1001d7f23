//! Navigation graph and session state.
//!
//! A [`Session`] owns the current page instance of one scenario. Pages are
//! reached by title (searched in the current page's namespace first), by
//! type, by URL, or implicitly through redirect edges when a declared
//! element is clicked.

use crate::browser::Browser;
use crate::dispatch;
use crate::element::Element;
use crate::i18n::Locale;
use crate::page::{ActionArgs, AnyPage, Page, PageKey};
use crate::registry::{PageDescriptor, TitleRegistry};
use crate::resolver;
use crate::result::{RotuloError, RotuloResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

struct CurrentPage {
    descriptor: Arc<PageDescriptor>,
    instance: Box<AnyPage>,
    id: Uuid,
}

/// State of one scenario: current page, locale, browser
pub struct Session {
    registry: Arc<TitleRegistry>,
    browser: Browser,
    locale: Locale,
    current: Option<CurrentPage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("locale", &self.locale)
            .field("current", &self.current_title())
            .field("instance", &self.current_instance_id())
            .finish_non_exhaustive()
    }
}

fn no_current_page() -> RotuloError {
    RotuloError::init("no current page: open a page before addressing titles")
}

impl Session {
    /// Start a session; the locale comes from the browser's configuration
    #[must_use]
    pub fn new(registry: Arc<TitleRegistry>, browser: Browser) -> Self {
        let locale = browser.config().locale.clone();
        Self {
            registry,
            browser,
            locale,
            current: None,
        }
    }

    /// Shared title registry
    #[must_use]
    pub fn registry(&self) -> &TitleRegistry {
        &self.registry
    }

    /// Browser facade
    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Active locale
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Switch the active locale
    pub fn set_locale(&mut self, locale: Locale) {
        debug!(from = %self.locale, to = %locale, "locale changed");
        self.locale = locale;
    }

    // =========================================================================
    // PAGE LOOKUP
    // =========================================================================

    /// Make the page titled `title` current
    ///
    /// The current page is kept, same instance, when it already carries the
    /// title.
    pub fn get_page(&mut self, title: &str) -> RotuloResult<Arc<PageDescriptor>> {
        if let Some(current) = &self.current {
            if current.descriptor.is_titled(&self.locale, title) {
                return Ok(Arc::clone(&current.descriptor));
            }
        }
        let descriptor = self.lookup(title)?;
        self.instantiate(descriptor)
    }

    /// Make a fresh instance of `P` current
    pub fn get_page_of<P: Page>(&mut self) -> RotuloResult<Arc<PageDescriptor>> {
        self.get_page_by_key(PageKey::of::<P>())
    }

    /// Make a fresh instance of the keyed page type current
    pub fn get_page_by_key(&mut self, key: PageKey) -> RotuloResult<Arc<PageDescriptor>> {
        let descriptor = self.registry.describe(key)?;
        self.instantiate(descriptor)
    }

    /// Navigate the browser to the page titled `title` and make it current
    pub fn change_url_by_title(&mut self, title: &str) -> RotuloResult<Arc<PageDescriptor>> {
        let descriptor = self.lookup(title)?;
        let fragment = descriptor
            .url()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| RotuloError::init(format!("page '{title}' declares no URL")))?;
        let current = self.browser.current_url()?.ok_or_else(|| {
            RotuloError::init(format!("cannot open '{title}': current URL is unknown"))
        })?;
        let target = absolute_url(&current, &self.browser.config().url_path_prefix, fragment)?;
        info!(page = title, url = %target, "navigating by URL");
        self.browser.navigate(target.as_str())?;
        self.instantiate(descriptor)
    }

    fn lookup(&self, title: &str) -> RotuloResult<Arc<PageDescriptor>> {
        let namespace = self.current.as_ref().map(|c| c.descriptor.namespace());
        self.registry
            .find_page(
                title,
                &self.locale,
                namespace,
                &self.browser.config().pages_namespace,
            )?
            .ok_or_else(|| RotuloError::init(format!("no page titled '{title}' is registered")))
    }

    fn instantiate(&mut self, descriptor: Arc<PageDescriptor>) -> RotuloResult<Arc<PageDescriptor>> {
        let instance = descriptor.open(&self.browser).map_err(|e| {
            debug!(page = descriptor.title(), error = %e, "page constructor failed");
            RotuloError::init(format!("cannot open page '{}': {e}", descriptor.title()))
        })?;
        if let Some(anchor) = descriptor.anchor() {
            let element = resolver::resolve(&descriptor, instance.as_ref(), anchor)?;
            let _ = self
                .browser
                .wait()
                .prepared(&element)
                .map_err(|e| e.on_page(descriptor.title()))?;
        }
        let id = Uuid::new_v4();
        info!(
            page = descriptor.title(),
            from = self.current_title().unwrap_or("-"),
            %id,
            "page opened"
        );
        self.current = Some(CurrentPage {
            descriptor: Arc::clone(&descriptor),
            instance,
            id,
        });
        Ok(descriptor)
    }

    // =========================================================================
    // INTERACTION
    // =========================================================================

    /// Element titled `title` on the current page
    pub fn element(&self, title: &str) -> RotuloResult<Element> {
        let current = self.current.as_ref().ok_or_else(no_current_page)?;
        resolver::resolve(&current.descriptor, current.instance.as_ref(), title)
    }

    /// Click the titled element and follow its redirect edge, if any
    pub fn click(&mut self, title: &str) -> RotuloResult<()> {
        let element = self.element(title)?;
        self.browser
            .click(&element)
            .map_err(|e| e.on_page(self.current_title().unwrap_or_default()))?;
        self.follow_redirect(&element)
    }

    /// Type into the titled element
    pub fn fill(&self, title: &str, text: &str) -> RotuloResult<()> {
        let element = self.element(title)?;
        self.browser
            .fill(&element, text)
            .map_err(|e| e.on_page(self.current_title().unwrap_or_default()))
    }

    /// Assert the visible text of the titled element
    pub fn assert_text(&self, title: &str, expected: &str) -> RotuloResult<()> {
        let element = self.element(title)?;
        self.browser
            .assert_text(&element, expected)
            .map_err(|e| e.on_page(self.current_title().unwrap_or_default()))
    }

    /// Invoke the titled action of the current page
    pub fn dispatch(&mut self, title: &str, args: &ActionArgs) -> RotuloResult<Value> {
        let current = self.current.as_mut().ok_or_else(no_current_page)?;
        dispatch::dispatch(
            &current.descriptor,
            current.instance.as_mut(),
            &self.browser,
            &self.locale,
            title,
            args,
        )
    }

    /// Switch pages if `element` is the source of a redirect edge
    pub fn follow_redirect(&mut self, element: &Element) -> RotuloResult<()> {
        let current = self.current.as_ref().ok_or_else(no_current_page)?;
        match resolver::find_redirect(&current.descriptor, current.instance.as_ref(), element) {
            Some(target) => {
                info!(
                    from = current.descriptor.title(),
                    to = target.type_name(),
                    "following redirect"
                );
                self.get_page_by_key(target).map(|_| ())
            }
            None => Ok(()),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Title of the current page
    #[must_use]
    pub fn current_title(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.descriptor.title())
    }

    /// Descriptor of the current page
    #[must_use]
    pub fn current_descriptor(&self) -> Option<&Arc<PageDescriptor>> {
        self.current.as_ref().map(|c| &c.descriptor)
    }

    /// Current page, if it is a `P`
    #[must_use]
    pub fn current_page<P: Page>(&self) -> Option<&P> {
        self.current.as_ref()?.instance.downcast_ref::<P>()
    }

    /// Current page mutably, if it is a `P`
    pub fn current_page_mut<P: Page>(&mut self) -> Option<&mut P> {
        self.current.as_mut()?.instance.downcast_mut::<P>()
    }

    /// Unique id of the current page instance
    #[must_use]
    pub fn current_instance_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|c| c.id)
    }

    /// Drop the current page
    pub fn teardown(&mut self) {
        if let Some(page) = self.current.take() {
            debug!(page = page.descriptor.title(), id = %page.id, "session torn down");
        }
    }
}

/// Origin of `current` + `prefix` + `fragment`
fn absolute_url(current: &str, prefix: &str, fragment: &str) -> RotuloResult<Url> {
    let base = Url::parse(current)
        .map_err(|e| RotuloError::init(format!("current URL '{current}' is invalid: {e}")))?;
    let prefix = prefix.trim_end_matches('/');
    let fragment = fragment.trim_start_matches('/');
    let path = if prefix.is_empty() {
        format!("/{fragment}")
    } else if prefix.starts_with('/') {
        format!("{prefix}/{fragment}")
    } else {
        format!("/{prefix}/{fragment}")
    };
    base.join(&path)
        .map_err(|e| RotuloError::init(format!("cannot build URL from '{current}' and '{path}': {e}")))
}
