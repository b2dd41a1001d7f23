//! Locator resolution: title -> live element proxy.
//!
//! Nothing is cached. Every call reads the member's current value from the
//! page instance, so a page that swaps a proxy is observed immediately.

use crate::element::Element;
use crate::page::{AnyPage, PageKey};
use crate::registry::{ElementDescriptor, PageDescriptor};
use crate::result::{RotuloError, RotuloResult};
use tracing::debug;

/// Descriptors in resolution order: own elements, then block elements
fn candidates(descriptor: &PageDescriptor) -> impl Iterator<Item = &ElementDescriptor> {
    descriptor
        .elements()
        .iter()
        .chain(descriptor.blocks().iter().flat_map(|b| b.elements().iter()))
}

/// Resolve an element title on a page instance
pub fn resolve(descriptor: &PageDescriptor, page: &AnyPage, title: &str) -> RotuloResult<Element> {
    let found = candidates(descriptor)
        .find(|e| e.title() == title)
        .ok_or_else(|| RotuloError::not_found("element", title, descriptor.title()))?;
    debug!(page = descriptor.title(), title, path = %found.path().join("."), "element resolved");
    found.read(page).ok_or_else(|| {
        RotuloError::init(format!(
            "page '{}' instance does not match its descriptor",
            descriptor.title()
        ))
    })
}

/// Descriptor of an element title, without reading the instance
#[must_use]
pub fn describe<'a>(descriptor: &'a PageDescriptor, title: &str) -> Option<&'a ElementDescriptor> {
    candidates(descriptor).find(|e| e.title() == title)
}

/// Redirect target for an interacted element
///
/// Only an edge whose member currently holds the very same proxy counts;
/// an equal but distinct proxy does not.
#[must_use]
pub fn find_redirect(
    descriptor: &PageDescriptor,
    page: &AnyPage,
    element: &Element,
) -> Option<PageKey> {
    candidates(descriptor)
        .filter(|e| e.redirect().is_some())
        .find(|e| e.read(page).is_some_and(|current| current.same_as(element)))
        .and_then(ElementDescriptor::redirect)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use crate::element::Selector;
    use crate::page::{BlockManifest, Page, PageManifest};
    use crate::registry::TitleRegistry;
    use crate::result::{ErrorKind, RotuloResult};

    struct Menu {
        logout: Element,
        email: Element,
    }

    struct Account {
        email: Element,
        menu: Menu,
    }

    impl Page for Account {
        fn manifest() -> PageManifest<Self> {
            PageManifest::<Self>::new("Account")
                .element("email", |p| &p.email)
                .block(
                    "menu",
                    |p| &p.menu,
                    BlockManifest::<Menu>::new()
                        .element("logout", |m| &m.logout)
                        .redirects_to::<Farewell>()
                        .element("email", |m| &m.email),
                )
        }

        fn open(_browser: &Browser) -> RotuloResult<Self> {
            Ok(account())
        }
    }

    struct Farewell;

    impl Page for Farewell {
        fn manifest() -> PageManifest<Self> {
            PageManifest::<Self>::new("Farewell")
        }

        fn open(_browser: &Browser) -> RotuloResult<Self> {
            Ok(Self)
        }
    }

    fn account() -> Account {
        Account {
            email: Element::css("#email"),
            menu: Menu {
                logout: Element::css("#logout"),
                email: Element::css("#menu-email"),
            },
        }
    }

    fn descriptor() -> std::sync::Arc<PageDescriptor> {
        TitleRegistry::default().register::<Account>().unwrap()
    }

    #[test]
    fn test_own_element_wins_over_block() {
        let page: Box<AnyPage> = Box::new(account());
        let element = resolve(&descriptor(), page.as_ref(), "email").unwrap();
        assert_eq!(element.selector(), &Selector::css("#email"));
    }

    #[test]
    fn test_block_element() {
        let page: Box<AnyPage> = Box::new(account());
        let element = resolve(&descriptor(), page.as_ref(), "logout").unwrap();
        assert_eq!(element.selector(), &Selector::css("#logout"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let page: Box<AnyPage> = Box::new(account());
        let err = resolve(&descriptor(), page.as_ref(), "Email").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let msg = err.to_string();
        assert!(msg.contains("Email"));
        assert!(msg.contains("Account"));
    }

    #[test]
    fn test_resolve_reads_current_value() {
        let mut account = account();
        account.email = Element::css("#replaced");
        let page: Box<AnyPage> = Box::new(account);
        let element = resolve(&descriptor(), page.as_ref(), "email").unwrap();
        assert_eq!(element.selector(), &Selector::css("#replaced"));
    }

    #[test]
    fn test_redirect_requires_identity() {
        let descriptor = descriptor();
        let account = account();
        let same = account.menu.logout.clone();
        let page: Box<AnyPage> = Box::new(account);

        assert_eq!(
            find_redirect(&descriptor, page.as_ref(), &same),
            Some(PageKey::of::<Farewell>())
        );
        let lookalike = Element::css("#logout");
        assert_eq!(lookalike, same);
        assert_eq!(find_redirect(&descriptor, page.as_ref(), &lookalike), None);
    }

    #[test]
    fn test_describe() {
        let descriptor = descriptor();
        assert_eq!(describe(&descriptor, "logout").unwrap().path(), ["menu", "logout"]);
        assert!(describe(&descriptor, "nope").is_none());
    }
}
