//! Rótulo: title-addressed page objects for UI test automation
//!
//! Rótulo (Spanish: "label, sign") lets behavior-driven test steps address
//! pages, elements and actions by human-readable, localizable titles
//! instead of technical locators.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       RÓTULO Architecture                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  step: "click submit"                                            │
//! │        │                                                         │
//! │        ▼                                                         │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌─────────┐  │
//! │  │ Session    │──►│ Title      │──►│ Resolver / │──►│ Waiter  │  │
//! │  │ (current   │   │ Registry   │   │ Dispatcher │   │ (poll)  │  │
//! │  │  page)     │◄──│ (manifest) │   │            │   │         │  │
//! │  └────────────┘   └────────────┘   └────────────┘   └────┬────┘  │
//! │        ▲ redirect edge                                   │       │
//! │        └──────────────────────────── WebDriver ◄─────────┘       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rotulo::{Browser, Element, Page, PageManifest, RotuloResult, Selector, Session};
//!
//! struct LoginPage {
//!     email: Element,
//!     submit: Element,
//! }
//!
//! impl Page for LoginPage {
//!     fn manifest() -> PageManifest<Self> {
//!         PageManifest::<Self>::new("Login")
//!             .url("/login")
//!             .anchor("email")
//!             .input("email", |p| &p.email)
//!             .button("submit", |p| &p.submit)
//!             .redirects_to::<DashboardPage>()
//!     }
//!
//!     fn open(_browser: &Browser) -> RotuloResult<Self> {
//!         Ok(Self {
//!             email: Element::text_input(Selector::name("email")),
//!             submit: Element::button(Selector::id("submit")),
//!         })
//!     }
//! }
//!
//! session.get_page("Login")?;
//! session.fill("email", "user@example.com")?;
//! session.click("submit")?; // current page is now "Dashboard"
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod dispatch;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod driver;
mod element;
mod i18n;
pub mod logging;
mod navigation;
mod page;
mod registry;
mod resolver;
mod result;
pub mod scope;
mod wait;

pub use browser::Browser;
pub use config::{
    HarnessConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RELOAD_RECOVERY_ATTEMPTS, DEFAULT_TIMEOUT_MS,
};
pub use dispatch::{adapt_arguments, dispatch, find_action};
pub use driver::{
    DriverError, DriverResult, ElementHandle, MockDriver, MockElement, WebDriver,
    READY_STATE_SCRIPT,
};
pub use element::{Element, ElementKind, Selector};
pub use i18n::{
    translate_or_literal, LiteralTranslator, Locale, ResourceBundles, Translator, ANY_OWNER,
};
pub use logging::{init_tracing, LogFormat};
pub use navigation::Session;
pub use page::{
    namespace_of, ActionArg, ActionArgs, AnyPage, BlockManifest, Page, PageKey, PageManifest,
};
pub use registry::{
    ActionDescriptor, BlockDescriptor, ElementDescriptor, PageDescriptor, TitleRegistry,
    TitleRegistryBuilder,
};
pub use resolver::{describe as describe_element, find_redirect, resolve};
pub use result::{ErrorKind, RotuloError, RotuloResult};
pub use wait::{AlertAction, Probe, WaitOptions, WaitResult, Waiter};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        ActionArg, ActionArgs, AlertAction, BlockManifest, Browser, Element, ElementKind,
        HarnessConfig, Locale, Page, PageManifest, ResourceBundles, RotuloError, RotuloResult,
        Selector, Session, TitleRegistry, WaitOptions,
    };
}
