//! End-to-end scenarios against the mock driver.
//!
//! Each scenario wires a registry, a browser and a session the way a step
//! library would, then drives it purely by titles.

#![allow(clippy::unwrap_used)]

use rotulo::prelude::*;
use rotulo::{ErrorKind, MockDriver, MockElement, ANY_OWNER};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Page objects
// ============================================================================

mod shop {
    use super::*;

    pub struct Header {
        pub logout: Element,
    }

    pub struct LoginPage {
        pub email: Element,
        pub password: Element,
        pub header: Header,
        pub submitted: u32,
    }

    impl Page for LoginPage {
        fn manifest() -> PageManifest<Self> {
            PageManifest::<Self>::new("Login")
                .url("/login")
                .anchor("email")
                .element_with_redirect::<DashboardPage>("email", |p| &p.email)
                .input("password", |p| &p.password)
                .block(
                    "header",
                    |p| &p.header,
                    BlockManifest::<Header>::new().button("logout", |h| &h.logout),
                )
                .action0(&["submit", "войти"], |p, _| {
                    p.submitted += 1;
                    Ok(())
                })
        }

        fn open(_browser: &Browser) -> RotuloResult<Self> {
            Ok(Self {
                email: Element::text_input(Selector::name("email")),
                password: Element::text_input(Selector::name("password")),
                header: Header {
                    logout: Element::button(Selector::test_id("logout")),
                },
                submitted: 0,
            })
        }
    }

    pub struct DashboardPage {
        pub banner: Element,
    }

    impl Page for DashboardPage {
        fn manifest() -> PageManifest<Self> {
            PageManifest::<Self>::new("Dashboard")
                .url("/dashboard")
                .element("banner", |p| &p.banner)
        }

        fn open(_browser: &Browser) -> RotuloResult<Self> {
            Ok(Self {
                banner: Element::css("#banner"),
            })
        }
    }
}

use shop::{DashboardPage, LoginPage};

fn ru() -> Locale {
    Locale::new("ru")
}

fn shop_driver() -> Arc<MockDriver> {
    let driver = Arc::new(MockDriver::new());
    driver.set_url("https://shop.test/");
    driver.add_element(Selector::name("email"), MockElement::new("input"));
    driver.add_element(Selector::name("password"), MockElement::new("input"));
    driver.add_element(Selector::test_id("logout"), MockElement::new("button"));
    driver.add_element(
        Selector::css("#banner"),
        MockElement::new("div").with_text("Welcome back"),
    );
    driver
}

fn session_with(driver: &Arc<MockDriver>, config: HarnessConfig) -> Session {
    let bundles = ResourceBundles::new().with(&ru(), ANY_OWNER, "submit", "войти");
    let registry = TitleRegistry::builder()
        .translator(bundles)
        .page::<LoginPage>()
        .page::<DashboardPage>()
        .build()
        .unwrap();
    let browser = Browser::new(driver.clone(), config);
    Session::new(Arc::new(registry), browser)
}

fn session(driver: &Arc<MockDriver>) -> Session {
    session_with(
        driver,
        HarnessConfig::new().with_timeout(200).with_poll_interval(10),
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn resolve_returns_the_declared_field() {
    let driver = shop_driver();
    let mut session = session(&driver);
    session.get_page("Login").unwrap();

    let resolved = session.element("password").unwrap();
    let page = session.current_page::<LoginPage>().unwrap();
    assert!(resolved.same_as(&page.password));

    let nested = session.element("logout").unwrap();
    let page = session.current_page::<LoginPage>().unwrap();
    assert!(nested.same_as(&page.header.logout));
}

#[test]
fn localized_alias_invokes_the_same_action() {
    let driver = shop_driver();
    let mut session = session(&driver);
    session.get_page("Login").unwrap();

    session.set_locale(ru());
    session.dispatch("войти", &ActionArgs::none()).unwrap();
    session.set_locale(Locale::root());
    session.dispatch("submit", &ActionArgs::none()).unwrap();

    let page = session.current_page::<LoginPage>().unwrap();
    assert_eq!(page.submitted, 2);
}

#[test]
fn clicking_a_redirect_element_switches_pages() {
    let driver = shop_driver();
    let mut session = session(&driver);
    session.get_page("Login").unwrap();
    assert_eq!(session.current_title(), Some("Login"));

    session.click("email").unwrap();

    assert_eq!(session.current_title(), Some("Dashboard"));
    assert!(session.current_page::<DashboardPage>().is_some());
    session.assert_text("banner", "Welcome back").unwrap();
}

#[test]
fn get_page_twice_keeps_the_instance() {
    let driver = shop_driver();
    let mut session = session(&driver);

    session.get_page("Login").unwrap();
    let first = session.current_instance_id().unwrap();
    session.dispatch("submit", &ActionArgs::none()).unwrap();

    session.get_page("Login").unwrap();
    assert_eq!(session.current_instance_id(), Some(first));
    assert_eq!(session.current_page::<LoginPage>().unwrap().submitted, 1);
}

#[test]
fn gone_from_dom_gives_up_at_the_deadline() {
    let driver = shop_driver();
    let session = session(&driver);
    let element = Element::css("#banner");

    let start = Instant::now();
    let err = session
        .browser()
        .wait_for(200)
        .gone_from_dom(&element)
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err.kind(), ErrorKind::Timeout | ErrorKind::NotFound));
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(200 + 10 + 250), "took {elapsed:?}");
}

#[test]
fn unknown_page_title_fails_initialization() {
    let driver = shop_driver();
    let mut session = session_with(
        &driver,
        HarnessConfig::new()
            .with_timeout(200)
            .with_poll_interval(10)
            .with_pages_namespace("scenarios"),
    );
    session.get_page("Login").unwrap();

    let err = session.get_page("Checkout").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InitializationFailure);
    assert!(err.to_string().contains("Checkout"));
    assert_eq!(session.current_title(), Some("Login"));
}

#[test]
fn change_url_by_title_navigates_and_switches() {
    let driver = shop_driver();
    let mut session = session_with(
        &driver,
        HarnessConfig::new()
            .with_timeout(200)
            .with_poll_interval(10)
            .with_url_path_prefix("/eu"),
    );
    session.change_url_by_title("Dashboard").unwrap();

    assert_eq!(session.current_title(), Some("Dashboard"));
    assert!(driver
        .history()
        .iter()
        .any(|call| call == "navigate:https://shop.test/eu/dashboard"));
}

#[test]
fn hidden_anchor_is_recovered_by_one_reload() {
    let driver = shop_driver();
    driver.add_element(
        Selector::name("email"),
        MockElement::new("input").shown_after_reload(),
    );
    let mut session = session(&driver);

    session.get_page("Login").unwrap();
    assert_eq!(driver.reloads(), 1);
    assert_eq!(session.current_title(), Some("Login"));
}

#[test]
fn thread_scoped_session_drives_steps() {
    let driver = shop_driver();
    let _ = rotulo::scope::install(session(&driver)).unwrap();

    rotulo::scope::with_session(|s| s.get_page("Login").map(|_| ())).unwrap();
    rotulo::scope::with_session(|s| s.fill("password", "hunter2")).unwrap();
    assert_eq!(rotulo::scope::current_title().as_deref(), Some("Login"));
    assert_eq!(
        driver.value_of(&Selector::name("password")).as_deref(),
        Some("hunter2")
    );

    assert!(rotulo::scope::teardown().is_some());
    assert!(!rotulo::scope::is_active());
}
