//! Locale service.
//!
//! Declared titles are translation keys. A [`Translator`] maps
//! `(owner, locale, key)` to localized text; an untranslated key stands for
//! itself.
//!
//! ```yaml
//! ru:
//!   "*":
//!     submit: войти
//!   shop::pages::LoginPage:
//!     email: почта
//! ```

use crate::result::{RotuloError, RotuloResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Owner key matching every declaring type
pub const ANY_OWNER: &str = "*";

/// A locale tag ("ru", "en-GB"); the empty tag is the root locale
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The root locale: titles are used literally
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// The locale tag
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// Whether this is the root locale
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Translation lookup for declared titles
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Translate `key` declared on `owner` into `locale`, if a translation exists
    fn translate(&self, owner: &str, locale: &Locale, key: &str) -> Option<String>;

    /// Locales this translator knows
    fn locales(&self) -> Vec<Locale>;
}

/// Translate, falling back to the literal key
#[must_use]
pub fn translate_or_literal(
    translator: &dyn Translator,
    owner: &str,
    locale: &Locale,
    key: &str,
) -> String {
    if locale.is_root() {
        return key.to_string();
    }
    translator
        .translate(owner, locale, key)
        .unwrap_or_else(|| key.to_string())
}

/// Translator that never translates
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralTranslator;

impl Translator for LiteralTranslator {
    fn translate(&self, _owner: &str, _locale: &Locale, _key: &str) -> Option<String> {
        None
    }

    fn locales(&self) -> Vec<Locale> {
        Vec::new()
    }
}

/// In-memory resource bundles: locale -> owner -> key -> text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceBundles {
    bundles: BTreeMap<Locale, BTreeMap<String, BTreeMap<String, String>>>,
}

impl ResourceBundles {
    /// Create empty bundles
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse bundles from YAML
    pub fn from_yaml(yaml: &str) -> RotuloResult<Self> {
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| RotuloError::init(format!("invalid resource bundle: {e}")))
    }

    /// Load bundles from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> RotuloResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            RotuloError::init(format!("cannot read bundle {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Add a translation; `owner` may be [`ANY_OWNER`]
    #[must_use]
    pub fn with(
        mut self,
        locale: &Locale,
        owner: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let _ = self
            .bundles
            .entry(locale.clone())
            .or_default()
            .entry(owner.to_string())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    /// Number of translations across all locales
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Whether there are no translations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Translator for ResourceBundles {
    fn translate(&self, owner: &str, locale: &Locale, key: &str) -> Option<String> {
        let bundle = self.bundles.get(locale)?;
        bundle
            .get(owner)
            .and_then(|keys| keys.get(key))
            .or_else(|| bundle.get(ANY_OWNER).and_then(|keys| keys.get(key)))
            .cloned()
    }

    fn locales(&self) -> Vec<Locale> {
        self.bundles.keys().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ru() -> Locale {
        Locale::new("ru")
    }

    #[test]
    fn test_root_locale() {
        assert!(Locale::root().is_root());
        assert_eq!(Locale::root().to_string(), "root");
        assert_eq!(ru().to_string(), "ru");
    }

    #[test]
    fn test_owner_specific_beats_global() {
        let bundles = ResourceBundles::new()
            .with(&ru(), ANY_OWNER, "submit", "отправить")
            .with(&ru(), "LoginPage", "submit", "войти");
        assert_eq!(
            bundles.translate("LoginPage", &ru(), "submit").as_deref(),
            Some("войти")
        );
        assert_eq!(
            bundles.translate("CartPage", &ru(), "submit").as_deref(),
            Some("отправить")
        );
    }

    #[test]
    fn test_literal_fallback() {
        let bundles = ResourceBundles::new();
        assert_eq!(translate_or_literal(&bundles, "X", &ru(), "submit"), "submit");
    }

    #[test]
    fn test_root_locale_is_literal() {
        let bundles = ResourceBundles::new().with(&Locale::root(), ANY_OWNER, "a", "b");
        assert_eq!(translate_or_literal(&bundles, "X", &Locale::root(), "a"), "a");
    }

    #[test]
    fn test_from_yaml() {
        let bundles = ResourceBundles::from_yaml(
            "ru:\n  \"*\":\n    submit: войти\nde:\n  Login:\n    submit: anmelden\n",
        )
        .unwrap();
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles.locales(), vec![Locale::new("de"), ru()]);
        assert_eq!(
            bundles.translate("Login", &Locale::new("de"), "submit").as_deref(),
            Some("anmelden")
        );
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(ResourceBundles::from_yaml("- just\n- a list\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ru.yaml");
        std::fs::write(&path, "ru:\n  \"*\":\n    email: почта\n").unwrap();
        let bundles = ResourceBundles::from_file(&path).unwrap();
        assert!(!bundles.is_empty());
    }

    #[test]
    fn test_literal_translator() {
        assert!(LiteralTranslator.translate("a", &ru(), "b").is_none());
        assert!(LiteralTranslator.locales().is_empty());
    }

    proptest! {
        #[test]
        fn prop_untranslated_title_is_unchanged(key in "[a-zA-Zа-я ]{1,24}", tag in "[a-z]{2}") {
            let bundles = ResourceBundles::new();
            let locale = Locale::new(tag);
            let once = translate_or_literal(&bundles, "Page", &locale, &key);
            prop_assert_eq!(&once, &key);
            let twice = translate_or_literal(&bundles, "Page", &locale, &once);
            prop_assert_eq!(twice, once);
        }
    }
}
