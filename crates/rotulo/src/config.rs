//! Harness configuration.
//!
//! Loaded from YAML (same loader the playbooks use) with `ROTULO_*`
//! environment overrides applied on top.

use crate::i18n::Locale;
use crate::result::{RotuloError, RotuloResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default timeout for synchronization waits (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling cadence (1 second)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default number of page-reload recovery attempts
pub const DEFAULT_RELOAD_RECOVERY_ATTEMPTS: u32 = 1;

/// Harness-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Timeout used when a wait is not given one explicitly
    pub default_timeout_ms: u64,
    /// Cadence between poll attempts
    pub poll_interval_ms: u64,
    /// Namespace prefix searched after the current page's namespace
    pub pages_namespace: String,
    /// Path prefix inserted between host and page URL fragment
    pub url_path_prefix: String,
    /// Locale active when a session starts
    pub locale: Locale,
    /// Reject duplicate titles at registration instead of warning
    pub strict_titles: bool,
    /// Number of page reloads a readiness wait may spend on recovery
    pub reload_recovery_attempts: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            pages_namespace: String::new(),
            url_path_prefix: String::new(),
            locale: Locale::default(),
            strict_titles: false,
            reload_recovery_attempts: DEFAULT_RELOAD_RECOVERY_ATTEMPTS,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a YAML string and validate it
    pub fn from_yaml(yaml: &str) -> RotuloResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| RotuloError::init(format!("invalid harness config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> RotuloResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            RotuloError::init(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)?.with_env_overrides()
    }

    /// Apply `ROTULO_*` environment variables
    pub fn with_env_overrides(self) -> RotuloResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (env-like)
    pub fn with_overrides<F>(mut self, lookup: F) -> RotuloResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ROTULO_TIMEOUT_MS") {
            self.default_timeout_ms = parse_number("ROTULO_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("ROTULO_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_number("ROTULO_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("ROTULO_PAGES_NAMESPACE") {
            self.pages_namespace = v;
        }
        if let Some(v) = lookup("ROTULO_URL_PATH_PREFIX") {
            self.url_path_prefix = v;
        }
        if let Some(v) = lookup("ROTULO_LOCALE") {
            self.locale = Locale::new(v);
        }
        if let Some(v) = lookup("ROTULO_STRICT_TITLES") {
            self.strict_titles = matches!(v.as_str(), "1" | "true" | "yes");
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants between fields
    pub fn validate(&self) -> RotuloResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(RotuloError::init("poll_interval_ms must be positive"));
        }
        if self.default_timeout_ms == 0 {
            return Err(RotuloError::init("default_timeout_ms must be positive"));
        }
        Ok(())
    }

    /// Set the default timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the configured pages namespace
    #[must_use]
    pub fn with_pages_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.pages_namespace = namespace.into();
        self
    }

    /// Set the URL path prefix
    #[must_use]
    pub fn with_url_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_path_prefix = prefix.into();
        self
    }

    /// Set the starting locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Enable or disable strict title checking
    #[must_use]
    pub const fn with_strict_titles(mut self, strict: bool) -> Self {
        self.strict_titles = strict;
        self
    }

    /// Set the number of reload recovery attempts
    #[must_use]
    pub const fn with_reload_recovery_attempts(mut self, attempts: u32) -> Self {
        self.reload_recovery_attempts = attempts;
        self
    }

    /// Default timeout as Duration
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_number(key: &str, value: &str) -> RotuloResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| RotuloError::init(format!("{key} must be a number, got '{value}'")))
}
