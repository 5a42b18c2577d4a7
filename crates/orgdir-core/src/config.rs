//! Directory configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! api_key = "secret"
//!
//! [tree_cache]
//! enabled = true
//! max_capacity = 1024
//! ttl_secs = 300
//!
//! [log]
//! filter = "info,orgdir_core=debug"
//! json = false
//! ```

use crate::error::DirectoryError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides [`DirectoryConfig::api_key`]
pub const API_KEY_ENV: &str = "ORGDIR_API_KEY";

/// Directory configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Required API key; `None` authorizes every caller
    pub api_key: Option<String>,
    /// Tree read cache
    pub tree_cache: TreeCacheConfig,
    /// Logging
    pub log: LogConfig,
}

impl DirectoryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With tree cache settings
    #[inline]
    #[must_use]
    pub fn with_tree_cache(mut self, tree_cache: TreeCacheConfig) -> Self {
        self.tree_cache = tree_cache;
        self
    }

    /// With log filter directive
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }

    /// With JSON log output
    #[inline]
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.log.json = json;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`DirectoryError::Config`] on malformed TOML or unknown keys
    pub fn from_toml_str(text: &str) -> Result<Self, DirectoryError> {
        toml::from_str(text).map_err(|e| DirectoryError::Config(e.to_string()))
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`DirectoryError::Config`] if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    #[must_use]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

/// Tree cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeCacheConfig {
    /// Whether assembled trees are cached at all
    pub enabled: bool,
    /// Maximum cached trees
    pub max_capacity: u64,
    /// Time to live in seconds; 0 disables expiry
    pub ttl_secs: u64,
}

impl TreeCacheConfig {
    /// Time to live, if any
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl Default for TreeCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 1_024,
            ttl_secs: 300,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            DirectoryConfig::from_toml_str("").unwrap(),
            DirectoryConfig::default()
        );
    }

    #[test]
    fn toml_overrides_fields() {
        let config = DirectoryConfig::from_toml_str(
            r#"
            api_key = "secret"

            [tree_cache]
            enabled = false
            ttl_secs = 0

            [log]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert!(!config.tree_cache.enabled);
        assert_eq!(config.tree_cache.max_capacity, 1_024);
        assert_eq!(config.tree_cache.ttl(), None);
        assert!(config.log.json);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DirectoryConfig::from_toml_str("apikey = \"x\"").unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }

    #[test]
    fn env_overrides_api_key() {
        let config = DirectoryConfig::new()
            .with_api_key("from-file")
            .apply_env_from(|name| (name == API_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("from-env"));

        let config = DirectoryConfig::new()
            .with_api_key("from-file")
            .apply_env_from(|_| Some(String::new()));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgdir.toml");
        std::fs::write(&path, "[log]\nfilter = \"debug\"\n").unwrap();
        let config = DirectoryConfig::load(&path).unwrap();
        assert_eq!(config.log.filter, "debug");
        assert!(DirectoryConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
