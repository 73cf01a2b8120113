// File: src/config.rs
// Purpose: Routing configuration parsed from the `[routing]` table of a site file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::page::PageRecord;

/// How request paths map onto page aliases
///
/// Selected once from [`RouterConfig::url_mode`] and handed to the alias matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlMode {
    /// First segment is the alias, the rest are parameters
    Flat,
    /// Aliases may contain `/` and mirror the page tree (`news/archive`)
    Hierarchical,
}

/// Routing configuration
///
/// Every component receives this struct (or a borrow of it) at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Whether URLs start with a language segment (`en/`, `de-CH/`)
    #[serde(default = "default_false")]
    pub add_language_to_url: bool,

    /// Suffix every page URL must carry (default: ".html")
    #[serde(default = "default_url_suffix")]
    pub url_suffix: String,

    /// Folder-style URLs (aliases may contain slashes)
    #[serde(default = "default_false")]
    pub folder_url: bool,

    /// Insert the auto-item key when the fragment count is even
    #[serde(default = "default_true")]
    pub use_auto_item: bool,

    /// Name of the synthetic auto-item parameter
    #[serde(default = "default_auto_item_key")]
    pub auto_item_key: String,

    /// Keys that may only ever be addressed through the auto-item
    #[serde(default = "default_auto_item_keys")]
    pub auto_item_keys: Vec<String>,

    /// Serve the fallback root on `/` instead of redirecting to `/<language>/`
    #[serde(default = "default_false")]
    pub do_not_redirect_empty: bool,
}

fn default_url_suffix() -> String {
    ".html".to_string()
}

fn default_auto_item_key() -> String {
    "auto_item".to_string()
}

fn default_auto_item_keys() -> Vec<String> {
    vec!["items".to_string(), "events".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            add_language_to_url: false,
            url_suffix: default_url_suffix(),
            folder_url: false,
            use_auto_item: true,
            auto_item_key: default_auto_item_key(),
            auto_item_keys: default_auto_item_keys(),
            do_not_redirect_empty: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file containing a bare routing table
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing config: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RouterConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse routing config: {:?}", path))?;

        Ok(config)
    }

    /// The alias matching strategy for this configuration
    pub fn url_mode(&self) -> UrlMode {
        if self.folder_url {
            UrlMode::Hierarchical
        } else {
            UrlMode::Flat
        }
    }

    /// Whether `key` is one of the reserved auto-item keys
    ///
    /// The synthetic key itself counts as reserved.
    pub fn is_auto_item_key(&self, key: &str) -> bool {
        key == self.auto_item_key || self.auto_item_keys.iter().any(|k| k == key)
    }

    /// Whether `key` may only arrive through the auto-item (not as a path key)
    pub fn is_reserved_key(&self, key: &str) -> bool {
        self.auto_item_keys.iter().any(|k| k == key)
    }

    /// Whether the root redirects `/` to `/<language>/`
    pub fn redirect_empty_to_language_root(&self) -> bool {
        self.add_language_to_url && !self.do_not_redirect_empty
    }

    // Builder helpers, mostly used by tests and the CLI

    pub fn with_language_prefix(mut self, enabled: bool) -> Self {
        self.add_language_to_url = enabled;
        self
    }

    pub fn with_url_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.url_suffix = suffix.into();
        self
    }

    pub fn with_url_mode(mut self, mode: UrlMode) -> Self {
        self.folder_url = mode == UrlMode::Hierarchical;
        self
    }

    pub fn with_auto_item(mut self, enabled: bool) -> Self {
        self.use_auto_item = enabled;
        self
    }

    pub fn with_redirect_empty(mut self, redirect: bool) -> Self {
        self.do_not_redirect_empty = !redirect;
        self
    }
}

/// A site definition: routing configuration plus the page tree
///
/// ```toml
/// [routing]
/// add_language_to_url = true
///
/// [[pages]]
/// id = 1
/// type = "root"
/// alias = "home"
/// language = "en"
/// fallback = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteFile {
    #[serde(default)]
    pub routing: RouterConfig,

    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

impl SiteFile {
    /// Load a site definition from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read site file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse site file: {:?}", path))
    }

    /// Parse a site definition from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
