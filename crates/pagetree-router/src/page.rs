//! Page records as handed out by the page-lookup collaborator
//!
//! A `PageRecord` is immutable for the duration of a request. The `root_*` and
//! `trail` fields are only meaningful after `PageLookup::load_details` filled them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of page in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Regular,
    Redirect,
    Forward,
    Root,
}

/// Robots directive of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Robots {
    #[default]
    #[serde(rename = "index,follow")]
    IndexFollow,
    #[serde(rename = "index,nofollow")]
    IndexNofollow,
    #[serde(rename = "noindex,follow")]
    NoindexFollow,
    #[serde(rename = "noindex,nofollow")]
    NoindexNofollow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: u64,

    /// Alias, unique within its domain/language scope. May be empty.
    #[serde(default)]
    pub alias: String,

    /// Parent page id, 0 for root pages
    #[serde(default)]
    pub pid: u64,

    #[serde(default, rename = "type")]
    pub page_type: PageType,

    /// Domain of a root page (empty = any host)
    #[serde(default)]
    pub domain: String,

    /// Language of a root page
    #[serde(default)]
    pub language: String,

    /// Whether this root is the fallback language of its domain
    #[serde(default)]
    pub fallback: bool,

    #[serde(default)]
    pub robots: Robots,

    #[serde(default = "default_published")]
    pub published: bool,

    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,

    // Filled by load_details
    /// Ancestor ids from the root down to this page (inclusive)
    #[serde(default, skip_deserializing)]
    pub trail: Vec<u64>,

    #[serde(default, skip_deserializing)]
    pub root_id: u64,

    /// Domain inherited from the root page
    #[serde(default, skip_deserializing)]
    pub root_domain: String,

    /// Language inherited from the root page
    #[serde(default, skip_deserializing)]
    pub root_language: String,

    #[serde(default, skip_deserializing)]
    pub root_is_fallback: bool,
}

fn default_published() -> bool {
    true
}

impl PageRecord {
    /// Creates a published regular page
    pub fn new(id: u64, pid: u64, alias: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
            pid,
            page_type: PageType::Regular,
            domain: String::new(),
            language: String::new(),
            fallback: false,
            robots: Robots::default(),
            published: true,
            start: None,
            stop: None,
            trail: Vec::new(),
            root_id: 0,
            root_domain: String::new(),
            root_language: String::new(),
            root_is_fallback: false,
        }
    }

    /// Creates a published root page for a domain and language
    pub fn root(id: u64, alias: impl Into<String>, domain: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            page_type: PageType::Root,
            domain: domain.into(),
            language: language.into(),
            ..Self::new(id, 0, alias)
        }
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_window(mut self, start: Option<DateTime<Utc>>, stop: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    pub fn is_root(&self) -> bool {
        self.page_type == PageType::Root
    }

    /// Alias used in URLs, or the numeric id when the alias is empty
    pub fn alias_or_id(&self) -> String {
        if self.alias.is_empty() {
            self.id.to_string()
        } else {
            self.alias.clone()
        }
    }

    /// Whether the page is published and inside its start/stop window
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.published
            && self.start.map_or(true, |start| start <= now)
            && self.stop.map_or(true, |stop| now < stop)
    }

    /// Domain key used when grouping pages (empty domain becomes `*`)
    pub fn domain_key(&self) -> &str {
        if self.root_domain.is_empty() {
            "*"
        } else {
            &self.root_domain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_alias_or_id() {
        assert_eq!(PageRecord::new(7, 1, "news").alias_or_id(), "news");
        assert_eq!(PageRecord::new(7, 1, "").alias_or_id(), "7");
    }

    #[test]
    fn test_visibility_window() {
        let now = Utc::now();
        let page = PageRecord::new(1, 0, "a");
        assert!(page.is_visible_at(now));

        let future = page.clone().with_window(Some(now + Duration::hours(1)), None);
        assert!(!future.is_visible_at(now));

        let expired = page.clone().with_window(None, Some(now));
        assert!(!expired.is_visible_at(now));

        let hidden = page.with_published(false);
        assert!(!hidden.is_visible_at(now));
    }

    #[test]
    fn test_domain_key_wildcard() {
        let mut page = PageRecord::new(1, 0, "index");
        assert_eq!(page.domain_key(), "*");
        page.root_domain = "a.example".into();
        assert_eq!(page.domain_key(), "a.example");
    }

    #[test]
    fn test_deserialize_from_toml() {
        let page: PageRecord = toml::from_str(
            r#"
            id = 1
            type = "root"
            alias = "index"
            domain = "a.example"
            language = "en"
            fallback = true
            robots = "noindex,follow"
            "#,
        )
        .unwrap();
        assert!(page.is_root());
        assert!(page.published);
        assert!(page.fallback);
        assert_eq!(page.robots, Robots::NoindexFollow);
        assert!(page.trail.is_empty());
    }
}
