//! Canonical URL composition
//!
//! The inverse of resolution: a page plus parameters becomes
//! `/[<language>/]<alias>[/<tail>]<suffix>`.
//!
//! Keys and values are form-encoded first and every path segment is encoded once
//! more on output. The resolver undoes exactly these two layers (one raw decode of
//! the whole path, one form decode per fragment), so values containing `/`, `%`,
//! `+` or spaces survive a round trip.
//!
//! # Examples
//!
//! ```
//! use pagetree_router::{PageRecord, RouterConfig, UrlComposer};
//!
//! let config = RouterConfig::default();
//! let page = PageRecord::new(2, 1, "news");
//! let params = vec![
//!     ("auto_item".to_string(), "summer party".to_string()),
//!     ("page".to_string(), "2".to_string()),
//! ];
//!
//! let url = UrlComposer::new(&config).compose(&page, &params, &[]);
//! assert_eq!(url.to_string(), "/news/summer%2Bparty/page/2.html");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::config::RouterConfig;
use crate::page::PageRecord;

/// Separator of `add_to_url` request strings (`&` or `&amp;`)
static REQUEST_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&(amp;)?").unwrap());

/// Key the URL language occupies; never emitted as a path parameter
pub const LANGUAGE_KEY: &str = "language";

/// A composed page URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalUrl {
    /// Language segment, present when prefixing is enabled
    pub language: Option<String>,
    /// Page alias, or the numeric id of a page without one
    pub alias: String,
    /// Form-encoded tail segments in output order
    pub segments: Vec<String>,
    pub suffix: String,
}

impl CanonicalUrl {
    /// Site-relative path without leading slash and suffix
    pub fn path(&self) -> String {
        let mut path = String::new();

        if let Some(language) = &self.language {
            path.push_str(language);
            path.push('/');
        }

        let alias: Vec<String> = self.alias.split('/').map(path_encode).collect();
        path.push_str(&alias.join("/"));

        for segment in &self.segments {
            path.push('/');
            path.push_str(&path_encode(segment));
        }

        path
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}{}", self.path(), self.suffix)
    }
}

/// Encodes a key or value the way query strings are encoded (space is `+`)
pub fn form_encode(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}

fn path_encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

pub struct UrlComposer<'c> {
    config: &'c RouterConfig,
}

impl<'c> UrlComposer<'c> {
    pub fn new(config: &'c RouterConfig) -> Self {
        Self { config }
    }

    /// Builds the canonical URL of `page` carrying `params`
    ///
    /// `page` must have its details loaded when prefixing is enabled (the language
    /// segment is the root language). Keys listed in `unset`, empty keys and empty
    /// values are dropped. Auto-item keys are emitted as a bare value in front of
    /// the other pairs.
    pub fn compose(&self, page: &PageRecord, params: &[(String, String)], unset: &[&str]) -> CanonicalUrl {
        let mut bare: Vec<String> = Vec::new();
        let mut pairs: Vec<String> = Vec::new();

        for (key, value) in params {
            if key.is_empty() || value.is_empty() || unset.contains(&key.as_str()) {
                continue;
            }

            if self.config.add_language_to_url && key == LANGUAGE_KEY {
                continue;
            }

            if self.config.use_auto_item && self.config.is_auto_item_key(key) {
                bare.insert(0, form_encode(value));
            } else {
                pairs.push(form_encode(key));
                pairs.push(form_encode(value));
            }
        }

        bare.extend(pairs);

        let language = (self.config.add_language_to_url && !page.root_language.is_empty())
            .then(|| page.root_language.clone());

        CanonicalUrl {
            language,
            alias: page.alias_or_id(),
            segments: bare,
            suffix: self.config.url_suffix.clone(),
        }
    }

    /// Merges a `key=value&key2=` request string into the current parameters and
    /// composes the URL of `page`
    ///
    /// An empty value removes the key. With `ignore_params` the current parameters
    /// are discarded first.
    pub fn add_to_url(
        &self,
        page: &PageRecord,
        current: &[(String, String)],
        request: &str,
        ignore_params: bool,
        unset: &[&str],
    ) -> CanonicalUrl {
        let mut params: Vec<(String, String)> = if ignore_params {
            Vec::new()
        } else {
            current.to_vec()
        };

        for fragment in REQUEST_SEPARATOR.split(request) {
            let (key, value) = fragment.split_once('=').unwrap_or((fragment, ""));
            let existing = params.iter().position(|(k, _)| k == key);

            match (value.is_empty(), existing) {
                (true, Some(pos)) => {
                    params.remove(pos);
                }
                (true, None) => {}
                (false, Some(pos)) => params[pos].1 = value.to_string(),
                (false, None) => params.push((key.to_string(), value.to_string())),
            }
        }

        self.compose(page, &params, unset)
    }
}
