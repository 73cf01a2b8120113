//! Root page selection
//!
//! Runs when the request names no page: picks the root page for the host and the
//! negotiated language, and decides whether the client has to be redirected first.

use serde::Serialize;
use tracing::{debug, error};

use crate::compose::UrlComposer;
use crate::config::RouterConfig;
use crate::error::{Result, RouteError};
use crate::language::NO_PREFERENCE;
use crate::lookup::PageLookup;
use crate::page::PageRecord;

/// Kind of redirect the caller must issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RedirectKind {
    /// 301
    Permanent,
    /// 302
    Temporary,
}

impl RedirectKind {
    pub fn status(self) -> u16 {
        match self {
            Self::Permanent => 301,
            Self::Temporary => 302,
        }
    }
}

/// Redirect instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub kind: RedirectKind,
    /// Target path, starting with `/`
    pub target: String,
}

impl Redirect {
    pub fn permanent(target: impl Into<String>) -> Self {
        Self {
            kind: RedirectKind::Permanent,
            target: target.into(),
        }
    }

    pub fn temporary(target: impl Into<String>) -> Self {
        Self {
            kind: RedirectKind::Temporary,
            target: target.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }
}

/// Input of a root selection
#[derive(Debug, Clone, Copy)]
pub struct RootRequest<'r> {
    pub host: &'r str,
    /// Language from the URL prefix
    pub language: Option<&'r str>,
    /// Parsed Accept-Language list, most preferred first
    pub accept_language: &'r [String],
    /// Whether the request path was empty (`/`)
    pub empty_path: bool,
}

/// Selected root plus an optional redirect
#[derive(Debug, Clone, PartialEq)]
pub struct RootSelection {
    pub page: PageRecord,
    pub redirect: Option<Redirect>,
}

/// Aliases that mark the start page of a root (no redirect needed)
const INDEX_ALIASES: [&str; 2] = ["index", "/"];

pub struct RootPageSelector<'c> {
    config: &'c RouterConfig,
}

impl<'c> RootPageSelector<'c> {
    pub fn new(config: &'c RouterConfig) -> Self {
        Self { config }
    }

    /// Selects the root page for a request
    ///
    /// # Errors
    ///
    /// `NoRootPageFound` when the tree has no published root for the host and
    /// languages. This is always logged.
    pub fn select<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        request: RootRequest<'_>,
    ) -> Result<RootSelection> {
        if let (Some(language), true) = (request.language, self.config.add_language_to_url) {
            let languages = vec![language.to_string()];
            let page = self.find_root(lookup, request.host, languages)?;
            return Ok(RootSelection {
                page,
                redirect: None,
            });
        }

        let languages = if self.config.add_language_to_url && self.config.do_not_redirect_empty {
            vec![NO_PREFERENCE.to_string()]
        } else {
            request.accept_language.to_vec()
        };

        let page = self.find_root(lookup, request.host, languages)?;

        let redirect = if request.empty_path {
            self.redirect_for(lookup, &page)?
        } else {
            None
        };

        Ok(RootSelection { page, redirect })
    }

    fn find_root<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        host: &str,
        languages: Vec<String>,
    ) -> Result<PageRecord> {
        match lookup.find_root_page(host, &languages)? {
            Some(page) => Ok(page),
            None => {
                error!(host, languages = %languages.join(", "), "No root page found");
                Err(RouteError::NoRootPageFound {
                    host: host.to_string(),
                    languages,
                })
            }
        }
    }

    /// Redirect decision for an empty request path
    fn redirect_for<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        root: &PageRecord,
    ) -> Result<Option<Redirect>> {
        if self.config.redirect_empty_to_language_root() {
            let target = format!("/{}/", root.language);
            debug!(%target, "redirecting to language root");
            return Ok(Some(Redirect::permanent(target)));
        }

        let Some(child) = lookup.first_published_child(root.id)? else {
            return Ok(None);
        };

        if INDEX_ALIASES.contains(&child.alias.as_str()) {
            return Ok(None);
        }

        let child = lookup.load_details(&child)?;
        let target = UrlComposer::new(self.config).compose(&child, &[], &[]).to_string();
        debug!(%target, "redirecting to first page of root");
        Ok(Some(Redirect::temporary(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::MemoryPageStore;

    fn request<'r>(host: &'r str, language: Option<&'r str>, accept: &'r [String], empty: bool) -> RootRequest<'r> {
        RootRequest {
            host,
            language,
            accept_language: accept,
            empty_path: empty,
        }
    }

    fn store() -> MemoryPageStore {
        MemoryPageStore::from_pages([
            PageRecord::root(1, "en-root", "a.example", "en").with_fallback(true),
            PageRecord::new(2, 1, "index"),
            PageRecord::root(10, "de-root", "a.example", "de"),
            PageRecord::new(11, 10, "startseite"),
        ])
    }

    #[test]
    fn test_accept_language_negotiation() {
        let config = RouterConfig::default();
        let accept = vec!["de".to_string(), "en".to_string()];
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", None, &accept, false))
            .unwrap();
        assert_eq!(selection.page.id, 10);
        assert_eq!(selection.redirect, None);
    }

    #[test]
    fn test_index_child_does_not_redirect() {
        let config = RouterConfig::default();
        let accept = vec!["en".to_string()];
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", None, &accept, true))
            .unwrap();
        assert_eq!(selection.page.id, 1);
        assert_eq!(selection.redirect, None);
    }

    #[test]
    fn test_other_child_redirects_temporarily() {
        let config = RouterConfig::default();
        let accept = vec!["de".to_string()];
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", None, &accept, true))
            .unwrap();
        assert_eq!(selection.redirect, Some(Redirect::temporary("/startseite.html")));
        assert_eq!(selection.redirect.unwrap().status(), 302);
    }

    #[test]
    fn test_language_prefix_redirects_permanently() {
        let config = RouterConfig::default().with_language_prefix(true);
        let accept = vec!["de".to_string()];
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", None, &accept, true))
            .unwrap();
        assert_eq!(selection.redirect, Some(Redirect::permanent("/de/")));
    }

    #[test]
    fn test_do_not_redirect_empty_uses_fallback_root() {
        let config = RouterConfig::default()
            .with_language_prefix(true)
            .with_redirect_empty(false);
        let accept = vec!["de".to_string()];
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", None, &accept, true))
            .unwrap();
        assert_eq!(selection.page.id, 1);
        assert_eq!(selection.redirect, None);
    }

    #[test]
    fn test_explicit_language() {
        let config = RouterConfig::default().with_language_prefix(true);
        let selection = RootPageSelector::new(&config)
            .select(&store(), request("a.example", Some("de"), &[], false))
            .unwrap();
        assert_eq!(selection.page.id, 10);
        assert_eq!(selection.redirect, None);
    }

    #[test]
    fn test_explicit_language_without_root_fails() {
        let config = RouterConfig::default().with_language_prefix(true);
        let store = MemoryPageStore::from_pages([PageRecord::root(1, "r", "", "en")]);
        let err = RootPageSelector::new(&config)
            .select(&store, request("a.example", Some("fr"), &["en".to_string()], false))
            .unwrap_err();
        assert!(matches!(err, RouteError::NoRootPageFound { ref languages, .. } if languages == &["fr".to_string()]));
    }

    #[test]
    fn test_unconfigured_host_fails() {
        let config = RouterConfig::default();
        let store = MemoryPageStore::from_pages([PageRecord::root(1, "r", "a.example", "en")]);
        let err = RootPageSelector::new(&config)
            .select(&store, request("c.example", None, &["en".to_string()], true))
            .unwrap_err();
        assert!(matches!(err, RouteError::NoRootPageFound { ref host, .. } if host == "c.example"));
    }
}
