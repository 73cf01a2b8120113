// File: src/router.rs
// Purpose: Request resolution pipeline tying the routing stages together

use serde::Serialize;
use tracing::debug;

use crate::alias::AliasMatcher;
use crate::compose::{CanonicalUrl, UrlComposer, LANGUAGE_KEY};
use crate::config::RouterConfig;
use crate::disambiguate::Disambiguator;
use crate::error::{Result, RouteError};
use crate::fragment::{apply_transformers, FragmentBuilder, FragmentTransformer};
use crate::language::parse_accept_language;
use crate::lookup::{MemoLookup, PageLookup};
use crate::page::PageRecord;
use crate::path::{normalize_request, relative_request, Normalized, NormalizedPath};
use crate::root::{Redirect, RootPageSelector, RootRequest, RootSelection};

/// What the HTTP layer knows about an incoming request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw request path, query string included
    pub path: String,
    pub host: String,
    /// Accepted languages, most preferred first
    pub accept_language: Vec<String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the accepted languages from a raw `Accept-Language` header
    pub fn with_accept_language(mut self, header: &str) -> Self {
        self.accept_language = parse_accept_language(header);
        self
    }
}

/// A request resolved to a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    /// Normalized path the resolution started from
    pub path: String,
    /// Language from the URL prefix
    pub language: Option<String>,
    /// Alias (or numeric id) the request addressed
    pub alias: String,
    pub page: PageRecord,
    /// Decoded parameters in path order
    pub params: Vec<(String, String)>,
}

impl ResolvedRequest {
    /// Value of a path parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Successful outcome of [`PageRouter::resolve`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Resolution {
    /// A content page with its parameters
    Page(ResolvedRequest),
    /// The site root was requested and stands as the page
    Root(PageRecord),
    /// The client must be redirected before anything is rendered
    Redirect(Redirect),
}

/// Front-end router over a page lookup
///
/// # Examples
///
/// ```
/// use pagetree_router::{MemoryPageStore, PageRecord, PageRouter, RequestContext, Resolution, RouterConfig};
///
/// let store = MemoryPageStore::from_pages([
///     PageRecord::root(1, "home", "", "en").with_fallback(true),
///     PageRecord::new(2, 1, "news"),
/// ]);
/// let router = PageRouter::new(RouterConfig::default(), store);
///
/// let request = RequestContext::new("/news/page/2.html").with_host("example.org");
/// match router.resolve(&request).unwrap() {
///     Resolution::Page(resolved) => {
///         assert_eq!(resolved.page.id, 2);
///         assert_eq!(resolved.param("page"), Some("2"));
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub struct PageRouter<L: PageLookup> {
    config: RouterConfig,
    lookup: L,
    transformers: Vec<FragmentTransformer>,
}

impl<L: PageLookup> PageRouter<L> {
    pub fn new(config: RouterConfig, lookup: L) -> Self {
        Self {
            config,
            lookup,
            transformers: Vec::new(),
        }
    }

    /// Appends a fragment transformer; transformers run in registration order
    pub fn with_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolves a request to a page, the site root, or a redirect
    ///
    /// Request-shape failures (`InvalidRequest`, `NotFound`, `DuplicateParameter`,
    /// `ReservedKeyCollision`) should all become a 404; see [`RouteError::is_not_found`].
    pub fn resolve(&self, request: &RequestContext) -> Result<Resolution> {
        let lookup = MemoLookup::new(&self.lookup);

        self.resolve_with(&lookup, request).map_err(|err| {
            if err.is_not_found() {
                debug!(path = %request.path, host = %request.host, error = %err, "request rejected");
            }
            err
        })
    }

    fn resolve_with<M: PageLookup + ?Sized>(&self, lookup: &M, request: &RequestContext) -> Result<Resolution> {
        match normalize_request(&request.path, &self.config)? {
            Normalized::DeferToRoot { language } => {
                let empty_path = relative_request(&request.path).is_empty();
                self.resolve_root(lookup, request, language.as_deref(), empty_path)
            }
            Normalized::Path(path) => self.resolve_path(lookup, request, path),
        }
    }

    fn resolve_root<M: PageLookup + ?Sized>(
        &self,
        lookup: &M,
        request: &RequestContext,
        language: Option<&str>,
        empty_path: bool,
    ) -> Result<Resolution> {
        let selection = RootPageSelector::new(&self.config).select(
            lookup,
            RootRequest {
                host: &request.host,
                language,
                accept_language: &request.accept_language,
                empty_path,
            },
        )?;

        Ok(match selection.redirect {
            Some(redirect) => Resolution::Redirect(redirect),
            None => Resolution::Root(selection.page),
        })
    }

    fn resolve_path<M: PageLookup + ?Sized>(
        &self,
        lookup: &M,
        request: &RequestContext,
        path: NormalizedPath,
    ) -> Result<Resolution> {
        let matched = AliasMatcher::new(&self.config).match_path(lookup, &path, &request.host)?;
        let fragments = apply_transformers(matched.fragments, &self.transformers);

        let taken: &[&str] = if path.language.is_some() { &[LANGUAGE_KEY] } else { &[] };
        let built = FragmentBuilder::new(&self.config).build(fragments, taken)?;

        if built.alias.is_empty() {
            return self.resolve_root(lookup, request, path.language.as_deref(), false);
        }

        let page = match matched.page {
            Some(page) if page.alias == built.alias => page,
            _ => self.find_page(lookup, &built.alias, &request.host, path.language.as_deref())?,
        };

        debug!(alias = %built.alias, id = page.id, params = built.params.len(), "request resolved");

        Ok(Resolution::Page(ResolvedRequest {
            path: path.path,
            language: path.language,
            alias: built.alias,
            page,
            params: built.params,
        }))
    }

    /// Looks up the page behind an alias (or numeric id) and disambiguates it
    fn find_page<M: PageLookup + ?Sized>(
        &self,
        lookup: &M,
        alias: &str,
        host: &str,
        language: Option<&str>,
    ) -> Result<PageRecord> {
        let mut candidates = lookup.find_by_aliases(&[alias])?;

        if candidates.is_empty() {
            if let Ok(id) = alias.parse::<u64>() {
                candidates.extend(lookup.find_by_id(id)?);
            }
        }

        if candidates.is_empty() {
            return Err(RouteError::not_found(format!("no page with alias \"{alias}\"")));
        }

        Disambiguator::new(&self.config).select(lookup, &candidates, host, language)
    }

    /// Selects the root page for a host and language outside of a resolution
    pub fn select_root(&self, request: RootRequest<'_>) -> Result<RootSelection> {
        let lookup = MemoLookup::new(&self.lookup);
        RootPageSelector::new(&self.config).select(&lookup, request)
    }

    /// Canonical URL of `page` with `params`, minus the keys in `unset`
    ///
    /// Loads the page details first when the language segment needs them.
    pub fn compose_url(
        &self,
        page: &PageRecord,
        params: &[(String, String)],
        unset: &[&str],
    ) -> Result<CanonicalUrl> {
        let page = self.with_details(page)?;
        Ok(UrlComposer::new(&self.config).compose(&page, params, unset))
    }

    /// Merges a `key=value&...` request string into `current` and composes the URL
    /// of `page`
    pub fn add_to_url(
        &self,
        page: &PageRecord,
        current: &[(String, String)],
        request: &str,
        ignore_params: bool,
        unset: &[&str],
    ) -> Result<CanonicalUrl> {
        let page = self.with_details(page)?;
        Ok(UrlComposer::new(&self.config).add_to_url(&page, current, request, ignore_params, unset))
    }

    fn with_details(&self, page: &PageRecord) -> Result<PageRecord> {
        if self.config.add_language_to_url && page.root_language.is_empty() {
            Ok(self.lookup.load_details(page)?)
        } else {
            Ok(page.clone())
        }
    }
}
