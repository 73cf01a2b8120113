//! Domain and language disambiguation
//!
//! Several site roots may share an alias. Candidates are grouped by the domain of
//! their root (empty domain = `*`) and then by root language; the host picks the
//! domain group, the URL language (if any) picks the language group, and the first
//! entry of that group wins.

use tracing::debug;

use crate::config::RouterConfig;
use crate::error::{Result, RouteError};
use crate::lookup::PageLookup;
use crate::page::PageRecord;

/// Key for wildcard domains and the fallback-language bucket
pub const WILDCARD: &str = "*";

/// Pages of one domain grouped by root language, in insertion order
#[derive(Debug, Clone, Default)]
pub struct LanguageBuckets {
    buckets: Vec<(String, Vec<PageRecord>)>,
}

impl LanguageBuckets {
    fn push(&mut self, language: &str, page: PageRecord) {
        match self.buckets.iter_mut().find(|(lang, _)| lang == language) {
            Some((_, pages)) => pages.push(page),
            None => self.buckets.push((language.to_string(), vec![page])),
        }
    }

    /// Pages of a language bucket (`*` for the fallback bucket)
    pub fn get(&self, language: &str) -> Option<&[PageRecord]> {
        self.buckets
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, pages)| pages.as_slice())
    }

    /// The first bucket that was created
    pub fn first(&self) -> Option<&[PageRecord]> {
        self.buckets.first().map(|(_, pages)| pages.as_slice())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(lang, _)| lang.as_str())
    }
}

/// Candidates grouped by domain → language → pages
///
/// Built for one disambiguation and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct AliasCandidateSet {
    domains: Vec<(String, LanguageBuckets)>,
}

impl AliasCandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups pages whose details (root domain/language/fallback) are loaded
    pub fn from_pages(pages: impl IntoIterator<Item = PageRecord>) -> Self {
        let mut set = Self::new();
        for page in pages {
            set.insert(page);
        }
        set
    }

    /// Adds a page under its domain and language, and under `*` when its root is
    /// the fallback language
    pub fn insert(&mut self, page: PageRecord) {
        let domain = page.domain_key().to_string();
        let pos = match self.domains.iter().position(|(d, _)| *d == domain) {
            Some(pos) => pos,
            None => {
                self.domains.push((domain, LanguageBuckets::default()));
                self.domains.len() - 1
            }
        };

        let buckets = &mut self.domains[pos].1;
        if page.root_is_fallback {
            buckets.push(WILDCARD, page.clone());
        }
        let language = page.root_language.clone();
        buckets.push(&language, page);
    }

    pub fn domain(&self, key: &str) -> Option<&LanguageBuckets> {
        self.domains
            .iter()
            .find(|(domain, _)| domain == key)
            .map(|(_, buckets)| buckets)
    }

    /// Domain group for `host`, falling back to the wildcard group
    pub fn for_host(&self, host: &str) -> Option<&LanguageBuckets> {
        self.domain(host).or_else(|| self.domain(WILDCARD))
    }
}

/// Picks exactly one page out of alias candidates
pub struct Disambiguator<'c> {
    config: &'c RouterConfig,
}

impl<'c> Disambiguator<'c> {
    pub fn new(config: &'c RouterConfig) -> Self {
        Self { config }
    }

    /// Selects the authoritative page for a host and URL language
    ///
    /// `candidates` must already be ordered by preference (longest alias first);
    /// the order survives grouping.
    pub fn select<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        candidates: &[PageRecord],
        host: &str,
        language: Option<&str>,
    ) -> Result<PageRecord> {
        let detailed = candidates
            .iter()
            .map(|page| lookup.load_details(page))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let set = AliasCandidateSet::from_pages(detailed);
        self.select_from(&set, host, language)
    }

    /// Selection over an already grouped candidate set
    pub fn select_from(
        &self,
        set: &AliasCandidateSet,
        host: &str,
        language: Option<&str>,
    ) -> Result<PageRecord> {
        let Some(buckets) = set.for_host(host) else {
            debug!(host, "no candidate page for host");
            return Err(RouteError::not_found(format!("no page for host \"{host}\"")));
        };

        let pages = if !self.config.add_language_to_url {
            // First configured root wins
            buckets.first()
        } else {
            match language {
                Some(lang) => buckets.get(lang),
                None => None,
            }
        };

        match pages.and_then(|pages| pages.first()) {
            Some(page) => Ok(page.clone()),
            None => {
                debug!(host, ?language, "no candidate page for language");
                Err(RouteError::not_found(format!(
                    "no page for host \"{}\" and language \"{}\"",
                    host,
                    language.unwrap_or_default()
                )))
            }
        }
    }
}
