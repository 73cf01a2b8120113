//! Alias matching
//!
//! Splits a normalized path into the page alias and the parameter fragments.
//! The two URL modes are a strategy chosen once per configuration:
//!
//! - [`UrlMode::Flat`]: the first segment is the alias.
//! - [`UrlMode::Hierarchical`]: the longest existing alias prefix wins
//!   (`news/archive/item` tries `news/archive/item`, `news/archive`, `news`),
//!   falling back to flat splitting when no alias matches.

use tracing::debug;

use crate::config::{RouterConfig, UrlMode};
use crate::disambiguate::Disambiguator;
use crate::error::Result;
use crate::lookup::PageLookup;
use crate::page::PageRecord;
use crate::path::{AliasHierarchy, NormalizedPath};

/// Result of alias matching
#[derive(Debug, Clone, PartialEq)]
pub struct AliasMatch {
    /// `[alias, tail...]`
    pub fragments: Vec<String>,
    /// Page selected during hierarchical matching. Flat matches leave the
    /// existence check to the caller.
    pub page: Option<PageRecord>,
}

impl AliasMatch {
    fn flat(path: &str) -> Self {
        Self {
            fragments: path.split('/').map(str::to_string).collect(),
            page: None,
        }
    }

    pub fn alias(&self) -> &str {
        self.fragments.first().map_or("", String::as_str)
    }
}

pub struct AliasMatcher<'c> {
    config: &'c RouterConfig,
    mode: UrlMode,
}

impl<'c> AliasMatcher<'c> {
    pub fn new(config: &'c RouterConfig) -> Self {
        Self {
            config,
            mode: config.url_mode(),
        }
    }

    /// Matches a normalized path for the given request host
    pub fn match_path<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        path: &NormalizedPath,
        host: &str,
    ) -> Result<AliasMatch> {
        match self.mode {
            UrlMode::Hierarchical if path.path.contains('/') => {
                match self.match_hierarchical(lookup, path, host)? {
                    Some(found) => Ok(found),
                    None => Ok(AliasMatch::flat(&path.path)),
                }
            }
            _ => Ok(AliasMatch::flat(&path.path)),
        }
    }

    /// `Ok(None)` when no page carries any of the candidate aliases
    fn match_hierarchical<L: PageLookup + ?Sized>(
        &self,
        lookup: &L,
        path: &NormalizedPath,
        host: &str,
    ) -> Result<Option<AliasMatch>> {
        let candidates: Vec<&str> = AliasHierarchy::new(&path.path).collect();
        let mut pages = lookup.find_by_aliases(&candidates)?;

        if pages.is_empty() {
            debug!(path = %path.path, "no folder alias matched, splitting flat");
            return Ok(None);
        }

        // Longest alias first, storage order among equals
        pages.sort_by_key(|page| {
            candidates
                .iter()
                .position(|c| *c == page.alias)
                .unwrap_or(usize::MAX)
        });

        let page = Disambiguator::new(self.config).select(
            lookup,
            &pages,
            host,
            path.language.as_deref(),
        )?;

        let fragments = split_after_alias(&path.path, &page.alias);
        debug!(alias = %page.alias, id = page.id, "folder alias matched");

        Ok(Some(AliasMatch {
            fragments,
            page: Some(page),
        }))
    }
}

/// `[alias, rest...]` for a path that starts with `alias`
fn split_after_alias(path: &str, alias: &str) -> Vec<String> {
    let mut fragments = vec![alias.to_string()];
    if path != alias {
        let rest = path.get(alias.len() + 1..).unwrap_or("");
        fragments.extend(rest.split('/').map(str::to_string));
    }
    fragments
}
