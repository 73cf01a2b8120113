//! In-memory page store
//!
//! Keeps pages in insertion order, which stands in for the tree's sorting order.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::config::SiteFile;
use crate::language::NO_PREFERENCE;
use crate::lookup::PageLookup;
use crate::page::{PageRecord, PageType};

/// In-memory page store
///
/// Fast and non-persistent. Visibility checks use the wall clock unless a fixed
/// time is set with [`MemoryPageStore::with_clock`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    pages: Vec<PageRecord>,
    index: HashMap<u64, usize>,
    now: Option<DateTime<Utc>>,
}

impl MemoryPageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a list of pages (order is kept)
    pub fn from_pages(pages: impl IntoIterator<Item = PageRecord>) -> Self {
        pages.into_iter().fold(Self::new(), |store, page| store.with_page(page))
    }

    /// Create a store from a parsed site file
    pub fn from_site(site: &SiteFile) -> Self {
        Self::from_pages(site.pages.iter().cloned())
    }

    /// Adds a page (functional builder)
    pub fn with_page(mut self, page: PageRecord) -> Self {
        self.insert(page);
        self
    }

    /// Pins the time used for visibility checks
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Adds or replaces a page; a replaced page keeps its position
    pub fn insert(&mut self, page: PageRecord) {
        match self.index.get(&page.id) {
            Some(&pos) => self.pages[pos] = page,
            None => {
                self.index.insert(page.id, self.pages.len());
                self.pages.push(page);
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&PageRecord> {
        self.index.get(&id).map(|&pos| &self.pages[pos])
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Root page of `page` following the parent chain, plus the trail root → page
    fn walk_to_root<'a>(&'a self, page: &'a PageRecord) -> Result<(&'a PageRecord, Vec<u64>)> {
        let mut trail = vec![page.id];
        let mut current = self.get(page.id).unwrap_or(page);

        while current.page_type != PageType::Root && current.pid != 0 {
            let Some(parent) = self.get(current.pid) else {
                bail!("page {} references missing parent {}", current.id, current.pid);
            };
            if trail.contains(&parent.id) {
                bail!("page {} is part of a parent cycle", parent.id);
            }
            trail.push(parent.id);
            current = parent;
        }

        trail.reverse();
        Ok((current, trail))
    }
}

impl PageLookup for MemoryPageStore {
    fn find_by_aliases(&self, aliases: &[&str]) -> Result<Vec<PageRecord>> {
        let now = self.now();
        Ok(self
            .pages
            .iter()
            .filter(|page| !page.alias.is_empty() && aliases.contains(&page.alias.as_str()))
            .filter(|page| page.is_visible_at(now))
            .cloned()
            .collect())
    }

    fn find_root_page(&self, host: &str, languages: &[String]) -> Result<Option<PageRecord>> {
        let now = self.now();

        // Rank by (domain, language, storage position), lowest wins
        let best = self
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_root() && page.is_visible_at(now))
            .filter(|(_, page)| page.domain.is_empty() || page.domain == host)
            .filter_map(|(pos, page)| {
                let language_rank = languages
                    .iter()
                    .filter(|lang| lang.as_str() != NO_PREFERENCE)
                    .position(|lang| *lang == page.language)
                    .or_else(|| page.fallback.then_some(languages.len()))?;
                let domain_rank = usize::from(page.domain.is_empty());
                Some(((domain_rank, language_rank, pos), page))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, page)| page.clone());

        Ok(best)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<PageRecord>> {
        let now = self.now();
        Ok(self.get(id).filter(|page| page.is_visible_at(now)).cloned())
    }

    fn load_details(&self, page: &PageRecord) -> Result<PageRecord> {
        let (root, trail) = self.walk_to_root(page)?;

        let mut details = page.clone();
        details.root_id = root.id;
        details.root_domain = root.domain.clone();
        details.root_language = root.language.clone();
        details.root_is_fallback = root.fallback;
        details.trail = trail;
        Ok(details)
    }

    fn first_published_child(&self, pid: u64) -> Result<Option<PageRecord>> {
        let now = self.now();
        Ok(self
            .pages
            .iter()
            .find(|page| page.pid == pid && page.is_visible_at(now))
            .cloned())
    }
}
