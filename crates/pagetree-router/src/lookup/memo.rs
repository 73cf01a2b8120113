//! Per-request memo over a [`PageLookup`]
//!
//! Lives for one resolution pass and is dropped with it. Nothing is shared across
//! requests; invalidation is the collaborator's business.

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::lookup::PageLookup;
use crate::page::PageRecord;

pub struct MemoLookup<'a, L: PageLookup + ?Sized> {
    inner: &'a L,
    aliases: RefCell<HashMap<Vec<String>, Vec<PageRecord>>>,
    roots: RefCell<HashMap<(String, Vec<String>), Option<PageRecord>>>,
    ids: RefCell<HashMap<u64, Option<PageRecord>>>,
    details: RefCell<HashMap<u64, PageRecord>>,
    children: RefCell<HashMap<u64, Option<PageRecord>>>,
}

impl<'a, L: PageLookup + ?Sized> MemoLookup<'a, L> {
    pub fn new(inner: &'a L) -> Self {
        Self {
            inner,
            aliases: RefCell::new(HashMap::new()),
            roots: RefCell::new(HashMap::new()),
            ids: RefCell::new(HashMap::new()),
            details: RefCell::new(HashMap::new()),
            children: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: PageLookup + ?Sized> PageLookup for MemoLookup<'_, L> {
    fn find_by_aliases(&self, aliases: &[&str]) -> Result<Vec<PageRecord>> {
        let key: Vec<String> = aliases.iter().map(|a| a.to_string()).collect();
        if let Some(hit) = self.aliases.borrow().get(&key) {
            return Ok(hit.clone());
        }

        let pages = self.inner.find_by_aliases(aliases)?;
        self.aliases.borrow_mut().insert(key, pages.clone());
        Ok(pages)
    }

    fn find_root_page(&self, host: &str, languages: &[String]) -> Result<Option<PageRecord>> {
        let key = (host.to_string(), languages.to_vec());
        if let Some(hit) = self.roots.borrow().get(&key) {
            return Ok(hit.clone());
        }

        let root = self.inner.find_root_page(host, languages)?;
        self.roots.borrow_mut().insert(key, root.clone());
        Ok(root)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<PageRecord>> {
        if let Some(hit) = self.ids.borrow().get(&id) {
            return Ok(hit.clone());
        }

        let page = self.inner.find_by_id(id)?;
        self.ids.borrow_mut().insert(id, page.clone());
        Ok(page)
    }

    fn load_details(&self, page: &PageRecord) -> Result<PageRecord> {
        if let Some(hit) = self.details.borrow().get(&page.id) {
            return Ok(hit.clone());
        }

        let details = self.inner.load_details(page)?;
        self.details.borrow_mut().insert(page.id, details.clone());
        Ok(details)
    }

    fn first_published_child(&self, pid: u64) -> Result<Option<PageRecord>> {
        if let Some(hit) = self.children.borrow().get(&pid) {
            return Ok(hit.clone());
        }

        let child = self.inner.first_published_child(pid)?;
        self.children.borrow_mut().insert(pid, child.clone());
        Ok(child)
    }
}
