//! Page lookup seam
//!
//! The router never owns page data. Everything it needs from storage goes through
//! [`PageLookup`]; [`MemoryPageStore`] is the in-process implementation used by the
//! CLI and the tests, [`MemoLookup`] caches repeated calls within one resolution.

use anyhow::Result;

use crate::page::PageRecord;

pub mod memo;
pub mod memory;

pub use memo::MemoLookup;
pub use memory::MemoryPageStore;

/// Trait for page-lookup collaborators
pub trait PageLookup {
    /// Visible pages whose alias equals one of `aliases` (batched lookup)
    fn find_by_aliases(&self, aliases: &[&str]) -> Result<Vec<PageRecord>>;

    /// Best published root page for a host and an ordered language list
    ///
    /// Roots whose domain equals `host` win over roots without a domain. Within
    /// those, the first language of `languages` that has a root wins; a root marked
    /// as fallback is used when none does. The entry `-` matches no language.
    fn find_root_page(&self, host: &str, languages: &[String]) -> Result<Option<PageRecord>>;

    /// Visible page by numeric id (pages without an alias are addressed this way)
    fn find_by_id(&self, id: u64) -> Result<Option<PageRecord>>;

    /// Fills trail, root id, root domain, root language and fallback flag
    fn load_details(&self, page: &PageRecord) -> Result<PageRecord>;

    /// First visible child of `pid` in tree order
    fn first_published_child(&self, pid: u64) -> Result<Option<PageRecord>>;
}

impl<T: PageLookup + ?Sized> PageLookup for &T {
    fn find_by_aliases(&self, aliases: &[&str]) -> Result<Vec<PageRecord>> {
        (**self).find_by_aliases(aliases)
    }

    fn find_root_page(&self, host: &str, languages: &[String]) -> Result<Option<PageRecord>> {
        (**self).find_root_page(host, languages)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<PageRecord>> {
        (**self).find_by_id(id)
    }

    fn load_details(&self, page: &PageRecord) -> Result<PageRecord> {
        (**self).load_details(page)
    }

    fn first_published_child(&self, pid: u64) -> Result<Option<PageRecord>> {
        (**self).first_published_child(pid)
    }
}
