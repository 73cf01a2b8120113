pub mod compose;
pub mod resolve;
pub mod root;

use anyhow::Result;
use colored::Colorize;
use pagetree_router::{MemoryPageStore, PageRecord, PageRouter, RouteError, SiteFile};
use std::path::Path;

/// Loads a site file and builds a router over its pages
pub fn load_router(site: &Path) -> Result<PageRouter<MemoryPageStore>> {
    let site = SiteFile::load(site)?;
    let store = MemoryPageStore::from_site(&site);
    Ok(PageRouter::new(site.routing, store))
}

/// One-line description of a page
pub fn describe_page(page: &PageRecord) -> String {
    let alias = if page.alias.is_empty() {
        "(no alias)".dimmed().to_string()
    } else {
        page.alias.cyan().to_string()
    };
    format!("#{} {}", page.id, alias)
}

/// Prints a routing error with its class
pub fn print_error(err: &RouteError) {
    let class = format!("{:?}", err.class()).to_lowercase();
    if err.is_not_found() {
        println!("{} {} ({})", "✗".yellow(), "Not found".yellow().bold(), class);
    } else {
        println!("{} {} ({})", "✗".red(), "Failed".red().bold(), class);
    }
    println!("  {}", err.to_string().dimmed());
}
