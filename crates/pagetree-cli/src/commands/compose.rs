use anyhow::{anyhow, Context, Result};
use pagetree_router::PageLookup;
use std::path::Path;

use super::load_router;

pub fn execute(site: &Path, page: u64, params: &[String], unset: &[String]) -> Result<()> {
    let router = load_router(site)?;

    let page = router
        .lookup()
        .get(page)
        .cloned()
        .ok_or_else(|| anyhow!("page {} not found in {:?}", page, site))?;
    let page = router.lookup().load_details(&page)?;

    let params = params
        .iter()
        .map(|param| parse_param(param))
        .collect::<Result<Vec<_>>>()?;
    let unset: Vec<&str> = unset.iter().map(String::as_str).collect();

    let url = router
        .compose_url(&page, &params, &unset)
        .context("Failed to compose URL")?;
    println!("{}", url);

    Ok(())
}

fn parse_param(param: &str) -> Result<(String, String)> {
    let (key, value) = param
        .split_once('=')
        .ok_or_else(|| anyhow!("parameter must be KEY=VALUE, got {:?}", param))?;
    Ok((key.to_string(), value.to_string()))
}
