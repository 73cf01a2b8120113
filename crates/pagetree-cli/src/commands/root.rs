use anyhow::Result;
use colored::Colorize;
use pagetree_router::{parse_accept_language, RootRequest};
use std::path::Path;

use super::{describe_page, load_router, print_error};

pub fn execute(site: &Path, host: &str, language: Option<&str>, accept_language: Option<&str>) -> Result<()> {
    let router = load_router(site)?;
    let languages = accept_language.map(parse_accept_language).unwrap_or_default();

    let request = RootRequest {
        host,
        language,
        accept_language: &languages,
        empty_path: true,
    };

    match router.select_root(request) {
        Ok(selection) => {
            println!("{} {}", "✓".green(), "Root page".green().bold());
            println!("  Page: {}", describe_page(&selection.page));
            println!("  Language: {}", selection.page.language.cyan());
            match selection.redirect {
                Some(redirect) => println!(
                    "  Redirect: {} {}",
                    redirect.status(),
                    redirect.target.cyan()
                ),
                None => println!("  Redirect: {}", "none".dimmed()),
            }
        }
        Err(err) => print_error(&err),
    }

    Ok(())
}
