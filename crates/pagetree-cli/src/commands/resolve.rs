use anyhow::Result;
use colored::Colorize;
use pagetree_router::{RequestContext, Resolution};
use std::path::Path;

use super::{describe_page, load_router, print_error};

pub fn execute(site: &Path, path: &str, host: &str, accept_language: Option<&str>, json: bool) -> Result<()> {
    let router = load_router(site)?;

    let mut request = RequestContext::new(path).with_host(host);
    if let Some(header) = accept_language {
        request = request.with_accept_language(header);
    }

    let resolution = match router.resolve(&request) {
        Ok(resolution) => resolution,
        Err(err) => {
            print_error(&err);
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    match resolution {
        Resolution::Page(resolved) => {
            println!("{} {}", "✓".green(), "Page".green().bold());
            println!("  Page: {}", describe_page(&resolved.page));
            if let Some(language) = &resolved.language {
                println!("  Language: {}", language.cyan());
            }
            if resolved.params.is_empty() {
                println!("  Parameters: {}", "none".dimmed());
            } else {
                println!("  Parameters:");
                for (key, value) in &resolved.params {
                    println!("    {} = {}", key.bold(), value);
                }
            }
        }
        Resolution::Root(root) => {
            println!("{} {}", "✓".green(), "Root page".green().bold());
            println!("  Page: {}", describe_page(&root));
            println!("  Language: {}", root.language.cyan());
        }
        Resolution::Redirect(redirect) => {
            println!("{} {} {}", "→".blue(), "Redirect".blue().bold(), redirect.status());
            println!("  Location: {}", redirect.target.cyan());
        }
    }

    Ok(())
}
