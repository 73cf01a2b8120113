mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "pagetree")]
#[command(version, about = "Pagetree CLI - resolve and compose page URLs of a site tree", long_about = None)]
struct Cli {
    /// Print routing decisions (debug log level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request path to a page, root or redirect
    Resolve {
        /// Request path, e.g. /en/news/page/2.html
        path: String,

        /// Site definition file (TOML)
        #[arg(short, long, default_value = "site.toml")]
        site: PathBuf,

        /// Request host
        #[arg(long, default_value = "")]
        host: String,

        /// Raw Accept-Language header
        #[arg(short, long)]
        accept_language: Option<String>,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose the canonical URL of a page
    Compose {
        /// Site definition file (TOML)
        #[arg(short, long, default_value = "site.toml")]
        site: PathBuf,

        /// Page id
        #[arg(short, long)]
        page: u64,

        /// Parameter as key=value (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Parameter key to leave out (repeatable)
        #[arg(long)]
        unset: Vec<String>,
    },

    /// Show which root page a host and language select
    Root {
        /// Site definition file (TOML)
        #[arg(short, long, default_value = "site.toml")]
        site: PathBuf,

        /// Request host
        #[arg(long, default_value = "")]
        host: String,

        /// Language from the URL prefix
        #[arg(short, long)]
        language: Option<String>,

        /// Raw Accept-Language header
        #[arg(short, long)]
        accept_language: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Resolve {
            path,
            site,
            host,
            accept_language,
            json,
        } => {
            commands::resolve::execute(&site, &path, &host, accept_language.as_deref(), json)?;
        }
        Commands::Compose {
            site,
            page,
            params,
            unset,
        } => {
            commands::compose::execute(&site, page, &params, &unset)?;
        }
        Commands::Root {
            site,
            host,
            language,
            accept_language,
        } => {
            commands::root::execute(&site, &host, language.as_deref(), accept_language.as_deref())?;
        }
    }

    Ok(())
}
