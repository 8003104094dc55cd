//! Strip scripts, styles and meta tags from a cached HTML page

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use stock_fixture_tools::html_cleaner::{clean_file, CleanerPolicy};
use stock_fixture_tools::models::Config;

/// Clean a cached HTML page for use as a test fixture
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTML page to clean (defaults to HTML_SOURCE_PATH or the Yahoo Finance SPY mock)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Where to write the cleaned page (defaults to HTML_CLEAN_PATH)
    #[arg(short, long)]
    dest: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_fixture_tools=info,clean_html=info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = Config::from_env();
    let source = args.source.unwrap_or(config.html_source_path);
    let dest = args.dest.unwrap_or(config.html_clean_path);

    info!("🧹 Cleaning {} -> {}", source.display(), dest.display());

    let written = clean_file(&source, &dest, &CleanerPolicy::fixture())
        .with_context(|| format!("failed to clean {}", source.display()))?;

    info!("✅ Cleaned page written ({} bytes)", written);
    Ok(())
}
