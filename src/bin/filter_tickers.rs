//! Reduce the supported tickers file to NASDAQ/NYSE listings with complete data

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use stock_fixture_tools::models::Config;
use stock_fixture_tools::ticker_filter::filter_file;

/// Filter the supported tickers CSV in place
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tickers CSV to rewrite (defaults to SUPPORTED_TICKERS_PATH)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_fixture_tools=info,filter_tickers=info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let path = args.file.unwrap_or(Config::from_env().tickers_path);
    info!("📋 Filtering supported tickers in {}", path.display());

    let report = filter_file(&path, &mut io::stdout().lock())
        .with_context(|| format!("failed to filter {}", path.display()))?;

    info!("✅ Kept {} rows in {}", report.retained, report.path.display());
    Ok(())
}
