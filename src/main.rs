// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, so stdout only carries results)
// 2. Parse command-line arguments using clap
// 3. Build a fetcher and a crawler for the chosen subcommand
// 4. Print every report as it arrives, until the crawl closes its stream
// 5. Exit with 0 (fetch failures are results, not errors) or 2 on setup errors
//
// Ctrl-C cancels the crawl: in-flight fetches are abandoned, and the
// reports already produced are still printed.
// =============================================================================

mod cli;
mod output;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use link_crawler::crawl::{Crawl, Crawler};
use link_crawler::fetch::{FakeFetcher, Fetcher, HttpFetcher, DEMO_SEED};
use output::{format_report, Summary};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG controls verbosity (e.g. RUST_LOG=link_crawler=debug), default info
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let (fetcher, seed, config, json) = match cli.command {
        Commands::Demo { max_depth, options } => {
            let fetcher: Arc<dyn Fetcher> = Arc::new(FakeFetcher::demo());
            (fetcher, DEMO_SEED.to_string(), options.config(max_depth), options.json)
        }
        Commands::Site {
            url,
            max_depth,
            same_domain,
            timeout_secs,
            options,
        } => {
            let mut http = HttpFetcher::new(Duration::from_secs(timeout_secs))?;
            if same_domain {
                http = http.same_domain_as(&url)?;
            }
            let fetcher: Arc<dyn Fetcher> = Arc::new(http);
            (fetcher, url, options.config(max_depth), options.json)
        }
    };

    let crawler = Crawler::new(fetcher, config);
    let crawl = crawler.start(seed);
    cancel_on_ctrl_c(&crawl);

    let summary = print_reports(crawl, json).await?;
    tracing::info!("{}", summary);
    Ok(())
}

fn cancel_on_ctrl_c(crawl: &Crawl) {
    let cancel = crawl.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling crawl");
            cancel.cancel();
        }
    });
}

// Prints reports one per line until the crawl is over
async fn print_reports(crawl: Crawl, json: bool) -> Result<Summary> {
    let reports = crawl.into_stream();
    futures::pin_mut!(reports);

    let mut summary = Summary::default();
    while let Some(report) = reports.next().await {
        summary.record(&report);
        println!("{}", format_report(&report, json)?);
    }
    Ok(summary)
}
