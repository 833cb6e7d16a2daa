// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is also the whole configuration surface of the crawler: depth,
// concurrency limit, buffer size, output format and HTTP timeout all come
// from flags here.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definitions
// - #[command(flatten)]: share one group of flags between subcommands
// =============================================================================

use clap::{Args, Parser, Subcommand};
use link_crawler::crawl::{CrawlConfig, DEFAULT_BUFFER, DEFAULT_MAX_DEPTH};

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a graph of linked documents concurrently, up to a fixed depth",
    long_about = "link-crawler fetches a seed document, then every document it links to, \
                  and so on until the depth budget runs out. Each document is fetched once, \
                  in parallel with its siblings, and reported as soon as it arrives."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the built-in demo site (no network needed)
    ///
    /// Example: link-crawler demo --max-depth 4
    Demo {
        /// Maximum crawl depth (0 = fetch nothing, 1 = only the seed)
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        #[command(flatten)]
        options: CrawlOptions,
    },

    /// Crawl a website over HTTP(S)
    ///
    /// Example: link-crawler site https://example.com --max-depth 2 --same-domain
    Site {
        /// URL to start from (e.g., https://example.com)
        url: String,

        /// Maximum crawl depth (0 = fetch nothing, 1 = only the seed)
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Only follow links on the seed URL's domain
        #[arg(long)]
        same_domain: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        #[command(flatten)]
        options: CrawlOptions,
    },
}

// Flags shared by every crawl subcommand
#[derive(Args, Debug, Clone)]
pub struct CrawlOptions {
    /// Print one JSON object per line instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Maximum number of documents fetched at the same time (default: no limit)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// How many unread results may queue up before fetches wait for output
    #[arg(long, default_value_t = DEFAULT_BUFFER)]
    pub buffer: usize,
}

impl CrawlOptions {
    pub fn config(&self, max_depth: usize) -> CrawlConfig {
        CrawlConfig {
            max_depth,
            max_concurrency: self.max_concurrency,
            buffer: self.buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_defaults() {
        let cli = Cli::try_parse_from(["link-crawler", "demo"]).unwrap();
        match cli.command {
            Commands::Demo { max_depth, options } => {
                assert_eq!(max_depth, 4);
                assert!(!options.json);
                assert_eq!(options.config(max_depth), CrawlConfig::default());
            }
            other => panic!("expected demo, got {:?}", other),
        }
    }

    #[test]
    fn test_site_flags() {
        let cli = Cli::try_parse_from([
            "link-crawler",
            "site",
            "https://example.com",
            "--max-depth",
            "3",
            "--same-domain",
            "--json",
            "--max-concurrency",
            "16",
        ])
        .unwrap();

        match cli.command {
            Commands::Site {
                url,
                max_depth,
                same_domain,
                timeout_secs,
                options,
            } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(max_depth, 3);
                assert!(same_domain);
                assert_eq!(timeout_secs, 10);
                assert!(options.json);
                assert_eq!(options.config(max_depth).max_concurrency, Some(16));
            }
            other => panic!("expected site, got {:?}", other),
        }
    }

    #[test]
    fn test_site_requires_url() {
        assert!(Cli::try_parse_from(["link-crawler", "site"]).is_err());
    }
}
