// src/lib.rs
// =============================================================================
// link-crawler: a depth-bounded, concurrent crawler for linked documents.
//
// Modules:
// - crawl: the crawl engine (visited set, task counter, result stream, tasks)
// - fetch: how documents are obtained (trait + in-memory and HTTP fetchers)
//
// Quick start:
//
//   let fetcher = Arc::new(FakeFetcher::demo());
//   let crawler = Crawler::new(fetcher, CrawlConfig::default());
//   let reports = crawler.start("http://golang.org/").into_stream();
//   futures::pin_mut!(reports);
//   while let Some(report) = reports.next().await {
//       println!("{}", report);
//   }
// =============================================================================

pub mod crawl;
pub mod fetch;

pub use crawl::{Crawl, CrawlConfig, CrawlReport, Crawler};
pub use fetch::{FakeFetcher, FetchError, Fetcher, HttpFetcher, Page};
