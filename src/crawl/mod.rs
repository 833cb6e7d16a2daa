// src/crawl/mod.rs
// =============================================================================
// This module runs a crawl.
//
// Features:
// - Depth-bounded: each hop from the seed spends one unit of depth
// - Concurrent: every document is fetched in its own tokio task
// - Deduplicated: an identifier is fetched at most once per crawl
// - Streaming: reports come out as soon as each fetch finishes
// - Optional limit on fetches in flight, and external cancellation
//
// Submodules:
// - visited: the visited set (atomic check-and-insert)
// - counter: outstanding-task counter (detects when the crawl is done)
// - stream: the bounded result channel with explicit close
// - report: the per-document result type
// - task: the recursive crawl task
//
// How the pieces fit:
//   Crawler::start(seed)
//     ├─ visited = {seed}, counter = 1
//     ├─ spawn task(seed, max_depth)
//     └─ return Crawl { results }  ◄── the caller drains this
//
//   each task: fetch → emit → register + spawn new children → finish
//   the task whose finish() hits zero closes the stream
// =============================================================================

mod counter;
mod report;
mod stream;
mod task;
mod visited;

pub use counter::TaskCounter;
pub use report::CrawlReport;
pub use stream::{result_stream, ResultReceiver, ResultStream, StreamClosed};
pub use visited::VisitedSet;

use futures::Stream;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::fetch::Fetcher;
use task::{CrawlTask, Shared};

/// Default result buffer, in reports
pub const DEFAULT_BUFFER: usize = 10;

/// Default depth budget
pub const DEFAULT_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Depth budget of the seed. 0 means nothing is fetched at all,
    /// 1 means only the seed is fetched.
    pub max_depth: usize,
    /// Maximum number of fetches in flight (None = unbounded)
    pub max_concurrency: Option<usize>,
    /// Reports that can sit unread before tasks wait on the consumer
    pub buffer: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            max_concurrency: None,
            buffer: DEFAULT_BUFFER,
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Self {
        Crawler { fetcher, config }
    }

    // Starts crawling from `seed` and returns right away
    //
    // Must be called from within a tokio runtime. Drain the returned
    // Crawl to get the reports; it ends once every task is done.
    pub fn start(&self, seed: impl Into<String>) -> Crawl {
        self.start_with_cancel(seed, CancellationToken::new())
    }

    // Like start(), stopping early when `cancel` fires
    //
    // Cancelled tasks skip their fetch and spawn no children. The result
    // stream still closes normally once the remaining tasks wind down.
    pub fn start_with_cancel(&self, seed: impl Into<String>, cancel: CancellationToken) -> Crawl {
        let seed = seed.into();
        let (results, receiver) = result_stream(self.config.buffer);

        let visited = VisitedSet::new();
        visited.try_visit(&seed);

        let shared = Arc::new(Shared {
            fetcher: self.fetcher.clone(),
            visited,
            counter: TaskCounter::new(),
            results,
            limiter: self.config.max_concurrency.map(|n| Semaphore::new(n.max(1))),
            cancel: cancel.clone(),
        });

        tracing::info!(
            seed = %seed,
            max_depth = self.config.max_depth,
            max_concurrency = ?self.config.max_concurrency,
            "starting crawl"
        );

        // The counter already accounts for the seed
        CrawlTask::new(seed, self.config.max_depth, shared).spawn();

        Crawl {
            results: receiver,
            cancel,
        }
    }
}

// A running crawl
pub struct Crawl {
    results: ResultReceiver,
    cancel: CancellationToken,
}

impl Crawl {
    // Reports in arrival order, as a futures Stream that ends when the
    // crawl is over
    pub fn into_stream(self) -> impl Stream<Item = CrawlReport> {
        self.results.into_stream()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // Waits for the crawl to finish and returns every report
    pub async fn collect(self) -> Vec<CrawlReport> {
        self.results.collect().await
    }
}
