// src/crawl/task.rs
// =============================================================================
// A crawl task: the recursive unit of work.
//
// Lifecycle of one task:
//
//   Spawned ── depth == 0 or cancelled ─────────────────────────┐
//      │                                                         │
//   Fetching ── error ──► emit "failed" report ─────────────────┤
//      │                                                         │
//   Fetched ──► emit "found" report                              │
//      │                                                         │
//   Discovering: for each link, in document order                │
//      - try_visit(link) false → skip                            │
//      - try_visit(link) true  → register(), then spawn child    │
//      │                                                         │
//   Finishing ◄──────────────────────────────────────────────────┘
//      finish(); whoever hits zero closes the result stream
//
// Finishing lives in TaskGuard's Drop impl, so it runs exactly once whether
// the task returns early, completes, or the fetcher panics.
// =============================================================================

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::counter::TaskCounter;
use super::report::CrawlReport;
use super::stream::ResultStream;
use super::visited::VisitedSet;
use crate::fetch::{FetchError, Fetcher, Page};

// State shared by every task of one crawl
//
// Tasks only touch it through the atomic operations of its parts
// (try_visit, register/finish, emit/close).
pub(crate) struct Shared {
    pub fetcher: Arc<dyn Fetcher>,
    pub visited: VisitedSet,
    pub counter: TaskCounter,
    pub results: ResultStream,
    /// Bounds the number of fetches in flight, if configured
    pub limiter: Option<Semaphore>,
    pub cancel: CancellationToken,
}

pub(crate) struct CrawlTask {
    id: String,
    depth: usize,
    shared: Arc<Shared>,
}

impl CrawlTask {
    pub fn new(id: String, depth: usize, shared: Arc<Shared>) -> Self {
        CrawlTask { id, depth, shared }
    }

    // Starts the task on the tokio runtime without waiting for it
    //
    // The caller must already have counted this task: either it is the seed
    // (the counter starts at 1) or the parent called register().
    pub fn spawn(self) {
        let guard = TaskGuard {
            shared: self.shared.clone(),
            id: self.id.clone(),
        };
        tokio::spawn(async move {
            // Moved in so it is dropped when the task ends, even on panic
            let _guard = guard;
            self.run().await;
        });
    }

    async fn run(self) {
        if self.depth == 0 {
            tracing::trace!(id = %self.id, "depth budget exhausted");
            return;
        }

        let page = match self.fetch().await {
            None => {
                tracing::debug!(id = %self.id, "cancelled before fetch completed");
                return;
            }
            Some(Err(error)) => {
                tracing::debug!(id = %self.id, %error, "fetch failed");
                self.emit(CrawlReport::failed(&self.id, &error, self.depth)).await;
                return;
            }
            Some(Ok(page)) => page,
        };

        tracing::debug!(id = %self.id, depth = self.depth, links = page.links.len(), "fetched");
        let Page { body, links } = page;
        self.emit(CrawlReport::found(&self.id, body, self.depth)).await;

        self.spawn_children(links);
    }

    // Fetches this task's document
    //
    // Returns None if the crawl was cancelled while waiting for a permit or
    // for the fetch itself. The permit is released as soon as the fetch is
    // done, before emitting or spawning.
    async fn fetch(&self) -> Option<Result<Page, FetchError>> {
        let shared = &self.shared;

        let _permit = match &shared.limiter {
            Some(limiter) => tokio::select! {
                biased;
                _ = shared.cancel.cancelled() => return None,
                permit = limiter.acquire() => permit.ok(),
            },
            None => None,
        };

        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => None,
            result = shared.fetcher.fetch(&self.id) => Some(result),
        }
    }

    async fn emit(&self, report: CrawlReport) {
        if let Err(error) = self.shared.results.emit(report).await {
            // Only possible if the consumer dropped its receiver
            tracing::error!(id = %self.id, %error, "report dropped");
        }
    }

    // Registers and spawns one child per newly seen link
    //
    // Children are spawned even when depth - 1 == 0; such a child stops at
    // its own base case. Registering before spawning keeps the counter from
    // reaching zero while a child is still on its way.
    fn spawn_children(&self, links: Vec<String>) {
        let shared = &self.shared;
        let child_depth = self.depth - 1;
        let mut spawned = 0;

        for link in links {
            if shared.cancel.is_cancelled() {
                break;
            }
            if !shared.visited.try_visit(&link) {
                continue;
            }

            shared.counter.register();
            CrawlTask::new(link, child_depth, shared.clone()).spawn();
            spawned += 1;
        }

        tracing::trace!(
            id = %self.id,
            spawned,
            outstanding = shared.counter.outstanding(),
            "children spawned"
        );
    }
}

// Performs the Finishing step when a task ends
struct TaskGuard {
    shared: Arc<Shared>,
    id: String,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        tracing::trace!(id = %self.id, "task finished");

        if self.shared.counter.finish() {
            self.shared.results.close();
            tracing::debug!(
                visited = self.shared.visited.len(),
                "no tasks outstanding, result stream closed"
            );
        }
    }
}
