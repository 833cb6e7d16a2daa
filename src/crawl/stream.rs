// src/crawl/stream.rs
// =============================================================================
// The result stream: many crawl tasks write, one consumer reads.
//
// It is a bounded tokio mpsc channel with an explicit close:
//
//   ResultStream (producer side, shared by all tasks)
//     - emit(report): waits for buffer space, then sends
//     - close():      drops the sender; never waits for anything
//
//   ResultReceiver (consumer side, exactly one owner)
//     - recv():       next report in arrival order, None once closed
//
// Only the task that observes the counter's zero crossing calls close(), and
// by then every task has already emitted. Emitting after close is a bug; it
// is reported as StreamClosed instead of panicking.
// =============================================================================

use futures::stream::{self, Stream};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

use super::report::CrawlReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("result stream is closed")]
pub struct StreamClosed;

// Creates a connected producer/consumer pair with room for `capacity`
// unread reports (at least 1)
pub fn result_stream(capacity: usize) -> (ResultStream, ResultReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ResultStream {
            tx: Mutex::new(Some(tx)),
        },
        ResultReceiver { rx },
    )
}

#[derive(Debug)]
pub struct ResultStream {
    // None once closed
    tx: Mutex<Option<mpsc::Sender<CrawlReport>>>,
}

impl ResultStream {
    // Appends a report, waiting while the buffer is full
    pub async fn emit(&self, report: CrawlReport) -> Result<(), StreamClosed> {
        // Clone the sender out so the lock is never held across .await
        let tx = {
            let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
            guard.clone().ok_or(StreamClosed)?
        };
        tx.send(report).await.map_err(|_| StreamClosed)
    }

    // Closes the stream; returns true if this call did it
    //
    // Dropping the last sender wakes the consumer, which then sees the
    // reports still buffered followed by end of stream.
    pub fn close(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::Receiver<CrawlReport>,
}

impl ResultReceiver {
    // The next report, or None once the stream is closed and drained
    pub async fn recv(&mut self) -> Option<CrawlReport> {
        self.rx.recv().await
    }

    // Adapts the receiver into a futures Stream
    pub fn into_stream(self) -> impl Stream<Item = CrawlReport> {
        stream::unfold(self, |mut receiver| async move {
            receiver.recv().await.map(|report| (report, receiver))
        })
    }

    // Drains every report until the stream closes
    pub async fn collect(mut self) -> Vec<CrawlReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.recv().await {
            reports.push(report);
        }
        reports
    }
}
