// src/crawl/counter.rs
// =============================================================================
// Outstanding-task counter: how the crawl knows it is finished.
//
// Nobody waits on anybody in this crawler. A parent task spawns its
// children and exits without joining them. So "are we done?" is answered
// with a reference count instead:
//
//   - the count starts at 1 (the seed task)
//   - a parent calls register() once per child, BEFORE spawning it
//   - every task calls finish() exactly once, after it has registered all
//     of its children
//
// The finish() call that takes the count from 1 to 0 returns true, and its
// caller closes the result stream. Because children are registered before
// the parent finishes, the count can't touch zero while work is pending.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct TaskCounter {
    outstanding: AtomicUsize,
}

impl TaskCounter {
    // A counter holding the seed task
    pub fn new() -> Self {
        TaskCounter {
            outstanding: AtomicUsize::new(1),
        }
    }

    // Accounts for one child that is about to be spawned
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    // Accounts for one task that has no more work to do
    //
    // Returns true iff this call brought the count to exactly zero.
    // Across a whole crawl only one call ever returns true.
    pub fn finish(&self) -> bool {
        // checked_sub keeps the count from wrapping if finish() is ever
        // called more times than there were tasks
        match self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(previous) => previous == 1,
            Err(_) => {
                tracing::error!("finish() called with no outstanding tasks");
                false
            }
        }
    }

    // Snapshot of in-flight tasks, for logging only
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }
}

impl Default for TaskCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_seed_alone_reaches_zero() {
        let counter = TaskCounter::new();
        assert_eq!(counter.outstanding(), 1);
        assert!(counter.finish());
        assert_eq!(counter.outstanding(), 0);
    }

    #[test]
    fn test_only_last_finish_reports_zero() {
        let counter = TaskCounter::new();
        counter.register();
        counter.register();

        assert!(!counter.finish());
        assert!(!counter.finish());
        assert!(counter.finish());
    }

    #[test]
    fn test_never_goes_below_zero() {
        let counter = TaskCounter::new();
        assert!(counter.finish());
        assert!(!counter.finish());
        assert_eq!(counter.outstanding(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_zero_crossing_observed_once_under_contention() {
        let counter = Arc::new(TaskCounter::new());
        for _ in 0..999 {
            counter.register();
        }

        let handles: Vec<_> = (0..1000)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.finish() })
            })
            .collect();

        let mut zero_crossings = 0;
        for handle in handles {
            if handle.await.unwrap() {
                zero_crossings += 1;
            }
        }

        assert_eq!(zero_crossings, 1);
        assert_eq!(counter.outstanding(), 0);
    }
}
