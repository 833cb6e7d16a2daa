// src/crawl/visited.rs
// =============================================================================
// The visited set: every identifier that has ever been scheduled.
//
// There is exactly one operation, `try_visit`, which checks and inserts in
// one atomic step. Two tasks racing on the same identifier can never both
// be told "not visited yet", so an identifier is scheduled at most once per
// crawl.
//
// Backed by a DashSet (a sharded concurrent hash set): inserting locks only
// the shard the key hashes to, so tasks working on different identifiers
// rarely contend.
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Records `id` as visited
    //
    // Returns true iff this call inserted it. Every later call (from any
    // task) with the same identifier returns false and changes nothing.
    pub fn try_visit(&self, id: &str) -> bool {
        // Cheap read first so already-seen links don't allocate a String
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_visit_wins() {
        let visited = VisitedSet::new();
        assert!(visited.try_visit("A"));
        assert!(!visited.try_visit("A"));
        assert!(visited.try_visit("B"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_identifiers_are_not_normalized() {
        let visited = VisitedSet::new();
        assert!(visited.try_visit("http://golang.org/"));
        assert!(visited.try_visit("http://golang.org"));
        assert!(visited.try_visit("HTTP://golang.org/"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_exactly_one_concurrent_caller_wins() {
        for round in 0..20 {
            let visited = Arc::new(VisitedSet::new());
            let winners = Arc::new(AtomicUsize::new(0));
            let id = format!("doc-{round}");

            let handles: Vec<_> = (0..64)
                .map(|_| {
                    let visited = visited.clone();
                    let winners = winners.clone();
                    let id = id.clone();
                    tokio::spawn(async move {
                        if visited.try_visit(&id) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap();
            }

            assert_eq!(winners.load(Ordering::SeqCst), 1);
            assert_eq!(visited.len(), 1);
        }
    }
}
