// src/fetch/fake.rs
// =============================================================================
// An in-memory fetcher that serves canned pages.
//
// Useful for:
// - The `demo` command, which crawls a small built-in site without network
// - Tests, where we want a fully deterministic document graph
//
// Any identifier not in the map fails with FetchError::NotFound.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;

use super::{FetchError, Fetcher, Page};

/// Seed identifier of the built-in demo graph
pub const DEMO_SEED: &str = "http://golang.org/";

#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Page>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds (or replaces) a page in the graph, builder style
    //
    // Example:
    //   FakeFetcher::new()
    //       .with_page("A", "page a", &["B", "C"])
    //       .with_page("B", "page b", &["A"])
    pub fn with_page(mut self, id: &str, body: &str, links: &[&str]) -> Self {
        let links = links.iter().map(|l| l.to_string()).collect();
        self.pages.insert(id.to_string(), Page::new(body, links));
        self
    }

    // A small Go documentation site with cycles and one dead link
    // (http://golang.org/cmd/ is linked but not served)
    pub fn demo() -> Self {
        Self::new()
            .with_page(
                "http://golang.org/",
                "The Go Programming Language",
                &["http://golang.org/pkg/", "http://golang.org/cmd/"],
            )
            .with_page(
                "http://golang.org/pkg/",
                "Packages",
                &[
                    "http://golang.org/",
                    "http://golang.org/cmd/",
                    "http://golang.org/pkg/fmt/",
                    "http://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "http://golang.org/pkg/fmt/",
                "Package fmt",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
            .with_page(
                "http://golang.org/pkg/os/",
                "Package os",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, id: &str) -> Result<Page, FetchError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_known_page() {
        let fetcher = FakeFetcher::demo();
        let page = fetcher.fetch(DEMO_SEED).await.unwrap();
        assert_eq!(page.body, "The Go Programming Language");
        assert_eq!(page.links.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let fetcher = FakeFetcher::demo();
        let err = fetcher.fetch("http://golang.org/cmd/").await.unwrap_err();
        assert_eq!(err.to_string(), "not found: http://golang.org/cmd/");
    }

    #[test]
    fn test_demo_has_four_pages() {
        assert_eq!(FakeFetcher::demo().len(), 4);
        assert!(FakeFetcher::new().is_empty());
    }
}
