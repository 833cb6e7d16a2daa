// src/fetch/mod.rs
// =============================================================================
// This module defines how the crawler gets documents.
//
// The crawl engine never talks to the network directly. It only knows the
// `Fetcher` trait: "give me an identifier, I give you back the body and the
// identifiers it links to, or an error". Anything implementing it can drive
// a crawl.
//
// Submodules:
// - fake: In-memory document graph (used by the `demo` command and tests)
// - http: Real HTTP fetcher built on reqwest
// - links: Extracts links from HTML and Markdown bodies
//
// Rust concepts:
// - Traits: Shared behaviour across different types
// - async_trait: Lets us put async methods in a trait object (dyn Fetcher)
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod fake;
mod http;
mod links;

pub use fake::{FakeFetcher, DEMO_SEED};
pub use http::HttpFetcher;
pub use links::{extract_html_links, extract_markdown_links};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// A fetched document: its body and the identifiers it references
//
// `links` keeps the order the document lists them in, duplicates included.
// Deduplication is the crawler's job, not the fetcher's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Text content of the document (or a one-line summary of it)
    pub body: String,
    /// Identifiers this document links to, in document order
    pub links: Vec<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, links: Vec<String>) -> Self {
        Page {
            body: body.into(),
            links,
        }
    }
}

// Everything that can go wrong while fetching one identifier
//
// None of these are fatal for a crawl. The crawler turns them into a
// `CrawlReport::Failed` line and carries on with the other branches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The document does not exist (unknown key, HTTP 404/410)
    #[error("not found: {id}")]
    NotFound { id: String },

    /// The server answered with a non-success status
    #[error("{id}: HTTP {status}")]
    Status { id: String, status: u16 },

    /// The request itself failed (timeout, DNS, TLS, connection reset...)
    #[error("{id}: request failed: {message}")]
    Request { id: String, message: String },

    /// The identifier cannot be fetched at all (e.g. not a valid URL)
    #[error("{id}: invalid identifier: {reason}")]
    InvalidIdentifier { id: String, reason: String },
}

impl FetchError {
    /// The identifier that failed
    pub fn id(&self) -> &str {
        match self {
            FetchError::NotFound { id }
            | FetchError::Status { id, .. }
            | FetchError::Request { id, .. }
            | FetchError::InvalidIdentifier { id, .. } => id,
        }
    }
}

// The fetch capability consumed by the crawler
//
// Implementations must be safe to call from many tasks at once with
// different identifiers. No ordering between calls is promised.
// Retries, if wanted, belong inside the implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Page, FetchError>;
}
