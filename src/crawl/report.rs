// src/crawl/report.rs
// =============================================================================
// One line of crawl output: what happened when a document was fetched.
//
// Display gives the plain-text form printed by the CLI:
//   found: http://golang.org/ "The Go Programming Language"
//   not found: http://golang.org/cmd/
//
// Serialize gives the --json form:
//   {"kind":"found","id":"http://golang.org/","body":"...","depth":4}
// =============================================================================

use serde::Serialize;
use std::fmt;

use crate::fetch::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlReport {
    /// The document was fetched
    Found {
        id: String,
        body: String,
        /// Depth budget the task ran with
        depth: usize,
    },
    /// The fetch failed; only this document's subtree is lost
    Failed {
        id: String,
        error: String,
        depth: usize,
    },
}

impl CrawlReport {
    pub fn found(id: &str, body: String, depth: usize) -> Self {
        CrawlReport::Found {
            id: id.to_string(),
            body,
            depth,
        }
    }

    pub fn failed(id: &str, error: &FetchError, depth: usize) -> Self {
        CrawlReport::Failed {
            id: id.to_string(),
            error: error.to_string(),
            depth,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CrawlReport::Found { id, .. } | CrawlReport::Failed { id, .. } => id,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CrawlReport::Found { .. })
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // {:?} quotes and escapes the body, keeping the report on one line
            CrawlReport::Found { id, body, .. } => write!(f, "found: {} {:?}", id, body),
            CrawlReport::Failed { error, .. } => write!(f, "{}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_display() {
        let report = CrawlReport::found("http://golang.org/", "The Go Programming Language".into(), 4);
        assert_eq!(
            report.to_string(),
            r#"found: http://golang.org/ "The Go Programming Language""#
        );
        assert!(report.is_ok());
    }

    #[test]
    fn test_failed_display_is_error_text() {
        let error = FetchError::NotFound {
            id: "http://golang.org/cmd/".into(),
        };
        let report = CrawlReport::failed("http://golang.org/cmd/", &error, 3);
        assert_eq!(report.to_string(), "not found: http://golang.org/cmd/");
        assert_eq!(report.id(), "http://golang.org/cmd/");
        assert!(!report.is_ok());
    }

    #[test]
    fn test_multiline_body_stays_on_one_line() {
        let report = CrawlReport::found("A", "line one\nline two".into(), 1);
        assert!(!report.to_string().contains('\n'));
    }

    #[test]
    fn test_json_shape() {
        let report = CrawlReport::found("A", "alpha".into(), 2);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "found");
        assert_eq!(json["id"], "A");
        assert_eq!(json["depth"], 2);
    }
}
