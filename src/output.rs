// src/output.rs
// =============================================================================
// Turns crawl reports into output lines.
//
// Two formats:
// - text: the report's Display form ("found: <url> \"<title>\"")
// - JSON: one serde_json object per line, easy to pipe into jq
//
// Also keeps a running tally for the summary logged at the end.
// =============================================================================

use anyhow::Result;
use link_crawler::crawl::CrawlReport;
use std::fmt;

pub fn format_report(report: &CrawlReport, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(report)?)
    } else {
        Ok(report.to_string())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub found: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, report: &CrawlReport) {
        if report.is_ok() {
            self.found += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.found + self.failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "crawled {} document(s), {} failed",
            self.total(),
            self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use link_crawler::fetch::FetchError;

    #[test]
    fn test_text_format() {
        let report = CrawlReport::found("A", "alpha".into(), 1);
        assert_eq!(format_report(&report, false).unwrap(), r#"found: A "alpha""#);
    }

    #[test]
    fn test_json_format_is_one_line() {
        let error = FetchError::NotFound { id: "B".into() };
        let report = CrawlReport::failed("B", &error, 1);
        let line = format_report(&report, true).unwrap();

        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["kind"], "failed");
        assert_eq!(value["error"], "not found: B");
    }

    #[test]
    fn test_summary() {
        let mut summary = Summary::default();
        summary.record(&CrawlReport::found("A", "a".into(), 2));
        summary.record(&CrawlReport::failed(
            "B",
            &FetchError::NotFound { id: "B".into() },
            1,
        ));

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.to_string(), "crawled 2 document(s), 1 failed");
    }
}
