// src/fetch/links.rs
// =============================================================================
// This module pulls links (and a short title) out of document bodies.
//
// Two document formats are understood:
// - HTML, parsed with `scraper` (CSS selectors over an html5ever DOM)
// - Markdown, parsed with `pulldown-cmark` (a streaming CommonMark parser)
//
// Relative links are resolved against the URL of the document they appear
// in, so every link handed back to the crawler is an absolute http(s) URL.
// Links are returned in document order; duplicates are kept because the
// crawler deduplicates them itself.
//
// Rust concepts:
// - Iterators and closures: filter_map over selected elements
// - Option<T>: "maybe a link", used by the resolver
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use scraper::{Html, Selector};
use url::Url;

// Extracts all followable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page (for resolving relative links)
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(base_url, error = %e, "invalid base URL, skipping link extraction");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("constant selector is valid");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(&base, href))
        .collect()
}

// Extracts all followable links from Markdown text
//
// Unlike a plain link checker we also resolve relative links
// ([guide](./guide.md)), since those are exactly the documents a crawl
// needs to visit next.
pub fn extract_markdown_links(markdown: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(base_url, error = %e, "invalid base URL, skipping link extraction");
            return Vec::new();
        }
    };

    Parser::new(markdown)
        .filter_map(|event| match event {
            // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_, dest_url, _)) => resolve_link(&base, &dest_url),
            _ => None,
        })
        .collect()
}

// The text of the <title> element, whitespace collapsed
pub fn html_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("constant selector is valid");

    document
        .select(&selector)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

// The text of the first heading in a Markdown document
pub fn markdown_title(markdown: &str) -> Option<String> {
    let mut in_heading = false;
    let mut title = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) => in_heading = true,
            Event::End(Tag::Heading(..)) => {
                let title = collapse_whitespace(&title);
                if !title.is_empty() {
                    return Some(title);
                }
                in_heading = false;
            }
            Event::Text(text) | Event::Code(text) if in_heading => title.push_str(&text),
            _ => {}
        }
    }

    None
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Returns None for:
// - in-page anchors ("#section")
// - mailto:, tel:, javascript:, data:, file: and other non-HTTP schemes
// - hrefs that can't be parsed at all
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "javascript:void(0)" -> None
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // base.join() handles both absolute and relative hrefs
    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why resolve against the page URL?
//    - "/docs" on https://example.com/a means https://example.com/docs
//    - Url::join() does what a browser does with relative links
//
// 2. Why keep duplicate links?
//    - The crawler's visited set already filters them
//    - Keeping document order makes the fetcher easy to reason about
//
// 3. What does filter_map do?
//    - Runs a closure returning Option<T> on every item
//    - Keeps the Some(..) values, drops the None ones
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_html_links(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_html_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_skip_anchor_mailto_and_javascript() {
        let html = r##"
            <a href="#section">Section</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">Nothing</a>
        "##;
        let links = extract_html_links(html, "https://example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_keeps_document_order_and_duplicates() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b">B again</a>
        "#;
        let links = extract_html_links(html, "https://example.com/");
        assert_eq!(
            links,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn test_invalid_base_url_yields_nothing() {
        let html = r#"<a href="/docs">Docs</a>"#;
        assert!(extract_html_links(html, "not a url").is_empty());
    }

    #[test]
    fn test_markdown_links_resolved() {
        let markdown = "See [the guide](./guide.md) and [Rust](https://www.rust-lang.org).";
        let links = extract_markdown_links(markdown, "https://example.com/docs/README.md");
        assert_eq!(
            links,
            vec![
                "https://example.com/docs/guide.md",
                "https://www.rust-lang.org/",
            ]
        );
    }

    #[test]
    fn test_markdown_skips_mailto() {
        let markdown = "[mail](mailto:someone@example.com)";
        assert!(extract_markdown_links(markdown, "https://example.com/").is_empty());
    }

    #[test]
    fn test_html_title() {
        let html = "<html><head><title>\n  The Go\n Programming Language </title></head></html>";
        assert_eq!(
            html_title(html),
            Some("The Go Programming Language".to_string())
        );
        assert_eq!(html_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_markdown_title() {
        let markdown = "intro text\n\n# Package `fmt`\n\nbody";
        assert_eq!(markdown_title(markdown), Some("Package fmt".to_string()));
        assert_eq!(markdown_title("just text"), None);
    }
}
