// src/fetch/http.rs
// =============================================================================
// A fetcher that downloads documents over HTTP(S).
//
// For each identifier (a URL) it:
// 1. Sends a GET request with a shared reqwest Client
// 2. Maps HTTP failures to FetchError (404/410 = NotFound, other = Status)
// 3. Extracts links from the body (HTML or Markdown)
// 4. Reports the document title as the body, so one document = one line
//
// The Client is built once and reused for every request, which gives us
// connection pooling across all crawl tasks.
// =============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::links::{extract_html_links, extract_markdown_links, html_title, markdown_title};
use super::{FetchError, Fetcher, Page};

pub struct HttpFetcher {
    client: Client,
    /// When set, only links on this domain are reported
    allowed_domain: Option<String>,
}

impl HttpFetcher {
    // Creates a fetcher with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("link-crawler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpFetcher {
            client,
            allowed_domain: None,
        })
    }

    // Restricts reported links to the host of `seed_url`
    //
    // This keeps a crawl from wandering off to the rest of the internet.
    // The host may be a domain name or an IP address.
    pub fn same_domain_as(mut self, seed_url: &str) -> Result<Self> {
        let seed = Url::parse(seed_url).map_err(|e| anyhow!("Invalid URL '{}': {}", seed_url, e))?;
        let host = seed
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", seed_url))?;
        self.allowed_domain = Some(host.to_string());
        Ok(self)
    }

    fn keep_link(&self, link: &str) -> bool {
        match &self.allowed_domain {
            None => true,
            Some(host) => Url::parse(link)
                .map(|url| url.host_str() == Some(host.as_str()))
                .unwrap_or(false),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &str) -> Result<Page, FetchError> {
        let url = Url::parse(id).map_err(|e| FetchError::InvalidIdentifier {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(id, e))?;

        let status = response.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(FetchError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Classify and resolve against where we ended up after redirects
        let final_url = response.url().clone();
        let text = response.text().await.map_err(|e| request_error(id, e))?;

        let markdown = is_markdown(&content_type, final_url.path());
        let final_url = final_url.as_str();
        let (links, title) = if markdown {
            (
                extract_markdown_links(&text, final_url),
                markdown_title(&text),
            )
        } else {
            (extract_html_links(&text, final_url), html_title(&text))
        };

        let links = links.into_iter().filter(|l| self.keep_link(l)).collect();
        let body = title.unwrap_or_else(|| format!("{} bytes", text.len()));

        Ok(Page { body, links })
    }
}

fn is_markdown(content_type: &str, path: &str) -> bool {
    content_type.contains("markdown") || path.ends_with(".md")
}

// Converts a reqwest error into a one-line, human readable FetchError
fn request_error(id: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    FetchError::Request {
        id: id.to_string(),
        message,
    }
}
