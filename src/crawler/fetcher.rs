//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests to fetch page content
//! - Classifying failures into page states
//!
//! A URL is fetched exactly once. There is no retry: every failure is final
//! for the rest of the run.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::PageState;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page with 200 OK
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Page body content, left empty for non-HTML content types
        body: String,
    },

    /// Server answered with something other than 200 OK
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Transport failure (connection refused, DNS, timeout, broken body)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// The terminal state a task ends in for this result
    pub fn state(&self) -> PageState {
        match self {
            Self::Success { .. } => PageState::Processed,
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => *state,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings; the fetch timeout bounds each whole request
///
/// # Example
///
/// ```no_run
/// use web_spider::config::Config;
/// use web_spider::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = crawler.fetch_timeout();

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// # Status Handling
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200, HTML or no Content-Type | Success with the body |
/// | HTTP 200, any other Content-Type | Success with an empty body |
/// | HTTP 404 | HttpError → DeadLink |
/// | Any other status | HttpError → HttpError |
/// | Timeout, connect or DNS failure | NetworkError → Unreachable |
/// | Body read failure, other errors | NetworkError → Failed |
///
/// Redirects are followed by the client before the status is inspected.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::DeadLink,
        };
    }

    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::HttpError,
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Non-HTML bodies are never read
    if !is_html(&content_type) {
        return FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body: String::new(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_error(&e),
    }
}

/// Returns true if a Content-Type value may carry links worth extracting
///
/// A missing header is treated as HTML.
pub fn is_html(content_type: &str) -> bool {
    let content_type = content_type.trim();
    content_type.is_empty() || content_type.to_ascii_lowercase().contains("html")
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            state: PageState::Unreachable,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }
    }
}
