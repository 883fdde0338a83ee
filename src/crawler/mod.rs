//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a single per-request timeout
//! - HTML parsing and link extraction
//! - The frontier queue of pending URLs
//! - Overall crawl coordination on a fixed-size worker pool

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlSummary};
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult};
pub use frontier::{Frontier, FrontierSender, QueuedUrl};
pub use parser::extract_links;

use crate::config::Config;
use crate::output::Reporter;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed URL
/// 2. Build the HTTP client and worker pool
/// 3. Fetch pages and extract links until the frontier is exhausted
/// 4. Report one record per crawled page
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `reporter` - Sink receiving the crawl records
/// * `seed` - The URL to start from
///
/// # Example
///
/// ```no_run
/// use web_spider::config::Config;
/// use web_spider::crawler::crawl;
/// use web_spider::output::Reporter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = crawl(Config::default(), Reporter::stdout(), "https://example.com/").await?;
/// println!("{} pages crawled", summary.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, reporter: Reporter, seed: &str) -> Result<CrawlSummary> {
    Coordinator::new(config, reporter)?.run(seed).await
}
