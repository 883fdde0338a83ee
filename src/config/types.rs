use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of crawl tasks allowed to run at the same time
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// How long the dispatcher waits on an empty frontier (milliseconds)
    #[serde(rename = "frontier-timeout-ms", default = "default_frontier_timeout_ms")]
    pub frontier_timeout_ms: u64,

    /// Per-request timeout for page fetches (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of hops from the seed; unlimited when absent
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,
}

impl CrawlerConfig {
    pub fn frontier_timeout(&self) -> Duration {
        Duration::from_millis(self.frontier_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            frontier_timeout_ms: default_frontier_timeout_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_depth: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value (`Name/Version`)
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File receiving crawl records; records go to stdout when absent
    #[serde(rename = "log-path", default)]
    pub log_path: Option<PathBuf>,
}

fn default_workers() -> u32 {
    4
}

fn default_frontier_timeout_ms() -> u64 {
    1000
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "web-spider".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
