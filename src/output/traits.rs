//! Output types shared by the reporter and the crawl summary

use std::fmt::Write as _;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to open report file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write report for {url}: {source}")]
    Write {
        url: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One crawled page and the valid links found on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    /// The page URL, exactly as it was popped from the frontier
    pub url: String,

    /// Distinct valid links, in the order they appear on the page
    pub links: Vec<String>,
}

impl CrawlRecord {
    pub fn new(url: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            url: url.into(),
            links,
        }
    }

    /// Renders the record as one block: the URL line, then one tab-indented line per link
    pub fn render(&self) -> String {
        let mut block = String::with_capacity(
            self.url.len() + 1 + self.links.iter().map(|l| l.len() + 2).sum::<usize>(),
        );
        // Writing into a String cannot fail
        let _ = writeln!(block, "{}", self.url);
        for link in &self.links {
            let _ = writeln!(block, "\t{}", link);
        }
        block
    }
}

/// Parses a rendered report back into records
///
/// Lines that start with a tab belong to the closest preceding URL line.
/// Blank lines and orphan link lines are ignored.
pub fn parse_report(report: &str) -> Vec<CrawlRecord> {
    let mut records: Vec<CrawlRecord> = Vec::new();

    for line in report.lines() {
        if let Some(link) = line.strip_prefix('\t') {
            if let Some(current) = records.last_mut() {
                current.links.push(link.to_string());
            }
        } else if !line.trim().is_empty() {
            records.push(CrawlRecord::new(line, Vec::new()));
        }
    }

    records
}
