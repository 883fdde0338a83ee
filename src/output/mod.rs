//! Output module for crawl records and run statistics
//!
//! This module handles:
//! - Writing one block per crawled page to a shared sink
//! - Recording crawl statistics for the end-of-run report

mod reporter;
pub mod stats;
mod traits;

pub use reporter::Reporter;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{parse_report, CrawlRecord, OutputError, OutputResult};
