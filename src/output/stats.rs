//! Statistics for a finished crawl run
//!
//! The dispatcher owns a `CrawlStatistics` value and updates it as task
//! outcomes come back, so no counter is shared between workers.

use crate::state::PageState;
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Count of finished tasks by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Number of crawl records reported
    pub records_reported: u64,

    /// Total number of valid links across all reported records
    pub links_found: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the terminal state of one finished task
    pub fn record_outcome(&mut self, state: PageState, links: Option<usize>) {
        debug_assert!(state.is_terminal(), "task ended in active state {state}");
        *self.pages_by_state.entry(state).or_insert(0) += 1;

        if let Some(count) = links {
            self.records_reported += 1;
            self.links_found += count as u64;
        }
    }

    /// Number of tasks that ended in the given state
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total number of finished tasks
    pub fn tasks_completed(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    /// Number of URLs that won a claim (and therefore were fetched once)
    pub fn urls_claimed(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.was_claimed())
            .map(|(_, count)| count)
            .sum()
    }

    /// Number of popped URLs dropped without a fetch
    pub fn skipped(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_skipped())
            .map(|(_, count)| count)
            .sum()
    }

    /// Number of fetches that ended in an error state
    pub fn errors(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Returns the success rate of fetches as a percentage
    pub fn success_rate(&self) -> f64 {
        let claimed = self.urls_claimed();
        if claimed == 0 {
            return 0.0;
        }
        (self.count(PageState::Processed) as f64 / claimed as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs claimed: {}", stats.urls_claimed());
    println!("  URLs skipped: {}", stats.skipped());
    println!("  Fetch errors: {}", stats.errors());
    println!("  Pages reported: {}", stats.records_reported);
    println!("  Links found: {}", stats.links_found);
    println!("  Elapsed: {:.2?}", stats.elapsed);
    println!();

    println!("Tasks by State:");
    for state in PageState::terminal_states() {
        let count = stats.count(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} claimed URLs fetched successfully)",
        stats.success_rate(),
        stats.count(PageState::Processed),
        stats.urls_claimed()
    );
}
