//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the dispatcher loop and the crawl task it runs on the
//! worker pool:
//! - The dispatcher waits for a free worker slot, pops the frontier, and spawns
//!   one task per URL
//! - Each task claims, fetches, extracts, pushes new links and reports
//! - The run ends once the frontier stays empty for a full pop timeout while
//!   no task is in flight
//!
//! All crawl state (frontier, visited set, reporter, pool) belongs to one
//! `Coordinator`, and `run` consumes it, so independent runs never share
//! anything and a coordinator cannot be crawled twice.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, is_html, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierSender, QueuedUrl};
use crate::crawler::parser::extract_links;
use crate::output::{CrawlRecord, CrawlStatistics, Reporter};
use crate::state::{PageState, VisitedSet};
use crate::url::is_valid;
use crate::{Result, SpiderError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Everything a crawl task needs, shared by all tasks of one run
struct CrawlContext {
    client: Client,
    visited: Arc<VisitedSet>,
    reporter: Reporter,
    frontier: FrontierSender,
    max_depth: Option<u32>,
}

/// How a single crawl task ended
#[derive(Debug)]
struct TaskOutcome {
    url: String,
    state: PageState,
    record: Option<CrawlRecord>,
}

impl TaskOutcome {
    fn without_record(url: String, state: PageState) -> Self {
        Self {
            url,
            state,
            record: None,
        }
    }
}

/// Result of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Every record that was reported, in completion order
    ///
    /// Empty when the coordinator was built with [`Coordinator::discard_records`].
    pub records: Vec<CrawlRecord>,

    /// Counters collected by the dispatcher
    pub statistics: CrawlStatistics,

    /// Every URL claimed during the run
    pub visited: Arc<VisitedSet>,
}

impl CrawlSummary {
    /// Returns true if the URL was claimed during the run
    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    context: Arc<CrawlContext>,
    frontier: Frontier,
    workers: Arc<Semaphore>,
    keep_records: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `reporter` - Sink receiving one record per crawled page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SpiderError)` - The HTTP client could not be built
    pub fn new(config: Config, reporter: Reporter) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let frontier = Frontier::new();
        let workers = Arc::new(Semaphore::new(config.crawler.workers as usize));

        let context = Arc::new(CrawlContext {
            client,
            visited: Arc::new(VisitedSet::new()),
            reporter,
            frontier: frontier.sender(),
            max_depth: config.crawler.max_depth,
        });

        Ok(Self {
            config: config.crawler,
            context,
            frontier,
            workers,
            keep_records: true,
        })
    }

    /// Stops collecting records into the [`CrawlSummary`]
    ///
    /// Records still go to the reporter and statistics are still counted; only
    /// the in-memory copy is dropped.
    pub fn discard_records(mut self) -> Self {
        self.keep_records = false;
        self
    }

    /// Runs the crawl from a seed URL until the frontier is exhausted
    ///
    /// The seed is only pushed onto the frontier; it is claimed by the task
    /// that pops it, like every other URL. The coordinator is consumed: a new
    /// run needs a new coordinator and starts with an empty visited set.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Crawl completed
    /// * `Err(SpiderError::InvalidSeed)` - The seed is not an absolute http(s) URL
    pub async fn run(mut self, seed: &str) -> Result<CrawlSummary> {
        let seed = seed.trim();
        if !is_valid(seed) {
            return Err(SpiderError::InvalidSeed {
                url: seed.to_string(),
            });
        }

        tracing::info!(
            "Starting crawl from {} with {} workers",
            seed,
            self.config.workers
        );

        let pop_timeout = self.config.frontier_timeout();
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();
        let mut progress = RunProgress::new(self.keep_records);

        self.frontier.push(QueuedUrl::seed(seed));

        loop {
            while let Some(joined) = tasks.try_join_next() {
                progress.collect(joined, self.frontier.len());
            }

            // Wait for a free slot before popping so the timeout only runs while a worker is idle
            let permit = Arc::clone(&self.workers).acquire_owned().await?;

            match self.frontier.pop(pop_timeout).await {
                Some(queued) => {
                    tracing::trace!(url = %queued.url, state = %PageState::Queued, "Dispatching");
                    let context = Arc::clone(&self.context);
                    tasks.spawn(async move {
                        let outcome = crawl_task(&context, queued).await;
                        drop(permit);
                        outcome
                    });
                }
                None => {
                    drop(permit);

                    // A running task may still push links, so the frontier is only
                    // exhausted once nothing is in flight
                    match tasks.join_next().await {
                        Some(joined) => progress.collect(joined, self.frontier.len()),
                        None => {
                            tracing::info!(
                                "Frontier empty for {:?} with no task in flight, crawl complete",
                                pop_timeout
                            );
                            break;
                        }
                    }
                }
            }
        }

        let summary = progress.finish(Arc::clone(&self.context.visited));

        tracing::info!(
            "Crawl completed: {} pages reported, {} URLs claimed in {:?}",
            summary.statistics.records_reported,
            summary.visited.len(),
            summary.statistics.elapsed
        );

        Ok(summary)
    }
}

/// Dispatcher-side bookkeeping for one run
struct RunProgress {
    statistics: CrawlStatistics,
    records: Vec<CrawlRecord>,
    keep_records: bool,
    started: Instant,
}

impl RunProgress {
    fn new(keep_records: bool) -> Self {
        Self {
            statistics: CrawlStatistics::new(),
            records: Vec::new(),
            keep_records,
            started: Instant::now(),
        }
    }

    /// Folds one finished task into the run statistics
    fn collect(&mut self, joined: std::result::Result<TaskOutcome, JoinError>, pending: usize) {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                // A panicking task loses its URL; the run carries on
                tracing::error!("Crawl task failed: {}", e);
                return;
            }
        };

        tracing::debug!(url = %outcome.url, state = %outcome.state, "Task finished");

        let links = outcome.record.as_ref().map(|r| r.links.len());
        self.statistics.record_outcome(outcome.state, links);
        if self.keep_records {
            self.records.extend(outcome.record);
        }

        let completed = self.statistics.tasks_completed();
        if completed % 10 == 0 {
            let elapsed = self.started.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::info!(
                "Progress: {} tasks completed, {} in frontier, {:.2} pages/sec",
                completed,
                pending,
                self.statistics.records_reported as f64 / elapsed
            );
        }
    }

    fn finish(mut self, visited: Arc<VisitedSet>) -> CrawlSummary {
        self.statistics.elapsed = self.started.elapsed();
        CrawlSummary {
            records: self.records,
            statistics: self.statistics,
            visited,
        }
    }
}

/// Crawls one URL popped from the frontier
///
/// `Queued -> Claimed -> Fetching -> terminal`, or `Queued -> Skipped` when
/// another task already owns the URL. The claim is never released, so a URL
/// that fails is not fetched again during this run.
async fn crawl_task(context: &CrawlContext, queued: QueuedUrl) -> TaskOutcome {
    if let Some(max_depth) = context.max_depth {
        if queued.depth > max_depth {
            tracing::trace!(url = %queued.url, depth = queued.depth, "Beyond max depth");
            return TaskOutcome::without_record(queued.url, PageState::DepthExceeded);
        }
    }

    if !context.visited.try_claim(&queued.url) {
        tracing::trace!(url = %queued.url, state = %PageState::Skipped, "Already claimed");
        return TaskOutcome::without_record(queued.url, PageState::Skipped);
    }
    tracing::trace!(url = %queued.url, state = %PageState::Claimed, "Claimed");

    tracing::trace!(url = %queued.url, state = %PageState::Fetching, "Fetching");
    let fetched = fetch_url(&context.client, &queued.url).await;
    let state = fetched.state();
    let (final_url, content_type, body) = match fetched {
        FetchResult::Success {
            final_url,
            status_code,
            content_type,
            body,
        } => {
            tracing::debug!(url = %queued.url, status = status_code, "Fetched");
            (final_url, content_type, body)
        }
        FetchResult::HttpError { status_code, .. } => {
            tracing::info!("HTTP {} for {}, not following links", status_code, queued.url);
            return TaskOutcome::without_record(queued.url, state);
        }
        FetchResult::NetworkError { error, .. } => {
            tracing::warn!("Failed to fetch {}: {}", queued.url, error);
            return TaskOutcome::without_record(queued.url, state);
        }
    };

    let links = if is_html(&content_type) {
        page_links(&body, &final_url, &queued.url)
    } else {
        tracing::debug!("Skipping link extraction for {} ({})", queued.url, content_type);
        Vec::new()
    };

    for link in &links {
        context.frontier.push(queued.child(link.as_str()));
    }

    let record = CrawlRecord::new(queued.url.as_str(), links);
    if let Err(e) = context.reporter.report(&record) {
        tracing::warn!("{}", e);
    }

    TaskOutcome {
        url: queued.url,
        state,
        record: Some(record),
    }
}

/// Extracts the valid links of a fetched page
///
/// Relative links resolve against the final URL after redirects, falling back
/// to the requested URL.
fn page_links(body: &str, final_url: &str, requested_url: &str) -> Vec<String> {
    let base = match Url::parse(final_url).or_else(|_| Url::parse(requested_url)) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve links of {}: {}", requested_url, e);
            return Vec::new();
        }
    };

    extract_links(body, &base)
        .into_iter()
        .filter(|link| is_valid(link))
        .collect()
}
