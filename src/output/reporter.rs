//! Reporter: the shared sink for crawl records
//!
//! Workers report concurrently, so the sink sits behind a mutex. A record is
//! formatted before the lock is taken and written with a single `write_all`,
//! which keeps each page's block contiguous in the output.
//!
//! Writes are blocking. Called from a multi-thread tokio runtime, the write runs
//! under `block_in_place` so a slow sink does not stall other tasks on the same
//! worker thread.

use crate::output::traits::{CrawlRecord, OutputError, OutputResult};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Thread-safe sink receiving one block per crawled page
pub struct Reporter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    /// Creates a reporter writing to any sink
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Creates a reporter writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a reporter appending to a file, creating it if needed
    pub fn to_file(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| OutputError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(file))
    }

    /// Emits one crawl record
    ///
    /// The whole block is written and flushed while the lock is held; no two
    /// reports interleave.
    pub fn report(&self, record: &CrawlRecord) -> OutputResult<()> {
        tracing::info!(url = %record.url, links = record.links.len(), "Crawled page");

        let block = record.render();

        let written = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.write_block(&block))
            }
            // block_in_place panics on a current-thread runtime
            _ => self.write_block(&block),
        };

        written.map_err(|source| OutputError::Write {
            url: record.url.clone(),
            source,
        })
    }

    fn write_block(&self, block: &str) -> io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(block.as_bytes())?;
        sink.flush()
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
