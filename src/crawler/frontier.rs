//! Frontier queue of URLs waiting for a worker
//!
//! This module handles:
//! - Unbounded, non-blocking pushes from any number of crawl tasks
//! - Blocking pops with a timeout for the single dispatcher loop
//! - Tracking how many entries are pending
//!
//! The frontier is a multiset: the same URL may be queued many times. The
//! visited set, not the queue, decides which copy gets crawled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch, exactly as discovered
    pub url: String,

    /// Number of hops from the seed (the seed is 0)
    pub depth: u32,
}

impl QueuedUrl {
    /// Creates the entry for the seed URL
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
        }
    }

    /// Creates the entry for a link found on this page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth.saturating_add(1),
        }
    }
}

/// Cloneable push side of the frontier, handed to crawl tasks
#[derive(Debug, Clone)]
pub struct FrontierSender {
    tx: UnboundedSender<QueuedUrl>,
    pending: Arc<AtomicUsize>,
}

impl FrontierSender {
    /// Adds a URL to the frontier without blocking
    pub fn push(&self, url: QueuedUrl) {
        // Count first so a racing pop never sees the counter go below zero
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(url).is_err() {
            // Receiver is gone: the run is over and nobody will pop this entry
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Frontier queue owned by the dispatcher
#[derive(Debug)]
pub struct Frontier {
    sender: FrontierSender,
    rx: UnboundedReceiver<QueuedUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: FrontierSender {
                tx,
                pending: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        }
    }

    /// Returns a push handle for crawl tasks
    pub fn sender(&self) -> FrontierSender {
        self.sender.clone()
    }

    /// Adds a URL to the frontier without blocking
    pub fn push(&self, url: QueuedUrl) {
        self.sender.push(url);
    }

    /// Gets the next URL, waiting up to `timeout` for one to arrive
    ///
    /// # Returns
    ///
    /// * `Some(QueuedUrl)` - The next pending URL
    /// * `None` - Nothing arrived within `timeout`; the frontier is exhausted for now
    pub async fn pop(&mut self, timeout: Duration) -> Option<QueuedUrl> {
        // The frontier keeps its own sender alive, so recv() only ends by timing out
        let next = tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()?;

        self.sender.pending.fetch_sub(1, Ordering::SeqCst);
        Some(next)
    }

    /// Returns the number of URLs waiting in the frontier
    pub fn len(&self) -> usize {
        self.sender.pending.load(Ordering::SeqCst)
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
