use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of URLs that have already been handed to a crawl task
///
/// Entries are never removed during a run. The only way in is [`try_claim`],
/// which checks and inserts under a single lock acquisition so two tasks can
/// never both own the same URL.
///
/// [`try_claim`]: VisitedSet::try_claim
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for crawling
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not seen before; the caller now owns it
    /// * `false` - Another caller already claimed it; the URL must be dropped
    pub fn try_claim(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Returns true if the URL has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A poisoned lock still holds a consistent set: insert either happened or not.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
