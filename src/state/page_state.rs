/// Per-URL state definitions for a single crawl task
///
/// A URL moves `Queued -> Claimed -> Fetching` and then ends in exactly one
/// terminal state.
use std::fmt;

/// Represents the state of one URL as a crawl task handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is sitting in the frontier
    Queued,

    /// URL has been claimed in the visited set by a task
    Claimed,

    /// URL is being fetched
    Fetching,

    // ===== Terminal Success States =====
    /// Page was fetched with 200 OK and its record was reported
    Processed,

    // ===== Terminal Skip States =====
    /// URL was already claimed by another task
    Skipped,

    /// URL is further from the seed than the configured depth limit
    DepthExceeded,

    // ===== Terminal Error States =====
    /// Page returned HTTP 404
    DeadLink,

    /// Page returned some other non-200 status
    HttpError,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Fetch failed for other reasons (body read error, protocol error)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if a task may still move this URL forward
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Claimed | Self::Fetching)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the URL was dropped without being fetched
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped | Self::DepthExceeded)
    }

    /// Returns true if this represents a fetch error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DeadLink | Self::HttpError | Self::Unreachable | Self::Failed
        )
    }

    /// Returns true if the URL went through a successful claim
    pub fn was_claimed(&self) -> bool {
        self.is_success() || self.is_error()
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Claimed => "claimed",
            Self::Fetching => "fetching",
            Self::Processed => "processed",
            Self::Skipped => "skipped",
            Self::DepthExceeded => "depth_exceeded",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
        }
    }

    /// Returns all terminal states, in display order
    pub fn terminal_states() -> [Self; 7] {
        [
            Self::Processed,
            Self::Skipped,
            Self::DepthExceeded,
            Self::DeadLink,
            Self::HttpError,
            Self::Unreachable,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
