//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Tracks the state of individual URLs (queued, claimed, fetching, processed, etc.)
//! - `VisitedSet`: Shared record of claimed URLs, guaranteeing at-most-once processing

mod page_state;
mod visited;

// Re-export main types
pub use page_state::PageState;
pub use visited::VisitedSet;
