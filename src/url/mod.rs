//! URL handling module for web-spider
//!
//! Addresses are opaque strings everywhere in the crawler: two links are the
//! same URL only if their text is identical. This module only decides which of
//! them are worth fetching.

mod validator;

pub use validator::is_valid;
