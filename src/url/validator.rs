use url::Url;

/// Schemes the crawler is able to fetch
const CRAWLABLE_SCHEMES: &[&str] = &["http", "https"];

/// Checks whether a discovered string is a crawlable address
///
/// The string must parse as an absolute URL and its scheme must be exactly
/// `http` or `https`. A raw `http` prefix is not enough: `httpfoo:bar` is
/// rejected. Relative references, malformed strings, and other schemes
/// (`ftp:`, `mailto:`, `javascript:`) all return `false`.
///
/// # Examples
///
/// ```
/// use web_spider::url::is_valid;
///
/// assert!(is_valid("http://x"));
/// assert!(is_valid("https://x"));
/// assert!(!is_valid("ftp://x"));
/// assert!(!is_valid("javascript:void(0)"));
/// assert!(!is_valid(""));
/// ```
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => CRAWLABLE_SCHEMES.contains(&parsed.scheme()) && parsed.has_host(),
        Err(_) => false,
    }
}
