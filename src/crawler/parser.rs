//! HTML parser for extracting links
//!
//! Every `<a href>` on the page is a candidate link. Destinations are resolved
//! against the page's own URL and returned once each, in first-seen order.
//! Validation happens later; this module does not filter by scheme.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the distinct hyperlink destinations of a page
///
/// # Resolution
///
/// Each `href` is trimmed and joined against `base_url`. When the join fails
/// (the base cannot be a base, or the reference is malformed), the trimmed
/// `href` is kept as-is and left for the validator to reject. Empty hrefs are
/// ignored.
///
/// Parsing never fails: broken markup simply yields fewer (or zero) links.
///
/// # Example
///
/// ```
/// use web_spider::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="a.html">A</a><a href="a.html">again</a><a href="/b">B</a>"#;
/// let base = Url::parse("http://example.com/dir/index.html").unwrap();
///
/// assert_eq!(
///     extract_links(html, &base),
///     vec!["http://example.com/dir/a.html", "http://example.com/b"]
/// );
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(link) = resolve_link(href, base_url) {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves an href against the page URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(_) => Some(href.to_string()),
    }
}
