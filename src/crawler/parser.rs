//! Markup scanners for directory result pages
//!
//! The directory renders a district's website as a redirect anchor:
//!
//! ```text
//! <a href="transfer.asp?location=www.example.k12.ca.us" target="_blank">http://www.example.k12.ca.us</a>
//! ```
//!
//! `clean_weblinks` recovers the website from that fragment. It is a narrow,
//! format-specific scraper and does not parse the document.

use crate::browser::BrowserError;
use crate::url::resolve_link;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Redirect prefix removed from each match
const TRANSFER_PREFIX: &str = "transfer.asp?location=";

/// Anchor tail removed from each match
const ANCHOR_TAIL: &str = "\" target=\"_blank\">http";

/// Scheme prepended to every recovered link
const LINK_SCHEME: &str = "https://";

/// Greedy within a line; `.` never crosses a newline
static TRANSFER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"transfer.*http").expect("transfer pattern should compile"));

/// Extracts website links from directory page markup
///
/// Each non-overlapping match of `transfer.*http` has the redirect prefix and
/// the anchor tail removed and is prefixed with `https://`.
///
/// # Example
///
/// ```
/// use district_scout::crawler::clean_weblinks;
///
/// let markup = r#"<a href="transfer.asp?location=example.edu/page" target="_blank">http://example.edu/page</a>"#;
/// assert_eq!(clean_weblinks(markup), vec!["https://example.edu/page".to_string()]);
/// ```
pub fn clean_weblinks(markup: &str) -> Vec<String> {
    let links: Vec<String> = TRANSFER_PATTERN
        .find_iter(markup)
        .map(|m| {
            let cleaned = m.as_str().replace(TRANSFER_PREFIX, "").replace(ANCHOR_TAIL, "");
            format!("{}{}", LINK_SCHEME, cleaned)
        })
        .collect();

    if !links.is_empty() {
        tracing::debug!("Website match: {} link(s)", links.len());
    }

    links
}

/// Collects the absolute links inside the results container, in document order
///
/// Returns `Ok(None)` if no element matches `results_selector`, and
/// `BrowserError::InvalidSelector` if the selector itself does not parse.
pub fn extract_result_links(
    markup: &str,
    base_url: &Url,
    results_selector: &str,
) -> Result<Option<Vec<Url>>, BrowserError> {
    let container_selector = Selector::parse(results_selector).map_err(|e| {
        BrowserError::InvalidSelector(format!("'{}': {:?}", results_selector, e))
    })?;
    let anchor_selector = Selector::parse("a[href]")
        .map_err(|e| BrowserError::InvalidSelector(format!("'a[href]': {:?}", e)))?;

    let document = Html::parse_document(markup);
    let Some(container) = document.select(&container_selector).next() else {
        return Ok(None);
    };

    let links = container
        .select(&anchor_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(base_url, href))
        .collect();

    Ok(Some(links))
}
