//! URL handling module for District Scout
//!
//! Site links in input lists are often bare hosts (`district.k12.ca.us`), so
//! every helper here accepts a link without a scheme and assumes HTTPS.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a site link into an absolute HTTP(S) URL
///
/// A link without a scheme is retried with `https://` prepended.
///
/// # Examples
///
/// ```
/// use district_scout::url::site_url;
///
/// let url = site_url("www.example.edu/about").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.edu/about");
/// ```
pub fn site_url(site: &str) -> UrlResult<Url> {
    let trimmed = site.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty site link".to_string()));
    }

    let url = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("https://{}", trimmed))
            .map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the robots.txt location for a site link
///
/// Path, query and fragment of the link are discarded.
///
/// # Examples
///
/// ```
/// use district_scout::url::robots_url;
///
/// let url = robots_url("https://example.edu/schools/?id=4").unwrap();
/// assert_eq!(url.as_str(), "https://example.edu/robots.txt");
/// ```
pub fn robots_url(site: &str) -> UrlResult<Url> {
    let url = site_url(site)?;
    url.join("/robots.txt")
        .map_err(|e| UrlError::Parse(e.to_string()))
}

/// Returns `scheme://host[:port]` for a site link, used as a cache key
pub fn site_origin(site: &str) -> UrlResult<String> {
    Ok(site_url(site)?.origin().ascii_serialization())
}

/// Resolves an `href` against the page it was found on
///
/// Returns `None` for unparseable references and non-HTTP(S) targets such
/// as `javascript:` or `mailto:` links.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
