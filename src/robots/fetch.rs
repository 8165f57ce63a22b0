//! HTTP retrieval of robots.txt
//!
//! Every failure (bad link, network error, non-success status) collapses to
//! `None`, which the evaluator treats as "no published policy".

use crate::config::UserAgentConfig;
use crate::url::robots_url;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for policy fetches
///
/// # Example
///
/// ```no_run
/// use district_scout::config::UserAgentConfig;
/// use district_scout::robots::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "DistrictScout".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the robots.txt text for a site link
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `site` - Any link on the site; only scheme, host and port are used
///
/// # Returns
///
/// * `Some(String)` - Body of a 2xx response
/// * `None` - The link is unusable, the request failed, or the status was not 2xx
pub async fn fetch_policy_text(client: &Client, site: &str) -> Option<String> {
    let url = match robots_url(site) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot derive robots.txt URL from {}: {}", site, e);
            return None;
        }
    };

    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", url, e);
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("robots.txt at {} returned HTTP {}", url, status.as_u16());
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::debug!("Failed to read robots.txt body from {}: {}", url, e);
            None
        }
    }
}
