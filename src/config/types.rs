use serde::Deserialize;

/// Main configuration structure for District Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Batch pacing and failure handling for the directory crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of targets processed between result flushes
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause before every directory search (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause between consecutive batches (milliseconds)
    #[serde(rename = "batch-delay-ms", default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Extra attempts after a failed directory search
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff before the first retry, doubled on each further retry (milliseconds)
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Skip a target whose retries are exhausted instead of aborting the run
    #[serde(rename = "skip-failed-targets", default = "default_skip_failed_targets")]
    pub skip_failed_targets: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            request_delay_ms: default_request_delay_ms(),
            batch_delay_ms: default_batch_delay_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            skip_failed_targets: default_skip_failed_targets(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Where and how the directory search form is driven
///
/// The selectors are position-based and tied to the directory's current
/// markup; they are kept here so a layout change is a config edit.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Page hosting the search form
    #[serde(rename = "search-url", default = "default_search_url")]
    pub search_url: String,

    /// Text input that receives the target identifier
    #[serde(rename = "search-input-selector", default = "default_search_input_selector")]
    pub search_input_selector: String,

    /// Submit button of the search form
    #[serde(rename = "search-button-selector", default = "default_search_button_selector")]
    pub search_button_selector: String,

    /// Element enclosing the result links
    #[serde(rename = "results-selector", default = "default_results_selector")]
    pub results_selector: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            search_input_selector: default_search_input_selector(),
            search_button_selector: default_search_button_selector(),
            results_selector: default_results_selector(),
        }
    }
}

/// Headless browser settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for every navigation or element lookup (seconds)
    #[serde(rename = "navigation-timeout-secs", default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Chrome/Chromium binary; auto-detected when absent
    #[serde(default)]
    pub executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            executable: None,
        }
    }
}

/// Input list layout
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Header of the CSV column holding target identifiers
    #[serde(rename = "target-column", default = "default_target_column")]
    pub target_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            target_column: default_target_column(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Append-only `target,link` log written by the directory crawl
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Links accepted by the robots.txt check, one per line
    #[serde(rename = "accepted-links-path")]
    pub accepted_links_path: String,
}

fn default_batch_size() -> usize {
    5
}

fn default_request_delay_ms() -> u64 {
    4_000
}

fn default_batch_delay_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    5_000
}

fn default_skip_failed_targets() -> bool {
    true
}

fn default_search_url() -> String {
    "https://nces.ed.gov/ccd/districtsearch/".to_string()
}

fn default_search_input_selector() -> String {
    "body > div:nth-child(9) > div.sfsContent > table > tbody > tr:nth-child(3) > td > table > tbody > tr:nth-child(3) > td:nth-child(1) > table > tbody > tr:nth-child(2) > td > table > tbody > tr:nth-child(2) > td:nth-child(3) > input[type=text]".to_string()
}

fn default_search_button_selector() -> String {
    "body > div:nth-child(9) > div.sfsContent > table > tbody > tr:nth-child(3) > td > table > tbody > tr:nth-child(3) > td:nth-child(2) > table > tbody > tr > td > table > tbody > tr:nth-child(3) > td > table > tbody > tr > td:nth-child(2) > input[type=submit]".to_string()
}

fn default_results_selector() -> String {
    "body > div:nth-child(9) > div.sfsContent > table:nth-child(4)".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_secs() -> u64 {
    30
}

fn default_target_column() -> String {
    "NCES District ID".to_string()
}
