//! Integration tests for District Scout
//!
//! Robots.txt checks run against wiremock servers. The directory crawl runs
//! against a scripted search session with tokio's paused clock, so pacing
//! delays are measured exactly without waiting for them.

mod compliance_tests;
mod scheduler_tests;

use district_scout::config::{
    BrowserConfig, Config, CrawlerConfig, DirectoryConfig, InputConfig, OutputConfig,
    UserAgentConfig,
};
use std::path::Path;

/// Creates a test configuration writing its outputs under `dir`
pub fn create_test_config(dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        directory: DirectoryConfig::default(),
        browser: BrowserConfig::default(),
        input: InputConfig::default(),
        output: OutputConfig {
            results_path: dir.join("outputs").join("links.txt").display().to_string(),
            accepted_links_path: dir
                .join("outputs")
                .join("robots_links.txt")
                .display()
                .to_string(),
        },
    }
}
