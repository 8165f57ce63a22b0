//! Robots.txt compliance checks for district websites
//!
//! This module decides whether a district site may be crawled at all, and
//! whether its staff and faculty pages may be crawled, then writes the list
//! of accepted links for the content-extraction stage.

mod checker;
mod evaluator;

pub use checker::{CheckReport, ComplianceChecker, SiteCheck};
pub use evaluator::{evaluate, is_sensitive_path_allowed, is_site_allowed, ComplianceDecision};

use crate::config::Config;
use crate::input::SiteEntry;
use crate::output::write_accepted_links;
use crate::robots::build_http_client;
use crate::ScoutError;
use std::path::Path;

/// Checks a site list and writes the accepted links file
///
/// The accepted links file is rewritten on every call.
pub async fn run_site_check(config: &Config, sites: &[SiteEntry]) -> Result<CheckReport, ScoutError> {
    let client = build_http_client(&config.user_agent)?;
    let mut checker = ComplianceChecker::new(client);

    tracing::info!("Checking robots.txt for {} sites", sites.len());
    let report = checker.check_sites(sites).await;

    let path = Path::new(&config.output.accepted_links_path);
    tracing::info!(
        "Writing {} accepted links to {}",
        report.accepted.len(),
        path.display()
    );
    write_accepted_links(path, &report.accepted)?;

    tracing::info!(
        "Robots.txt check complete: {} accepted, {} denied, {} staff/faculty disallowed",
        report.accepted.len(),
        report.denied,
        report.sensitive_disallowed
    );

    Ok(report)
}

/// Checks a single site and logs the verdict without writing any file
pub async fn run_single_check(config: &Config, site: &str) -> Result<SiteCheck, ScoutError> {
    let client = build_http_client(&config.user_agent)?;
    let mut checker = ComplianceChecker::new(client);
    Ok(checker.check_site(site).await)
}
