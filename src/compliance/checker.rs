//! Robots.txt gate for lists of district websites
//!
//! A denied site is logged and skipped; it never turns into an error.

use crate::compliance::evaluator::{evaluate, ComplianceDecision};
use crate::input::SiteEntry;
use crate::robots::{fetch_policy_text, parse_rules, PolicyCache, RuleTable};
use crate::state::SiteVerdict;
use crate::url::site_origin;
use reqwest::Client;

/// Result of checking one site
#[derive(Debug, Clone)]
pub struct SiteCheck {
    pub link: String,
    pub decision: ComplianceDecision,
    pub verdict: SiteVerdict,
}

/// Outcome of checking a whole site list
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Links that passed both checks, in input order
    pub accepted: Vec<String>,
    /// Sites denied outright
    pub denied: usize,
    /// Sites open overall but closed for staff/faculty paths
    pub sensitive_disallowed: usize,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.denied + self.sensitive_disallowed
    }
}

/// Fetches, parses and evaluates robots.txt for district sites
pub struct ComplianceChecker {
    client: Client,
    cache: PolicyCache,
}

impl ComplianceChecker {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: PolicyCache::new(),
        }
    }

    /// Returns the rule table for a site, fetching it unless a fresh copy is cached
    pub async fn rules_for(&mut self, site: &str) -> RuleTable {
        let origin = match site_origin(site) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::debug!("Unusable site link {}: {}", site, e);
                return RuleTable::default();
            }
        };

        if let Some(rules) = self.cache.get(&origin) {
            tracing::debug!("Using cached robots.txt for {}", origin);
            return rules.clone();
        }

        let content = fetch_policy_text(&self.client, site).await;
        if content.is_none() {
            tracing::debug!("No robots.txt for {}, treating as unrestricted", origin);
        }
        let rules = parse_rules(content.as_deref());
        self.cache.insert(origin, rules.clone());
        rules
    }

    /// Checks a single site
    pub async fn check_site(&mut self, site: &str) -> SiteCheck {
        let rules = self.rules_for(site).await;
        let decision = evaluate(&rules);
        let verdict = decision.verdict();

        match verdict {
            SiteVerdict::Allowed => tracing::info!("Crawling {}: ALLOWED", site),
            SiteVerdict::Denied => tracing::warn!("Crawling {}: DENIED", site),
            SiteVerdict::SensitiveDisallowed => {
                tracing::warn!("Crawling staff/faculty on {}: DISALLOWED", site);
                tracing::debug!("Rules for {}: {:?}", site, rules);
            }
        }

        SiteCheck {
            link: site.to_string(),
            decision,
            verdict,
        }
    }

    /// Checks every site in order and collects the accepted links
    pub async fn check_sites(&mut self, sites: &[SiteEntry]) -> CheckReport {
        let mut report = CheckReport::default();

        for entry in sites {
            tracing::info!("District {}: {}", entry.name, entry.link);
            let check = self.check_site(&entry.link).await;
            match check.verdict {
                verdict if verdict.is_accepted() => report.accepted.push(check.link),
                SiteVerdict::Denied => report.denied += 1,
                _ => report.sensitive_disallowed += 1,
            }
        }

        report
    }

    /// Number of robots.txt origins fetched so far
    pub fn cached_origins(&self) -> usize {
        self.cache.len()
    }
}
