//! Crawl permission decisions from a parsed rule table
//!
//! Both checks consult only the `*` group and fail open: a missing table,
//! a missing `*` group, or a group without a matching rule all mean
//! "allowed".

use crate::robots::RuleTable;
use crate::state::SiteVerdict;
use regex::Regex;
use std::sync::LazyLock;

/// Disallow entries naming a staff or faculty directory anywhere in the path
static SENSITIVE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*/(staff|faculty)/.*").expect("sensitive path pattern should compile")
});

/// Both permission checks for one site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceDecision {
    /// False only when `*` disallows `/`
    pub site_allowed: bool,
    /// False when `*` disallows a `/staff/` or `/faculty/` path
    pub sensitive_path_allowed: bool,
}

impl ComplianceDecision {
    /// Folds both checks into one verdict; a site-wide denial wins
    pub fn verdict(&self) -> SiteVerdict {
        if !self.site_allowed {
            SiteVerdict::Denied
        } else if !self.sensitive_path_allowed {
            SiteVerdict::SensitiveDisallowed
        } else {
            SiteVerdict::Allowed
        }
    }
}

/// Returns false only if the `*` group disallows exactly `/`
pub fn is_site_allowed(rules: &RuleTable) -> bool {
    !rules
        .default_agent()
        .is_some_and(|agent| agent.disallow.iter().any(|path| path == "/"))
}

/// Returns false if any `*` disallow entry covers a staff or faculty path
pub fn is_sensitive_path_allowed(rules: &RuleTable) -> bool {
    !rules
        .default_agent()
        .is_some_and(|agent| agent.disallow.iter().any(|path| SENSITIVE_PATH.is_match(path)))
}

/// Runs both checks against a rule table
///
/// # Example
///
/// ```
/// use district_scout::compliance::evaluate;
/// use district_scout::robots::parse_rules;
///
/// let decision = evaluate(&parse_rules(Some("User-agent: *\nDisallow: /staff/")));
/// assert!(decision.site_allowed);
/// assert!(!decision.sensitive_path_allowed);
/// ```
pub fn evaluate(rules: &RuleTable) -> ComplianceDecision {
    ComplianceDecision {
        site_allowed: is_site_allowed(rules),
        sensitive_path_allowed: is_sensitive_path_allowed(rules),
    }
}
