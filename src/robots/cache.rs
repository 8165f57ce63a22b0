//! Robots.txt caching implementation
//!
//! Site lists often name several schools on one host, so parsed rule tables
//! are kept per robots.txt origin and refreshed once they are a day old.

use crate::robots::RuleTable;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A parsed rule table and the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedRules {
    /// The parsed robots.txt rules
    pub rules: RuleTable,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRules {
    /// Wraps a rule table fetched just now
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached rules are older than 24 hours
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns how long ago the rules were fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

/// Rule tables keyed by robots.txt origin (`scheme://host[:port]`)
#[derive(Debug, Default)]
pub struct PolicyCache {
    entries: HashMap<String, CachedRules>,
}

impl PolicyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules for an origin unless they are missing or stale
    pub fn get(&self, origin: &str) -> Option<&RuleTable> {
        self.entries
            .get(origin)
            .filter(|cached| !cached.is_stale())
            .map(|cached| &cached.rules)
    }

    /// Stores freshly fetched rules for an origin, replacing older ones
    pub fn insert(&mut self, origin: impl Into<String>, rules: RuleTable) {
        self.entries.insert(origin.into(), CachedRules::new(rules));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
