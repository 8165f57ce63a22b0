//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt files. Decisions made
//! from the parsed rules live in [`crate::compliance`].

mod cache;
mod fetch;
mod parser;

pub use cache::{CachedRules, PolicyCache};
pub use fetch::{build_http_client, fetch_policy_text};
pub use parser::{parse_rules, AgentRules, RuleTable, DEFAULT_AGENT};
