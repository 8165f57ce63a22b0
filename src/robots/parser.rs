//! Robots.txt rule table parser
//!
//! Only the `User-agent`, `Disallow` and `Allow` directives are understood.
//! Paths are kept as literal strings; wildcard and `$` anchor syntax carry no
//! special meaning here.

use std::collections::BTreeMap;

/// The agent token that applies to every crawler
pub const DEFAULT_AGENT: &str = "*";

/// Path rules attached to one user-agent group, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentRules {
    pub disallow: Vec<String>,
    pub allow: Vec<String>,
}

/// Rules keyed by user-agent token
///
/// Built once from a site's robots.txt and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    agents: BTreeMap<String, AgentRules>,
}

impl RuleTable {
    /// Returns true if no user-agent group was found
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of user-agent groups
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Rules for an exact agent token
    pub fn agent(&self, name: &str) -> Option<&AgentRules> {
        self.agents.get(name)
    }

    /// Rules for the `*` group
    pub fn default_agent(&self) -> Option<&AgentRules> {
        self.agent(DEFAULT_AGENT)
    }

    /// Iterates over agent tokens and their rules
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentRules)> {
        self.agents.iter().map(|(name, rules)| (name.as_str(), rules))
    }
}

enum Directive {
    UserAgent,
    Disallow,
    Allow,
}

impl Directive {
    fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("user-agent") {
            Some(Self::UserAgent)
        } else if key.eq_ignore_ascii_case("disallow") {
            Some(Self::Disallow)
        } else if key.eq_ignore_ascii_case("allow") {
            Some(Self::Allow)
        } else {
            None
        }
    }
}

/// Parses robots.txt content into a [`RuleTable`]
///
/// Absent content (failed fetch, non-success status) yields an empty table.
/// Lines that are blank, comments, lack a `:`, or carry an unknown key are
/// skipped. A repeated `User-agent` line for the same token starts that
/// group over with empty lists.
///
/// # Example
///
/// ```
/// use district_scout::robots::parse_rules;
///
/// let table = parse_rules(Some("User-agent: *\nDisallow: /private/"));
/// assert_eq!(table.default_agent().unwrap().disallow, vec!["/private/"]);
/// ```
pub fn parse_rules(content: Option<&str>) -> RuleTable {
    let mut table = RuleTable::default();
    let Some(content) = content else {
        return table;
    };

    let mut current_agent: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match Directive::from_key(key.trim()) {
            Some(Directive::UserAgent) => {
                table
                    .agents
                    .insert(value.to_string(), AgentRules::default());
                current_agent = Some(value.to_string());
            }
            Some(Directive::Disallow) => {
                if let Some(rules) = current_rules(&mut table, current_agent.as_deref()) {
                    rules.disallow.push(value.to_string());
                }
            }
            Some(Directive::Allow) => {
                if let Some(rules) = current_rules(&mut table, current_agent.as_deref()) {
                    rules.allow.push(value.to_string());
                }
            }
            None => {}
        }
    }

    table
}

fn current_rules<'a>(
    table: &'a mut RuleTable,
    current_agent: Option<&str>,
) -> Option<&'a mut AgentRules> {
    current_agent.and_then(|agent| table.agents.get_mut(agent))
}
