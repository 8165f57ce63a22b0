//! Storage module for persisting crawl results
//!
//! Results are kept in a plain-text log, one `target,link` line per record.
//! The log is only ever appended to; a flushed line is never rewritten, so
//! an interrupted run keeps every batch that finished before it stopped.

mod log_file;
mod traits;

pub use log_file::AppendLog;
pub use traits::{ResultStore, StoreError, StoreResult};

use crate::crawler::Target;
use std::fmt;

/// Checks that a target fits the first field of a log line
///
/// Empty targets and targets holding a comma or a line break are rejected.
pub fn validate_target(target: &Target) -> StoreResult<()> {
    let value = target.as_str();
    if value.is_empty() || value.contains([',', '\n', '\r']) {
        return Err(StoreError::InvalidRecord(format!(
            "target '{}' cannot be stored as a log field",
            value.escape_debug()
        )));
    }
    Ok(())
}

/// One target and the website link recovered for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub target: Target,
    pub link: String,
}

impl ResultRecord {
    pub fn new(target: Target, link: impl Into<String>) -> Self {
        Self {
            target,
            link: link.into(),
        }
    }

    /// Rejects records the unescaped line format cannot represent
    pub fn validate(&self) -> StoreResult<()> {
        validate_target(&self.target)?;
        if self.link.contains(['\n', '\r']) {
            return Err(StoreError::InvalidRecord(format!(
                "link for target {} contains a line break",
                self.target
            )));
        }
        Ok(())
    }

    /// Parses one complete log line; the target ends at the first comma
    pub fn from_line(line: &str) -> Option<Self> {
        let (target, link) = line.split_once(',')?;
        if target.is_empty() {
            return None;
        }
        Some(Self::new(Target::new(target), link))
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.target, self.link)
    }
}
