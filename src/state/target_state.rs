/// Target state definitions for the directory crawl
use std::fmt;

/// Represents the progress of one directory target within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetState {
    // ===== Active States =====
    /// Target is waiting for its batch
    Pending,

    /// Directory search is in progress (including retries)
    Searching,

    // ===== Terminal States =====
    /// At least one result page yielded a website link
    Linked,

    /// Every result page was read but none carried a website link
    NoLink,

    /// Search kept failing and the target was skipped
    Skipped,

    /// Search failed and aborted the run
    Failed,
}

impl TargetState {
    /// Returns true once no further processing will happen for the target
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Searching)
    }

    /// Returns true if the search completed, with or without a link
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Linked | Self::NoLink)
    }

    /// Returns true if the search never completed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Skipped | Self::Failed)
    }

    /// Short lowercase label used in logs and the run summary
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Searching => "searching",
            Self::Linked => "linked",
            Self::NoLink => "no_link",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible target states
    pub fn all_states() -> [Self; 6] {
        [
            Self::Pending,
            Self::Searching,
            Self::Linked,
            Self::NoLink,
            Self::Skipped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
