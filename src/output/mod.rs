//! Output module for run summaries and the accepted-links list
//!
//! This module handles:
//! - Summarising a directory crawl run
//! - Writing the compliance checker's accepted links

mod accepted;
pub mod stats;

pub use accepted::write_accepted_links;
pub use stats::{print_check_report, print_summary, RunSummary};
