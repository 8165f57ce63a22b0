//! Run statistics for the directory crawl and the robots.txt check

use crate::compliance::CheckReport;
use crate::state::TargetState;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of one directory crawl run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of batches the run was split into
    pub batches_total: usize,

    /// Batches processed and flushed
    pub batches_completed: usize,

    /// Final state of every target handled in this run
    pub targets_by_state: BTreeMap<TargetState, usize>,

    /// Targets holding a link in memory at the end of the run
    pub links_recorded: usize,

    /// Lines appended to the result log
    pub lines_written: usize,

    /// Targets skipped because an earlier run already recorded them
    pub resumed_skipped: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Count of targets in `state`
    pub fn count(&self, state: TargetState) -> usize {
        self.targets_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Count of targets whose state satisfies `predicate`
    pub fn count_where(&self, predicate: impl Fn(&TargetState) -> bool) -> usize {
        self.targets_by_state
            .iter()
            .filter(|(state, _)| predicate(state))
            .map(|(_, count)| count)
            .sum()
    }

    /// Number of targets handled in this run
    pub fn targets_total(&self) -> usize {
        self.targets_by_state.values().sum()
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!(
        "  Batches processed: {} / {}",
        summary.batches_completed, summary.batches_total
    );
    println!("  Targets handled: {}", summary.targets_total());
    if summary.resumed_skipped > 0 {
        println!("  Already recorded (skipped): {}", summary.resumed_skipped);
    }
    println!("  Links recorded: {}", summary.links_recorded);
    println!("  Lines written: {}", summary.lines_written);
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    let total = summary.targets_total();
    if total > 0 {
        println!("Targets by State:");
        for state in TargetState::all_states() {
            let count = summary.count(state);
            if count == 0 {
                continue;
            }
            let percentage = (count as f64 / total as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", state, count, percentage);
        }
        println!();
    }

    let searched = summary.count_where(TargetState::is_success);
    let errors = summary.count_where(TargetState::is_error);
    if errors > 0 {
        println!("Targets not searched: {}", errors);
    }
    println!("Searches completed: {} / {}", searched, total);

    let linked = summary.count(TargetState::Linked);
    let link_rate = if total > 0 {
        (linked as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Link Rate: {:.1}% ({} / {} targets with a website link)",
        link_rate, linked, total
    );
}

/// Prints a robots.txt check report to stdout
pub fn print_check_report(report: &CheckReport) {
    println!("=== Robots.txt Check ===\n");
    println!("  Sites checked: {}", report.total());
    println!("  Accepted: {}", report.accepted.len());
    println!("  Denied: {}", report.denied);
    println!("  Staff/faculty disallowed: {}", report.sensitive_disallowed);
}
