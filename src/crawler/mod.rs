//! Directory crawl: batching, link extraction and the run loop
//!
//! This module contains:
//! - Target sets and batch partitioning
//! - Link extraction from directory result pages
//! - The run-scoped link accumulator
//! - The batched, rate-limited scheduler

mod accumulator;
mod batch;
mod parser;
mod scheduler;

pub use accumulator::LinkAccumulator;
pub use batch::{batch_count, create_batches, Target, TargetSet};
pub use parser::{clean_weblinks, extract_result_links};
pub use scheduler::BatchScheduler;

use crate::config::Config;
use crate::output::RunSummary;
use crate::storage::{AppendLog, ResultStore};
use crate::ScoutError;

/// Runs a complete directory crawl
///
/// Unless `fresh` is set, targets that already have a line in the result log
/// are dropped first, so an interrupted run picks up where it stopped. The
/// log is only ever appended to.
pub async fn run_crawl(
    config: &Config,
    mut targets: TargetSet,
    fresh: bool,
) -> Result<RunSummary, ScoutError> {
    let store = AppendLog::new(&config.output.results_path);

    let resumed = if fresh {
        0
    } else {
        let done = store.recorded_targets()?;
        let skipped = targets.remove_all(&done);
        if skipped > 0 {
            tracing::info!(
                "Skipping {} targets already recorded in {}",
                skipped,
                store.path().display()
            );
        }
        skipped
    };

    if targets.is_empty() {
        tracing::info!("No targets left to crawl");
        return Ok(RunSummary {
            resumed_skipped: resumed,
            ..Default::default()
        });
    }

    launch_and_run(config, targets, store, resumed).await
}

#[cfg(feature = "browser")]
async fn launch_and_run(
    config: &Config,
    targets: TargetSet,
    store: AppendLog,
    resumed: usize,
) -> Result<RunSummary, ScoutError> {
    let session = crate::browser::ChromiumDirectory::open(&config.browser, &config.directory).await?;
    BatchScheduler::new(config.crawler.clone(), session, store)
        .with_resumed(resumed)
        .run(targets)
        .await
}

#[cfg(not(feature = "browser"))]
async fn launch_and_run(
    _config: &Config,
    _targets: TargetSet,
    _store: AppendLog,
    _resumed: usize,
) -> Result<RunSummary, ScoutError> {
    Err(crate::BrowserError::Launch(
        "district-scout was built without the `browser` feature".to_string(),
    )
    .into())
}
