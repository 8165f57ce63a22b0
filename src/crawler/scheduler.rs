//! Batched, rate-limited directory crawl
//!
//! Targets are searched one at a time, in sorted order, with a fixed pause
//! before every search and a longer pause between batches. New links are
//! appended to the result store after each batch, before the pause, so a
//! killed run loses at most the batch in progress.

use crate::browser::{BrowserError, SearchSession};
use crate::config::CrawlerConfig;
use crate::crawler::accumulator::LinkAccumulator;
use crate::crawler::batch::{batch_count, create_batches, Target, TargetSet};
use crate::crawler::parser::clean_weblinks;
use crate::output::RunSummary;
use crate::state::TargetState;
use crate::storage::ResultStore;
use crate::{ConfigError, ScoutError};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Drives one crawl run over a single search session and result store
///
/// The scheduler owns the session and closes it when `run` returns, on
/// success and on error alike.
pub struct BatchScheduler<S: SearchSession, R: ResultStore> {
    config: CrawlerConfig,
    session: S,
    store: R,
    accumulator: LinkAccumulator,
    states: BTreeMap<Target, TargetState>,
    resumed_skipped: usize,
}

impl<S: SearchSession, R: ResultStore> BatchScheduler<S, R> {
    pub fn new(config: CrawlerConfig, session: S, store: R) -> Self {
        Self {
            config,
            session,
            store,
            accumulator: LinkAccumulator::new(),
            states: BTreeMap::new(),
            resumed_skipped: 0,
        }
    }

    /// Notes how many targets were dropped because an earlier run recorded them
    pub fn with_resumed(mut self, skipped: usize) -> Self {
        self.resumed_skipped = skipped;
        self
    }

    /// Crawls every target and returns the run summary
    ///
    /// A failed append to the store, or a failed search when
    /// `skip_failed_targets` is off, aborts the run. Records of the batch in
    /// progress are not flushed in that case.
    pub async fn run(mut self, targets: TargetSet) -> Result<RunSummary, ScoutError> {
        let started = Instant::now();
        let mut summary = RunSummary {
            resumed_skipped: self.resumed_skipped,
            ..Default::default()
        };

        let result = self.run_batches(targets, &mut summary).await;

        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }
        result?;

        summary.targets_by_state = self.state_counts();
        summary.links_recorded = self.accumulator.len();
        summary.elapsed = started.elapsed();

        tracing::info!(
            "Total {} targets processed, {} with a website link",
            summary.targets_total(),
            summary.links_recorded
        );
        Ok(summary)
    }

    async fn run_batches(
        &mut self,
        targets: TargetSet,
        summary: &mut RunSummary,
    ) -> Result<(), ScoutError> {
        let batch_size = self.config.batch_size;
        if batch_size == 0 {
            return Err(ConfigError::Validation("batch-size must be at least 1".to_string()).into());
        }

        let targets = targets.into_sorted();
        for target in &targets {
            self.states.insert(target.clone(), TargetState::Pending);
        }

        let batches_total = batch_count(targets.len(), batch_size);
        summary.batches_total = batches_total;
        tracing::info!(
            "Start process for {} targets in {} batches of up to {}",
            targets.len(),
            batches_total,
            batch_size
        );

        for (index, batch) in create_batches(&targets, batch_size).enumerate() {
            let batch_number = index + 1;

            self.process_batch(batch).await?;
            tracing::info!("Processed batch {} of {}", batch_number, batches_total);

            let written = self.accumulator.flush_into(&mut self.store)?;
            tracing::info!("Wrote {} new records to the result store", written);
            summary.lines_written += written;
            summary.batches_completed += 1;

            if batch_number < batches_total && self.config.batch_delay_ms > 0 {
                tracing::info!(
                    "Waiting for {} seconds before the next batch...",
                    self.config.batch_delay_ms / 1000
                );
                pause(self.config.batch_delay_ms).await;
            }
        }

        Ok(())
    }

    async fn process_batch(&mut self, batch: &[Target]) -> Result<(), ScoutError> {
        for target in batch {
            self.process_target(target).await?;
        }
        Ok(())
    }

    async fn process_target(&mut self, target: &Target) -> Result<(), ScoutError> {
        pause(self.config.request_delay_ms).await;

        tracing::info!("Processing {}", target);
        self.set_state(target, TargetState::Searching);

        let pages = match self.search_with_retry(target).await {
            Ok(pages) => pages,
            Err(e) if self.config.skip_failed_targets => {
                tracing::warn!("Skipping {} after failed search: {}", target, e);
                self.set_state(target, TargetState::Skipped);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Search for {} failed, aborting run: {}", target, e);
                self.set_state(target, TargetState::Failed);
                return Err(ScoutError::Automation {
                    target: target.to_string(),
                    source: e,
                });
            }
        };

        let mut linked = false;
        for markup in &pages {
            let Some(link) = clean_weblinks(markup).into_iter().next() else {
                continue;
            };
            match self.accumulator.record(target, link) {
                Ok(()) => linked = true,
                Err(e) => tracing::warn!("Dropping link for {}: {}", target, e),
            }
        }

        if linked {
            tracing::debug!(
                "{} -> {}",
                target,
                self.accumulator.link(target).unwrap_or_default()
            );
            self.set_state(target, TargetState::Linked);
        } else {
            tracing::info!("No website link found for {} ({} result pages)", target, pages.len());
            self.set_state(target, TargetState::NoLink);
        }

        Ok(())
    }

    /// Runs the search, retrying transient failures with exponential backoff
    async fn search_with_retry(&mut self, target: &Target) -> Result<Vec<String>, BrowserError> {
        let mut attempt: u32 = 0;
        loop {
            match self.session.search(target.as_str()).await {
                Ok(pages) => return Ok(pages),
                Err(e) if attempt < self.config.max_retries && e.is_transient() => {
                    let backoff = retry_backoff_ms(self.config.retry_backoff_ms, attempt);
                    attempt += 1;
                    tracing::warn!(
                        "Search for {} failed (attempt {} of {}): {}; retrying in {}ms",
                        target,
                        attempt,
                        self.config.max_retries + 1,
                        e,
                        backoff
                    );
                    pause(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn set_state(&mut self, target: &Target, state: TargetState) {
        self.states.insert(target.clone(), state);
    }

    fn state_counts(&self) -> BTreeMap<TargetState, usize> {
        let mut counts = BTreeMap::new();
        for state in self.states.values() {
            *counts.entry(*state).or_insert(0) += 1;
        }
        counts
    }
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`
fn retry_backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64 << attempt.min(16))
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
