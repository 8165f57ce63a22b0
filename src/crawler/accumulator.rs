//! Run-scoped map of targets to their extracted links

use crate::crawler::Target;
use crate::storage::{ResultRecord, ResultStore, StoreError};
use std::collections::{BTreeMap, BTreeSet};

/// Links found during one run, with flush bookkeeping
///
/// A target's latest link replaces its earlier one in memory. Each target is
/// handed to the store at most once per run.
#[derive(Debug, Default)]
pub struct LinkAccumulator {
    links: BTreeMap<Target, String>,
    unflushed: BTreeSet<Target>,
}

impl LinkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the link for a target
    ///
    /// A record the log cannot hold is refused with
    /// `StoreError::InvalidRecord` and nothing is kept, so the rest of the
    /// batch still flushes.
    pub fn record(&mut self, target: &Target, link: String) -> Result<(), StoreError> {
        let record = ResultRecord::new(target.clone(), link);
        record.validate()?;

        let flushed = self.links.contains_key(target) && !self.unflushed.contains(target);
        if flushed {
            tracing::warn!(
                "Target {} was already written; keeping new link {} in memory only",
                target,
                record.link
            );
        } else {
            self.unflushed.insert(target.clone());
        }
        self.links.insert(record.target, record.link);
        Ok(())
    }

    pub fn link(&self, target: &Target) -> Option<&str> {
        self.links.get(target).map(String::as_str)
    }

    /// Number of targets with a link
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of targets recorded since the last successful flush
    pub fn pending(&self) -> usize {
        self.unflushed.len()
    }

    /// Records waiting for the next flush, in target order
    pub fn unflushed_records(&self) -> Vec<ResultRecord> {
        self.unflushed
            .iter()
            .filter_map(|target| {
                self.links
                    .get(target)
                    .map(|link| ResultRecord::new(target.clone(), link.clone()))
            })
            .collect()
    }

    /// Appends the unflushed records to `store`
    ///
    /// The pending set is cleared only if the append succeeds.
    pub fn flush_into<S: ResultStore>(&mut self, store: &mut S) -> Result<usize, StoreError> {
        let records = self.unflushed_records();
        let written = store.append(&records)?;
        self.unflushed.clear();
        Ok(written)
    }
}
