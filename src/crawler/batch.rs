//! Crawl targets and batch partitioning

use std::collections::BTreeSet;
use std::fmt;

/// An opaque directory-search identifier
///
/// Targets order lexicographically by their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Target(String);

impl Target {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Deduplicated, sorted collection of targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: BTreeSet<Target>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target, returning false if it was already present
    pub fn insert(&mut self, target: Target) -> bool {
        self.targets.insert(target)
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.targets.contains(target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Drops every target found in `done`, returning how many were removed
    pub fn remove_all(&mut self, done: &BTreeSet<Target>) -> usize {
        let before = self.targets.len();
        self.targets.retain(|target| !done.contains(target));
        before - self.targets.len()
    }

    /// Consumes the set into its sorted sequence
    pub fn into_sorted(self) -> Vec<Target> {
        self.targets.into_iter().collect()
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

/// Splits `items` into consecutive batches of `batch_size`
///
/// Every batch has exactly `batch_size` elements except possibly the last.
///
/// # Panics
///
/// Panics if `batch_size` is 0. Config validation rejects that value.
pub fn create_batches<T>(items: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(batch_size)
}

/// Number of batches `create_batches` yields for `len` items
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}
