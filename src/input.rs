//! Input list readers
//!
//! Two CSV layouts are accepted:
//! - a directory export with a header row, from which one column supplies
//!   the crawl targets;
//! - a header-less `name,link` list of district websites for the robots.txt
//!   check.

use crate::crawler::{Target, TargetSet};
use crate::storage::validate_target;
use crate::ScoutError;
use std::io::Read;
use std::path::Path;

/// One district website from a site list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub name: String,
    pub link: String,
}

/// Reads crawl targets from the named column of a CSV export
pub fn read_targets(path: &Path, column: &str) -> Result<TargetSet, ScoutError> {
    let file = std::fs::File::open(path)?;
    read_targets_from(file, column)
}

/// Reads crawl targets from any CSV source with a header row
///
/// Blank cells are skipped and duplicates collapse into one target. A value
/// the result log cannot hold, such as a quoted cell containing a comma, is
/// skipped with a warning.
pub fn read_targets_from<R: Read>(reader: R, column: &str) -> Result<TargetSet, ScoutError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = csv_reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| ScoutError::Input(format!("no '{}' column in target list", column)))?;

    let mut targets = TargetSet::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        match record.get(index) {
            Some(value) if !value.is_empty() => {
                let target = Target::new(value);
                match validate_target(&target) {
                    Ok(()) => {
                        targets.insert(target);
                    }
                    Err(e) => tracing::warn!("Skipping unstorable target on row {}: {}", line, e),
                }
            }
            _ => tracing::debug!("Skipping row {} without a target value", line),
        }
    }

    Ok(targets)
}

/// Reads a header-less `name,link` site list
pub fn read_site_list(path: &Path) -> Result<Vec<SiteEntry>, ScoutError> {
    let file = std::fs::File::open(path)?;
    read_site_list_from(file)
}

/// Reads `name,link` rows from any CSV source
///
/// A repeated name keeps its first position and takes the later link.
/// Rows that do not have exactly two fields are rejected.
pub fn read_site_list_from<R: Read>(reader: R) -> Result<Vec<SiteEntry>, ScoutError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sites: Vec<SiteEntry> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() != 2 {
            let line = record.position().map_or(0, |p| p.line());
            return Err(ScoutError::Input(format!(
                "site list row {} has {} fields, expected name,link",
                line,
                record.len()
            )));
        }

        let entry = SiteEntry {
            name: record[0].to_string(),
            link: record[1].to_string(),
        };

        match sites.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => existing.link = entry.link,
            None => sites.push(entry),
        }
    }

    Ok(sites)
}
