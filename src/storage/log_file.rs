use crate::crawler::Target;
use crate::storage::{ResultRecord, ResultStore, StoreResult};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Append-only `target,link` log on disk
///
/// The file is opened for every append and closed before `append` returns,
/// on success and on error alike. Each append is formatted into one buffer,
/// written in a single call, and synced.
#[derive(Debug, Clone)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every complete record in file order
    ///
    /// A trailing fragment without a newline (an interrupted write) and
    /// lines without a comma are skipped.
    pub fn read_records(&self) -> StoreResult<Vec<ResultRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lines: Vec<&str> = content.split('\n').collect();
        // The element after the final newline is empty for a well-formed file
        if let Some(fragment) = lines.pop() {
            if !fragment.is_empty() {
                tracing::warn!(
                    "Ignoring unterminated line at end of {}: {:?}",
                    self.path.display(),
                    fragment
                );
            }
        }

        let mut records = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            match ResultRecord::from_line(line) {
                Some(record) => records.push(record),
                None => tracing::warn!(
                    "Skipping malformed line {} in {}",
                    index + 1,
                    self.path.display()
                ),
            }
        }

        Ok(records)
    }

    fn ensure_parent_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl ResultStore for AppendLog {
    fn append(&mut self, records: &[ResultRecord]) -> StoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut buffer = String::new();
        for record in records {
            record.validate()?;
            buffer.push_str(&record.to_string());
            buffer.push('\n');
        }

        self.ensure_parent_dir()?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        if ends_mid_line(&mut file)? {
            tracing::warn!(
                "{} ends with a partial line, sealing it before appending",
                self.path.display()
            );
            buffer.insert(0, '\n');
        }

        file.write_all(buffer.as_bytes())?;
        file.flush()?;
        file.sync_data()?;

        tracing::debug!("Appended {} records to {}", records.len(), self.path.display());
        Ok(records.len())
    }

    fn recorded_targets(&self) -> StoreResult<BTreeSet<Target>> {
        Ok(self
            .read_records()?
            .into_iter()
            .map(|record| record.target)
            .collect())
    }
}

/// Returns true if a non-empty file does not end with a newline
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
