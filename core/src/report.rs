use std::path::{Path, PathBuf};

use crate::error::{BatchError, ConvertError};

/// How a single file of the batch ended up.
#[derive(Debug)]
pub enum FileStatus {
    /// Written to this path
    Converted(PathBuf),
    Failed(ConvertError),
    /// Never attempted because an earlier file failed under fail-fast
    Skipped,
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn new(source: PathBuf, result: Result<PathBuf, ConvertError>) -> Self {
        let status = match result {
            Ok(written) => FileStatus::Converted(written),
            Err(e) => FileStatus::Failed(e),
        };
        Self { source, status }
    }

    pub fn skipped(source: PathBuf) -> Self {
        Self {
            source,
            status: FileStatus::Skipped,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}

/// Aggregate report for all files of one batch, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, outcome: FileOutcome) {
        self.results.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn converted(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(|r| match &r.status {
            FileStatus::Converted(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn success_count(&self) -> usize {
        self.converted().count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, FileStatus::Skipped))
            .count()
    }

    /// `Ok` with the non-failed outcomes when nothing failed, otherwise the
    /// failures folded into a single error, the earliest recorded one first.
    pub fn into_result(self) -> Result<Self, ConvertError> {
        let total = self.total();
        let mut kept = Self::with_capacity(total);
        let mut failures = Vec::new();
        for outcome in self.results {
            match outcome.status {
                FileStatus::Failed(e) => failures.push(e),
                status => kept.add(FileOutcome {
                    source: outcome.source,
                    status,
                }),
            }
        }

        let mut failures = failures.into_iter();
        match failures.next() {
            None => Ok(kept),
            Some(first) => Err(BatchError::new(first, failures.collect(), total).into()),
        }
    }
}
