use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Request rejected before any filesystem access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("specified input extension is not supported")]
    UnsupportedInput,

    #[error("specified output extension is not supported")]
    UnsupportedOutput,

    #[error("please specify different extensions for input & output")]
    SameFormat,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to walk {root}: {source}")]
    Traversal {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl ConvertError {
    /// File the error is about, if it concerns a single file.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileOpen { path, .. }
            | Self::FileCreate { path, .. }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. } => Some(path),
            Self::Traversal { root, .. } => Some(root),
            Self::Validation(_) | Self::Batch(_) => None,
        }
    }
}

/// One or more conversion tasks of a batch failed.
#[derive(Debug)]
pub struct BatchError {
    first: Box<ConvertError>,
    rest: Vec<ConvertError>,
    total: usize,
}

impl BatchError {
    pub fn new(first: ConvertError, rest: Vec<ConvertError>, total: usize) -> Self {
        Self {
            first: Box::new(first),
            rest,
            total,
        }
    }

    /// The first failure that was recorded.
    pub fn first(&self) -> &ConvertError {
        &self.first
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConvertError> {
        std::iter::once(self.first.as_ref()).chain(self.rest.iter())
    }

    pub fn failed_count(&self) -> usize {
        1 + self.rest.len()
    }

    /// Number of files in the batch, including the successful ones.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 1 {
            write!(f, "{}", self.first)
        } else {
            write!(
                f,
                "{} of {} file(s) failed to convert, first error: {}",
                self.failed_count(),
                self.total,
                self.first
            )
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first.as_ref())
    }
}
