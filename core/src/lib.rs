//! Batch conversion of image files between container formats.
//!
//! [`convert`] walks a directory for files of the input format and
//! re-encodes each one, in parallel, next to the original.

pub mod batch;
pub mod config;
pub mod converter;
pub mod error;
pub mod format;
pub mod report;
pub mod scanner;

pub use batch::{convert, convert_with_progress, plan, ProgressObserver, Silent};
pub use config::{ConversionRequest, FailurePolicy};
pub use error::{BatchError, ConvertError, ValidationError};
pub use report::{BatchReport, FileOutcome, FileStatus};
