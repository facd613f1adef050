use std::fmt;
use std::path::PathBuf;

use crate::error::ValidationError;
use crate::format::Format;

pub const DEFAULT_INPUT_FORMAT: &str = "jpg";
pub const DEFAULT_OUTPUT_FORMAT: &str = "png";

/// What to do with the rest of the batch once a file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Convert every file, then report the failure.
    #[default]
    RunToCompletion,
    /// Start no new conversions after the first failure.
    FailFast,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunToCompletion => write!(f, "run-to-completion"),
            Self::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// One invocation's worth of input, built once by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Directory to search recursively
    pub root_dir: String,
    /// Format token of the files to convert, e.g. "jpg"
    pub input_format: String,
    /// Format token to convert into, e.g. "png"
    pub output_format: String,
    pub failure_policy: FailurePolicy,
}

impl ConversionRequest {
    pub fn new(
        root_dir: impl Into<String>,
        input_format: impl Into<String>,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            input_format: input_format.into(),
            output_format: output_format.into(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Check the request and resolve its formats. Touches no files.
    ///
    /// Surrounding whitespace is ignored. The first violated rule is
    /// reported: empty fields (src, input, output), unsupported input,
    /// unsupported output, then identical formats.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let root = self.root_dir.trim();
        let input = self.input_format.trim();
        let output = self.output_format.trim();

        for (field, value) in [("src", root), ("input", input), ("output", output)] {
            if value.is_empty() {
                return Err(ValidationError::Empty(field));
            }
        }

        let input_format = Format::lookup(input).ok_or(ValidationError::UnsupportedInput)?;
        let output_format = Format::lookup(output).ok_or(ValidationError::UnsupportedOutput)?;

        if input == output {
            return Err(ValidationError::SameFormat);
        }

        Ok(ValidatedRequest {
            root: PathBuf::from(root),
            input: input_format,
            output: output_format,
            failure_policy: self.failure_policy,
        })
    }
}

/// A request whose invariants hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub root: PathBuf,
    pub input: Format,
    pub output: Format,
    pub failure_policy: FailurePolicy,
}

impl ValidatedRequest {
    pub fn input_extension(&self) -> String {
        self.input.extension()
    }

    pub fn output_extension(&self) -> String {
        self.output.extension()
    }
}
