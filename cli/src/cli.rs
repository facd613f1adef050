use clap::Parser;

use image_converter_core::config::{DEFAULT_INPUT_FORMAT, DEFAULT_OUTPUT_FORMAT};
use image_converter_core::{ConversionRequest, FailurePolicy};

/// Convert every image of one format under a directory into another format
#[derive(Debug, Parser)]
#[command(name = "image_converter", version, about)]
pub struct Cli {
    /// Directories to search recursively
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<String>,

    /// Input image format (jpg, jpeg, png)
    #[arg(short, long, value_name = "FORMAT", default_value = DEFAULT_INPUT_FORMAT)]
    pub input: String,

    /// Output image format (jpg, jpeg, png)
    #[arg(short, long, value_name = "FORMAT", default_value = DEFAULT_OUTPUT_FORMAT)]
    pub output: String,

    /// Stop starting new conversions once one has failed
    #[arg(long)]
    pub fail_fast: bool,

    /// Show what would be converted without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::RunToCompletion
        }
    }

    /// The request for one of the given directories.
    pub fn request_for(&self, dir: &str) -> ConversionRequest {
        ConversionRequest::new(dir, self.input.as_str(), self.output.as_str())
            .with_failure_policy(self.failure_policy())
    }
}
