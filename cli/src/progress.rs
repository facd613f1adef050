use indicatif::{ProgressBar, ProgressStyle};

use image_converter_core::{FileOutcome, FileStatus, ProgressObserver};

/// Progress bar fed by the conversion batch.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done!");
    }
}

impl ProgressObserver for BarObserver {
    fn scanned(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn finished(&self, outcome: &FileOutcome) {
        let name = outcome
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match &outcome.status {
            FileStatus::Converted(_) => self.bar.set_message(name),
            FileStatus::Failed(_) => self.bar.set_message(format!("{name} (failed)")),
            FileStatus::Skipped => self.bar.set_message(format!("{name} (skipped)")),
        }
        self.bar.inc(1);
    }
}
