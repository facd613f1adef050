use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::config::{ConversionRequest, FailurePolicy, ValidatedRequest};
use crate::converter::{convert_one, output_path};
use crate::error::ConvertError;
use crate::report::{BatchReport, FileOutcome, FileStatus};
use crate::scanner::scan;

/// Hooks invoked while a batch runs. `finished` is called from worker
/// threads, once per scanned file.
pub trait ProgressObserver: Sync {
    fn scanned(&self, _total: usize) {}
    fn finished(&self, _outcome: &FileOutcome) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl ProgressObserver for Silent {}

/// Convert every matching file under the request's root.
pub fn convert(request: &ConversionRequest) -> Result<BatchReport, ConvertError> {
    convert_with_progress(request, &Silent)
}

/// Like [`convert`], reporting progress to `observer`.
///
/// Validation and scanning happen before any conversion starts. Every file
/// is then converted on the rayon pool. Unless the request asks for
/// fail-fast, a failing file does not stop its siblings; the batch fails
/// after all of them have finished.
pub fn convert_with_progress(
    request: &ConversionRequest,
    observer: &dyn ProgressObserver,
) -> Result<BatchReport, ConvertError> {
    let request = request.validate()?;
    let paths = scan(&request.root, request.input)?;
    observer.scanned(paths.len());

    if paths.is_empty() {
        log::info!(
            "No {} files under {}",
            request.input_extension(),
            request.root.display()
        );
        return Ok(BatchReport::new());
    }

    log::info!(
        "Converting {} file(s) under {} from {} to {} ({})",
        paths.len(),
        request.root.display(),
        request.input_extension(),
        request.output_extension(),
        request.failure_policy
    );

    let report = run(&request, paths, observer);

    log::info!(
        "Batch finished: {} converted, {} failed, {} skipped",
        report.success_count(),
        report.error_count(),
        report.skipped_count()
    );

    report.into_result()
}

fn run(request: &ValidatedRequest, paths: Vec<PathBuf>, observer: &dyn ProgressObserver) -> BatchReport {
    let report = Mutex::new(BatchReport::with_capacity(paths.len()));
    let aborted = AtomicBool::new(false);
    let fail_fast = request.failure_policy == FailurePolicy::FailFast;

    paths.into_par_iter().for_each(|path| {
        let outcome = if fail_fast && aborted.load(Ordering::Acquire) {
            FileOutcome::skipped(path)
        } else {
            let result = convert_one(&path, request.input, request.output);
            FileOutcome::new(path, result)
        };

        if let FileStatus::Failed(e) = &outcome.status {
            log::error!("Error converting {}: {}", outcome.source.display(), e);
            aborted.store(true, Ordering::Release);
        }

        observer.finished(&outcome);
        report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(outcome);
    });

    report.into_inner().unwrap_or_else(PoisonError::into_inner)
}

/// Validate and scan, returning each `(source, destination)` pair a
/// conversion would produce. Nothing is written.
pub fn plan(request: &ConversionRequest) -> Result<Vec<(PathBuf, PathBuf)>, ConvertError> {
    let request = request.validate()?;
    let paths = scan(&request.root, request.input)?;
    Ok(paths
        .into_iter()
        .map(|source| {
            let destination = output_path(&source, request.input, request.output);
            (source, destination)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::AtomicUsize;

    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    use crate::error::ValidationError;

    struct Counting {
        scanned: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProgressObserver for Counting {
        fn scanned(&self, total: usize) {
            self.scanned.store(total, Ordering::SeqCst);
        }

        fn finished(&self, _outcome: &FileOutcome) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn write_pngs(dir: &std::path::Path, count: u8) {
        for i in 0..count {
            RgbImage::from_pixel(4, 4, Rgb([i, i, i]))
                .save(dir.join(format!("img{i}.png")))
                .unwrap();
        }
    }

    #[test]
    fn test_validation_before_filesystem() {
        let request = ConversionRequest::new("/definitely/not/here", "png", "png");
        assert!(matches!(
            convert(&request),
            Err(ConvertError::Validation(ValidationError::SameFormat))
        ));
    }

    #[test]
    fn test_missing_root_fails_without_tasks() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let request = ConversionRequest::new(missing.to_string_lossy(), "jpg", "png");
        let observer = Counting {
            scanned: AtomicUsize::new(usize::MAX),
            finished: AtomicUsize::new(0),
        };

        let err = convert_with_progress(&request, &observer).unwrap_err();
        assert!(matches!(err, ConvertError::Traversal { .. }));
        assert_eq!(observer.scanned.load(Ordering::SeqCst), usize::MAX);
        assert_eq!(observer.finished.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_directory_succeeds() {
        let temp = TempDir::new().unwrap();
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "jpg", "png");
        let report = convert(&request).unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_observer_sees_every_file() {
        let temp = TempDir::new().unwrap();
        write_pngs(temp.path(), 6);
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpg");
        let observer = Counting {
            scanned: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        };

        let report = convert_with_progress(&request, &observer).unwrap();
        assert_eq!(report.success_count(), 6);
        assert_eq!(observer.scanned.load(Ordering::SeqCst), 6);
        assert_eq!(observer.finished.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_run_to_completion_converts_siblings_of_a_failure() {
        let temp = TempDir::new().unwrap();
        write_pngs(temp.path(), 5);
        fs::write(temp.path().join("broken.png"), b"garbage").unwrap();
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpg");

        match convert(&request) {
            Err(ConvertError::Batch(err)) => {
                assert_eq!(err.total(), 6);
                assert_eq!(err.failed_count(), 1);
                assert!(matches!(err.first(), ConvertError::Decode { .. }));
            }
            other => panic!("expected batch error, got {other:?}"),
        }
        for i in 0..5 {
            assert!(temp.path().join(format!("img{i}.jpg")).exists());
        }
    }

    #[test]
    fn test_fail_fast_still_reports_failure() {
        let temp = TempDir::new().unwrap();
        write_pngs(temp.path(), 3);
        fs::write(temp.path().join("broken.png"), b"garbage").unwrap();
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpg")
            .with_failure_policy(FailurePolicy::FailFast);

        let err = convert(&request).unwrap_err();
        assert!(matches!(err, ConvertError::Batch(_)));
    }

    #[test]
    fn test_fail_fast_skips_after_first_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a_broken.png"), b"garbage").unwrap();
        for i in 0..5u8 {
            RgbImage::from_pixel(4, 4, Rgb([i, i, i]))
                .save(temp.path().join(format!("b_img{i}.png")))
                .unwrap();
        }
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpg")
            .with_failure_policy(FailurePolicy::FailFast)
            .validate()
            .unwrap();
        let mut paths = scan(&request.root, request.input).unwrap();
        paths.sort();

        // one worker takes the files in order, so the broken one runs first
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let report = pool.install(|| run(&request, paths, &Silent));

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.skipped_count(), 5);
        assert_eq!(report.success_count(), 0);
        assert!(!temp.path().join("b_img0.jpg").exists());
    }

    #[test]
    fn test_run_to_completion_ignores_earlier_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a_broken.png"), b"garbage").unwrap();
        write_pngs(temp.path(), 5);
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpg")
            .validate()
            .unwrap();
        let mut paths = scan(&request.root, request.input).unwrap();
        paths.sort();

        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let report = pool.install(|| run(&request, paths, &Silent));

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(report.success_count(), 5);
    }

    #[test]
    fn test_plan_writes_nothing() {
        let temp = TempDir::new().unwrap();
        write_pngs(temp.path(), 2);
        let request = ConversionRequest::new(temp.path().to_string_lossy(), "png", "jpeg");

        let mut planned = plan(&request).unwrap();
        planned.sort();
        assert_eq!(
            planned,
            vec![
                (temp.path().join("img0.png"), temp.path().join("img0.jpeg")),
                (temp.path().join("img1.png"), temp.path().join("img1.jpeg")),
            ]
        );
        assert!(!temp.path().join("img0.jpeg").exists());
    }
}
