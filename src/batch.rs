//! Batch loop over chart images.
//!
//! Images are processed one at a time. A failure on one image is logged and
//! skipped; the rest of the batch continues. Reports are written as each
//! image finishes.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::commentary::Commentator;
use crate::config::AppConfig;
use crate::ocr::Recognizer;
use crate::paths::{report_json_path, report_text_path};
use crate::pipeline::process_image;
use crate::report::{append_to_csv, export_to_json, init_csv, write_text, ChartReport};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    pub summary_csv: Option<PathBuf>,
    pub write_text: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub complete: usize,
    pub failed: Vec<PathBuf>,
}

fn write_outputs(report: &ChartReport, image: &Path, options: &BatchOptions) {
    let json_path = report_json_path(&options.out_dir, image);
    match export_to_json(report, &json_path) {
        Ok(()) => info!("Report written to {}", json_path.display()),
        Err(e) => error!("Failed to write report for {}: {:#}", image.display(), e),
    }

    if options.write_text {
        let text_path = report_text_path(&options.out_dir, image);
        if let Err(e) = write_text(report, &text_path) {
            error!("Failed to write text report for {}: {:#}", image.display(), e);
        }
    }

    if let Some(csv_path) = &options.summary_csv {
        if let Err(e) = append_to_csv(csv_path, report) {
            error!("Failed to append summary row for {}: {:#}", image.display(), e);
        }
    }
}

/// Processes every image in order and writes its outputs.
pub fn run_batch<R: Recognizer + ?Sized>(
    images: &[PathBuf],
    recognizer: &R,
    config: &AppConfig,
    commentator: &dyn Commentator,
    options: &BatchOptions,
) -> BatchSummary {
    info!("Processing {} image(s) into {}", images.len(), options.out_dir.display());

    if let Some(csv_path) = &options.summary_csv {
        if let Err(e) = init_csv(csv_path) {
            warn!("Summary CSV unavailable: {:#}", e);
        }
    }

    let mut summary = BatchSummary::default();
    for (index, image) in images.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, images.len(), image.display());

        let report = match process_image(image, recognizer, config, commentator) {
            Ok(report) => report,
            Err(e) => {
                error!("Skipping {}: {}", image.display(), e);
                summary.failed.push(image.clone());
                continue;
            }
        };

        summary.processed += 1;
        if report.complete {
            summary.complete += 1;
        }
        write_outputs(&report, image, options);
    }

    info!(
        "Batch finished: {} processed ({} complete), {} failed",
        summary.processed,
        summary.complete,
        summary.failed.len()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::StaticCommentator;
    use crate::ocr::UnavailableRecognizer;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    #[test]
    fn test_bad_image_does_not_stop_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        GrayImage::from_pixel(200, 300, Luma([255])).save(&good).unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let options = BatchOptions {
            out_dir: dir.path().join("results"),
            summary_csv: Some(dir.path().join("results").join("summary.csv")),
            write_text: true,
        };
        let summary = run_batch(
            &[bad.clone(), good.clone()],
            &UnavailableRecognizer::new("none"),
            &AppConfig::default(),
            &StaticCommentator,
            &options,
        );

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.complete, 0);
        assert_eq!(summary.failed, vec![bad]);
        assert!(options.out_dir.join("good_report.json").exists());
        assert!(options.out_dir.join("good_report.txt").exists());

        let csv = std::fs::read_to_string(options.summary_csv.unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }
}
