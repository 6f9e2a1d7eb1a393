//! One chart image, start to finish.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::{info, warn};

use crate::analysis::{analyze_chart, ChartAnalysis};
use crate::calibration::load_annotation;
use crate::commentary::Commentator;
use crate::config::AppConfig;
use crate::error::{ChartError, Result};
use crate::extract::{cross_check, CenterCheck, CenterScanner, Extractor};
use crate::ocr::Recognizer;
use crate::paths::annotation_path;
use crate::report::{build_report, ChartReport};

pub fn load_chart(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| ChartError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Scans the body graph and compares it with the table-derived analysis.
fn check_centers<R: Recognizer + ?Sized>(
    chart: &DynamicImage,
    gray: &GrayImage,
    recognizer: &R,
    config: &AppConfig,
    analysis: &ChartAnalysis,
) -> Result<CenterCheck> {
    let scanner = CenterScanner::new(recognizer, &config.centers)?;
    let readings = scanner.scan(&chart.to_rgb8(), gray);
    let check = cross_check(readings, analysis);
    if check.agrees() {
        info!("Body graph agrees with the planetary values");
    } else {
        warn!(
            "Body graph disagrees: centers {:?}, unexplained gates {:?}",
            check.center_mismatches, check.unexplained_gates
        );
    }
    Ok(check)
}

/// Loads, extracts, analyzes and assembles the report for one image.
///
/// Only an unreadable image is an error; everything downstream degrades to
/// a partial report.
pub fn process_image<R: Recognizer + ?Sized>(
    path: &Path,
    recognizer: &R,
    config: &AppConfig,
    commentator: &dyn Commentator,
) -> Result<ChartReport> {
    let chart_image = load_chart(path)?;
    let img = chart_image.to_luma8();
    info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());

    let image_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let extraction = Extractor::new(recognizer, config).extract(&img, &image_name)?;
    info!(
        "Extracted {}/13 slots from {:?} ({:?} confidence)",
        extraction.chart.len(),
        extraction.source,
        extraction.confidence
    );
    if !extraction.chart.is_complete() {
        warn!("Chart incomplete, missing: {:?}", extraction.chart.missing());
    }

    let analysis = analyze_chart(&extraction.chart);
    info!(
        "{} defined channels, {} defined centers",
        analysis.defined_channels.len(),
        analysis.defined_centers.len()
    );

    let accuracy = match load_annotation(&annotation_path(path)) {
        Ok(Some(annotation)) => {
            let accuracy = annotation.score(&extraction.chart);
            info!(
                "Annotation accuracy: {:.1}% (red {}/{}, black {}/{})",
                accuracy.total_accuracy,
                accuracy.red_matches,
                accuracy.expected_red.len(),
                accuracy.black_matches,
                accuracy.expected_black.len()
            );
            Some(accuracy)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Ignoring annotation for {}: {:#}", path.display(), e);
            None
        }
    };

    let mut report = build_report(path, &extraction, &analysis, accuracy, commentator);
    if config.centers.enabled {
        report.center_check = Some(check_centers(&chart_image, &img, recognizer, config, &analysis)?);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::StaticCommentator;
    use crate::ocr::UnavailableRecognizer;
    use tempfile::tempdir;

    #[test]
    fn test_missing_image_is_an_error() {
        let dir = tempdir().unwrap();
        let result = process_image(
            &dir.path().join("missing.png"),
            &UnavailableRecognizer::new("none"),
            &AppConfig::default(),
            &StaticCommentator,
        );
        assert!(matches!(result, Err(ChartError::ImageLoad { .. })));
    }

    #[test]
    fn test_unreadable_chart_gives_empty_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.png");
        GrayImage::from_pixel(200, 300, image::Luma([255])).save(&path).unwrap();

        let report = process_image(
            &path,
            &UnavailableRecognizer::new("none"),
            &AppConfig::default(),
            &StaticCommentator,
        )
        .unwrap();
        assert!(!report.complete);
        assert_eq!(report.extraction.resolved_slots, 0);
        assert!(report.gates.is_empty());
        assert_eq!(report.centers.len(), 9);
        assert!(report.accuracy.is_none());

        // No center is filled and none is defined
        let check = report.center_check.unwrap();
        assert!(check.agrees());
        assert_eq!(check.readings.len(), 9);
    }

    #[test]
    fn test_center_scan_can_be_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.png");
        GrayImage::from_pixel(200, 300, image::Luma([255])).save(&path).unwrap();

        let mut config = AppConfig::default();
        config.centers.enabled = false;
        let report =
            process_image(&path, &UnavailableRecognizer::new("none"), &config, &StaticCommentator)
                .unwrap();
        assert!(report.center_check.is_none());
    }
}
