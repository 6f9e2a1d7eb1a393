use std::collections::HashMap;
use std::path::Path;

use bodygraph_ocr::batch::{run_batch, BatchOptions};
use bodygraph_ocr::commentary::StaticCommentator;
use bodygraph_ocr::config::AppConfig;
use bodygraph_ocr::extract::segments::{row_rect, ROW_COUNT};
use bodygraph_ocr::extract::{Confidence, ExtractionSource};
use bodygraph_ocr::model::Column;
use bodygraph_ocr::ocr::{OcrRequest, Recognizer};
use bodygraph_ocr::pipeline::process_image;
use bodygraph_ocr::Result;
use image::{GrayImage, Luma};
use tempfile::tempdir;

const REFERENCE: [(&str, &str); 13] = [
    ("42.5", "62.3"),
    ("32.3", "61.3"),
    ("48.6", "1.3"),
    ("49.4", "38.4"),
    ("16.2", "58.3"),
    ("20.6", "1.2"),
    ("9.2", "44.3"),
    ("34.6", "5.2"),
    ("27.5", "9.5"),
    ("7.2", "10.4"),
    ("17.6", "10.2"),
    ("56.6", "50.5"),
    ("14.4", "50.4"),
];

/// Stands in for the OCR engine: each table cell is painted with its own
/// gray level and read back through this lookup. Binarised input reads empty.
struct ScriptedRecognizer {
    texts: HashMap<u8, String>,
}

impl Recognizer for ScriptedRecognizer {
    fn recognize(&self, img: &GrayImage, _request: &OcrRequest) -> Result<String> {
        let Some(first) = img.pixels().next() else {
            return Ok(String::new());
        };
        if img.pixels().any(|p| p[0] != first[0]) || first[0] == 0 || first[0] == 255 {
            return Ok(String::new());
        }
        Ok(self.texts.get(&first[0]).cloned().unwrap_or_default())
    }
}

fn write_chart(path: &Path, config: &AppConfig) -> ScriptedRecognizer {
    let (width, height) = (834, 1194);
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    let mut texts = HashMap::new();

    for (column_index, column) in [Column::Red, Column::Black].into_iter().enumerate() {
        let column_rect = config.columns.scaled(column, width, height);
        for (row, (red, black)) in REFERENCE.iter().enumerate() {
            let level = (20 + (column_index * ROW_COUNT + row) * 7) as u8;
            let text = if column == Column::Red { red } else { black };
            texts.insert(level, format!("{}\n", text));

            let rect = row_rect(&column_rect, row);
            for y in rect.y..rect.y + rect.height {
                for x in rect.x..rect.x + rect.width {
                    img.put_pixel(x, y, Luma([level]));
                }
            }
        }
    }

    img.save(path).unwrap();
    ScriptedRecognizer { texts }
}

fn annotation() -> String {
    let planets = [
        "Sun", "Earth", "Moon", "North Node", "South Node", "Mercury", "Venus", "Mars", "Jupiter",
        "Saturn", "Uranus", "Neptune", "Pluto",
    ];
    planets
        .iter()
        .zip(REFERENCE.iter())
        .map(|(planet, (red, black))| format!("{} - {} (red) | {} (black)\n", planet, red, black))
        .collect()
}

#[test]
fn reference_chart_end_to_end() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("chart.png");
    let config = AppConfig::default();
    let recognizer = write_chart(&image, &config);
    std::fs::write(dir.path().join("chart.txt"), annotation()).unwrap();

    let report = process_image(&image, &recognizer, &config, &StaticCommentator).unwrap();

    assert!(report.complete);
    assert_eq!(report.extraction.source, ExtractionSource::Segments);
    assert_eq!(report.extraction.confidence, Confidence::High);
    assert!(report.extraction.rejected.is_empty());

    for (entry, (red, black)) in report.planets.iter().zip(REFERENCE.iter()) {
        assert_eq!(entry.design.unwrap().to_string(), *red, "{}", entry.planet);
        assert_eq!(entry.personality.unwrap().to_string(), *black, "{}", entry.planet);
    }

    let channels: Vec<&str> = report.defined_channels().map(|c| c.id.as_str()).collect();
    assert_eq!(channels, vec!["10-20", "10-34", "16-48", "17-62", "20-34", "27-50"]);

    let centers: Vec<&str> = report.defined_centers().map(|c| c.name).collect();
    assert_eq!(centers.len(), 5);
    for name in ["Ajna", "Throat", "G", "Spleen", "Sacral"] {
        assert!(centers.contains(&name), "{} should be defined", name);
    }

    assert_eq!(report.activation_summary.both, vec![9]);
    assert_eq!(
        report.activation_summary.conscious_only,
        vec![1, 5, 10, 38, 44, 50, 58, 61, 62]
    );
    assert_eq!(
        report.activation_summary.unconscious_only,
        vec![7, 14, 16, 17, 20, 27, 32, 34, 42, 48, 49, 56]
    );

    // The synthetic chart draws no colored center fills
    let check = report.center_check.as_ref().unwrap();
    assert_eq!(check.readings.len(), 9);
    assert_eq!(check.center_mismatches.len(), 5);
    assert!(check.unexplained_gates.is_empty());

    let accuracy = report.accuracy.as_ref().unwrap();
    assert!(accuracy.is_perfect());
    assert_eq!(accuracy.red_matches, 13);
}

#[test]
fn batch_writes_reports_and_summary() {
    let dir = tempdir().unwrap();
    let charts = dir.path().join("charts");
    std::fs::create_dir_all(&charts).unwrap();
    let config = AppConfig::default();
    let recognizer = write_chart(&charts.join("chart.png"), &config);

    let options = BatchOptions {
        out_dir: dir.path().join("results"),
        summary_csv: Some(dir.path().join("results").join("summary.csv")),
        write_text: true,
    };
    let images = bodygraph_ocr::paths::expand_inputs(&[charts]).unwrap();
    let summary = run_batch(&images, &recognizer, &config, &StaticCommentator, &options);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.complete, 1);

    let json = std::fs::read_to_string(options.out_dir.join("chart_report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["complete"], true);
    assert_eq!(value["planets"][3]["planet"], "North Node");
    assert_eq!(value["planets"][3]["personality"], "38.4");

    let text = std::fs::read_to_string(options.out_dir.join("chart_report.txt")).unwrap();
    assert!(text.contains("DEFINED CHANNELS"));

    let csv = std::fs::read_to_string(options.summary_csv.unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",14.4,50.4"));
}
