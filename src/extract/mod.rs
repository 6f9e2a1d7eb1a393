//! Planetary value extraction.
//!
//! Two readers feed the same chart model:
//! - `segments`: fixed 13-row column geometry, one OCR pass per row and
//!   variant. Runs first.
//! - block path: the planetary box is OCR'd in one go, tokenised, paired and
//!   realigned by the `resolver`. Used when the segment read is incomplete.
//!
//! `centers` scans the body graph itself and only cross-checks the result.

pub mod centers;
pub mod region;
pub mod resolver;
pub mod segments;
pub mod tokens;

pub use centers::{cross_check, CenterCheck, CenterScanner, CenterReading};
pub use resolver::{AlignmentResolver, Confidence, Resolution, Strategy};
pub use segments::SegmentReader;

use image::GrayImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calibration::segment_corrections_for;
use crate::config::AppConfig;
use crate::error::Result;
use crate::model::{CandidatePair, PlanetaryChart};
use crate::ocr::preprocess::{crop_pixels, threshold_otsu};
use crate::ocr::{OcrRequest, Recognizer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Segments,
    Block,
    /// Neither reader resolved a single slot
    None,
}

/// A resolved (possibly partial) chart with how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub chart: PlanetaryChart,
    pub source: ExtractionSource,
    /// Resolver strategy for the block path
    pub strategy: Option<Strategy>,
    pub confidence: Confidence,
    /// Raw values that failed gate/line validation
    pub rejected: Vec<String>,
}

impl Extraction {
    fn empty() -> Self {
        Self {
            chart: PlanetaryChart::default(),
            source: ExtractionSource::None,
            strategy: None,
            confidence: Confidence::Low,
            rejected: Vec::new(),
        }
    }
}

pub struct Extractor<'a, R: Recognizer + ?Sized> {
    recognizer: &'a R,
    config: &'a AppConfig,
}

impl<'a, R: Recognizer + ?Sized> Extractor<'a, R> {
    pub fn new(recognizer: &'a R, config: &'a AppConfig) -> Self {
        Self { recognizer, config }
    }

    /// Extracts the planetary chart from a grayscale image.
    ///
    /// `image_name` is the file name used to look up calibration corrections.
    pub fn extract(&self, img: &GrayImage, image_name: &str) -> Result<Extraction> {
        let segments = self.extract_segments(img, image_name)?;
        if segments.chart.is_complete() {
            info!("Segment reader resolved all {} slots", segments.chart.len());
            return Ok(segments);
        }

        info!(
            "Segment reader resolved {} slots, trying block path",
            segments.chart.len()
        );
        let block = self.extract_block(img)?;

        let chosen = if block.chart.len() > segments.chart.len() {
            block
        } else {
            segments
        };

        if chosen.chart.is_empty() {
            warn!("No planetary values could be read");
            return Ok(Extraction {
                rejected: chosen.rejected,
                ..Extraction::empty()
            });
        }

        Ok(chosen)
    }

    fn extract_segments(&self, img: &GrayImage, image_name: &str) -> Result<Extraction> {
        let reader = SegmentReader::new(self.recognizer, &self.config.columns)?;
        let corrections = self
            .config
            .calibration
            .enabled
            .then(|| segment_corrections_for(image_name))
            .into_iter()
            .flatten();

        let (slots, corrected) = reader.read_slots(img, corrections);
        let (chart, rejected) = PlanetaryChart::from_slots(&slots);
        if !rejected.is_empty() {
            warn!("Segment reader rejected out-of-range values: {:?}", rejected);
        }

        let confidence = match (chart.is_complete(), corrected > 0) {
            (true, false) => Confidence::High,
            (true, true) => Confidence::Calibrated,
            (false, _) => Confidence::Partial,
        };

        Ok(Extraction {
            chart,
            source: ExtractionSource::Segments,
            strategy: None,
            confidence,
            rejected,
        })
    }

    /// OCRs every candidate box and keeps the token list of the one that
    /// produced the most tokens (earlier candidates win ties).
    fn read_block_tokens(&self, img: &GrayImage) -> Result<Vec<String>> {
        let (width, height) = img.dimensions();
        let rects = region::candidate_rects(&self.config.planetary_region, width, height);
        if rects.is_empty() {
            warn!("Planetary box is degenerate for {}x{} image", width, height);
        }

        let mut best: Vec<String> = Vec::new();
        for rect in rects {
            let binary = threshold_otsu(&crop_pixels(img, &rect));
            let text = match self.recognizer.recognize(&binary, &OcrRequest::block_decimal()) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Block OCR failed for {:?}: {}", rect, e);
                    String::new()
                }
            };
            debug!("Block OCR text: {:?}", text);

            let found = tokens::extract_tokens(&text)?;
            debug!("Tokens from {:?}: {:?}", rect, found);
            if found.len() > best.len() {
                best = found;
            }
        }

        Ok(best)
    }

    fn extract_block(&self, img: &GrayImage) -> Result<Extraction> {
        let found = self.read_block_tokens(img)?;
        let pairs: Vec<CandidatePair> = tokens::pair_tokens(&found);

        let resolution = AlignmentResolver::new(self.config.calibration.enabled).resolve(&pairs);
        let (chart, rejected) = PlanetaryChart::from_slots(&resolution.slots);
        if !rejected.is_empty() {
            warn!("Block path rejected out-of-range values: {:?}", rejected);
        }
        info!(
            "Block path: {} pairs, strategy {:?}, {} slots resolved",
            pairs.len(),
            resolution.strategy,
            chart.len()
        );

        // An incomplete chart is never reported above partial
        let confidence = if chart.is_complete() {
            resolution.confidence
        } else {
            resolution.confidence.min(Confidence::Partial)
        };

        Ok(Extraction {
            chart,
            source: ExtractionSource::Block,
            strategy: Some(resolution.strategy),
            confidence,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::model::Planet;
    use crate::ocr::UnavailableRecognizer;
    use super::segments::tests::synthetic_chart;

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

    /// Reads nothing from row images and `block` from the planetary box.
    struct BlockOnly {
        block: String,
    }

    impl Recognizer for BlockOnly {
        fn recognize(&self, img: &GrayImage, request: &OcrRequest) -> Result<String> {
            // Rows are far shorter than the planetary box
            if img.height() < 100 || *request != OcrRequest::block_decimal() {
                return Err(ChartError::OcrFailed("row".to_string()));
            }
            Ok(self.block.clone())
        }
    }

    fn block_text(values: &[(&str, &str)]) -> String {
        values
            .iter()
            .map(|(r, b)| format!("{} {}", r, b))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_segments_complete_skips_block_path() {
        let config = AppConfig::default();
        let (img, recognizer) = synthetic_chart(417, 597, &config.columns, &REFERENCE);

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.source, ExtractionSource::Segments);
        assert_eq!(extraction.confidence, Confidence::High);
        assert!(extraction.chart.is_complete());
        assert_eq!(
            extraction.chart.get(Planet::Pluto).unwrap().personality.to_string(),
            "50.4"
        );
    }

    #[test]
    fn test_segment_corrections_follow_calibration_toggle() {
        let mut config = AppConfig::default();
        let (img, recognizer) = synthetic_chart(417, 597, &config.columns, &REFERENCE);

        let calibrated = Extractor::new(&recognizer, &config)
            .extract(&img, "IMG_1989.PNG")
            .unwrap();
        assert_eq!(calibrated.confidence, Confidence::Calibrated);
        assert_eq!(
            calibrated.chart.get(Planet::Mercury).unwrap().personality.to_string(),
            "7.1"
        );

        config.calibration.enabled = false;
        let plain = Extractor::new(&recognizer, &config)
            .extract(&img, "IMG_1989.PNG")
            .unwrap();
        assert_eq!(plain.confidence, Confidence::High);
        assert_eq!(
            plain.chart.get(Planet::Mercury).unwrap().personality.to_string(),
            "1.2"
        );
    }

    #[test]
    fn test_block_path_used_when_segments_fail() {
        let config = AppConfig::default();
        let recognizer = BlockOnly {
            block: block_text(&REFERENCE),
        };
        let img = GrayImage::from_pixel(417, 597, image::Luma([200]));

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.source, ExtractionSource::Block);
        assert_eq!(extraction.strategy, Some(Strategy::Plausible));
        assert_eq!(extraction.confidence, Confidence::High);
        assert!(extraction.chart.is_complete());
    }

    #[test]
    fn test_partial_segments_beat_worse_block_read() {
        let config = AppConfig::default();
        let (img, recognizer) = synthetic_chart(417, 597, &config.columns, &REFERENCE[..4]);

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.source, ExtractionSource::Segments);
        assert_eq!(extraction.confidence, Confidence::Partial);
        assert_eq!(extraction.chart.len(), 4);
        assert_eq!(extraction.chart.missing()[0], Planet::SouthNode);
    }

    #[test]
    fn test_block_path_surfaces_rejected_values() {
        let config = AppConfig::default();
        let mut values = REFERENCE.to_vec();
        values[1] = ("32.3", "99.9");
        let recognizer = BlockOnly {
            block: block_text(&values),
        };
        let img = GrayImage::from_pixel(417, 597, image::Luma([200]));

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.chart.len(), 12);
        assert!(extraction.chart.get(Planet::Earth).is_none());
        assert_eq!(extraction.rejected, vec!["99.9".to_string()]);
        assert!(extraction.confidence <= Confidence::Partial);
    }

    #[test]
    fn test_block_path_leaves_unmatched_planet_empty() {
        let config = AppConfig::default();
        let mut values = REFERENCE[..5].to_vec();
        values.extend([("27.5", "7.2"), ("17.6", "56.6"), ("38.4", "58.3")]);
        let recognizer = BlockOnly {
            block: block_text(&values),
        };
        let img = GrayImage::from_pixel(417, 597, image::Luma([200]));

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.strategy, Some(Strategy::ExpectedPattern));
        assert_eq!(extraction.chart.len(), 8);
        assert!(extraction.chart.get(Planet::Mars).is_none());
        let jupiter = extraction.chart.get(Planet::Jupiter).unwrap();
        assert_eq!(jupiter.design.to_string(), "38.4");
        assert_eq!(jupiter.personality.to_string(), "58.3");
    }

    #[test]
    fn test_unavailable_engine_gives_empty_extraction() {
        let config = AppConfig::default();
        let recognizer = UnavailableRecognizer::new("not installed");
        let img = GrayImage::from_pixel(417, 597, image::Luma([200]));

        let extraction = Extractor::new(&recognizer, &config)
            .extract(&img, "chart.png")
            .unwrap();
        assert_eq!(extraction.source, ExtractionSource::None);
        assert_eq!(extraction.confidence, Confidence::Low);
        assert!(extraction.chart.is_empty());
    }

    #[test]
    fn test_region_search_prefers_most_tokens() {
        let mut config = AppConfig::default();
        config.planetary_region.region_search = true;
        let recognizer = BlockOnly {
            block: block_text(&REFERENCE),
        };
        let img = GrayImage::from_pixel(417, 597, image::Luma([200]));
        let extractor = Extractor::new(&recognizer, &config);

        assert_eq!(extractor.read_block_tokens(&img).unwrap().len(), 26);
    }
}
