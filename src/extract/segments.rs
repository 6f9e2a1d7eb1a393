//! Per-segment column reader.
//!
//! Reads the red and black planetary columns as 13 fixed-height rows each,
//! OCRing every row under several preprocessing variants and engine settings
//! and keeping whichever output looks most like a gate.line value.

use image::GrayImage;
use regex::Regex;
use tracing::{debug, warn};

use crate::calibration::SegmentCorrection;
use crate::config::{ColumnLayout, PixelRect};
use crate::error::Result;
use crate::model::{CandidatePair, Column, Planet};
use crate::ocr::preprocess::{close_gaps, crop_pixels, threshold_otsu};
use crate::ocr::{OcrRequest, PageLayout, Recognizer, DECIMAL_WHITELIST};

pub const ROW_COUNT: usize = Planet::ALL.len();

type Preprocess = fn(&GrayImage) -> GrayImage;

/// Preprocessing variants, tried in order.
const VARIANTS: [(&str, Preprocess); 3] = [
    ("otsu", threshold_otsu),
    ("otsu_close", otsu_close),
    ("gray", plain_gray),
];

fn otsu_close(img: &GrayImage) -> GrayImage {
    close_gaps(&threshold_otsu(img))
}

fn plain_gray(img: &GrayImage) -> GrayImage {
    img.clone()
}

/// Engine settings, tried in order for each variant.
const REQUESTS: [OcrRequest; 4] = [
    OcrRequest { whitelist: Some(DECIMAL_WHITELIST), layout: PageLayout::Block },
    OcrRequest { whitelist: Some(DECIMAL_WHITELIST), layout: PageLayout::SingleLine },
    OcrRequest { whitelist: None, layout: PageLayout::Block },
    OcrRequest { whitelist: None, layout: PageLayout::SingleLine },
];

impl ColumnLayout {
    /// The column box scaled from the reference canvas to `width` × `height`.
    pub fn scaled(&self, column: Column, width: u32, height: u32) -> PixelRect {
        let rect = match column {
            Column::Red => self.red,
            Column::Black => self.black,
        };
        let sx = |v: u32| scale(v, width, self.reference_width);
        let sy = |v: u32| scale(v, height, self.reference_height);

        PixelRect {
            x: sx(rect.x),
            y: sy(rect.y),
            width: sx(rect.width),
            height: sy(rect.height),
        }
    }
}

fn scale(value: u32, actual: u32, reference: u32) -> u32 {
    if reference == 0 {
        return value;
    }
    (value as u64 * actual as u64 / reference as u64) as u32
}

/// Row `index` of a column box: equal-height slices, integer division.
pub fn row_rect(column: &PixelRect, index: usize) -> PixelRect {
    let row_height = column.height / ROW_COUNT as u32;
    PixelRect {
        x: column.x,
        y: column.y + row_height * index as u32,
        width: column.width,
        height: row_height,
    }
}

pub struct SegmentReader<'a, R: Recognizer + ?Sized> {
    recognizer: &'a R,
    layout: &'a ColumnLayout,
    decimal: Regex,
    digits: Regex,
}

impl<'a, R: Recognizer + ?Sized> SegmentReader<'a, R> {
    pub fn new(recognizer: &'a R, layout: &'a ColumnLayout) -> Result<Self> {
        Ok(Self {
            recognizer,
            layout,
            decimal: Regex::new(r"\d+\.\d+")?,
            digits: Regex::new(r"\d+")?,
        })
    }

    /// `10 × decimals + digit runs`.
    fn score(&self, text: &str) -> usize {
        10 * self.decimal.find_iter(text).count() + self.digits.find_iter(text).count()
    }

    /// First decimal, else first digit run with `.0` appended, else nothing.
    fn value_from(&self, text: &str) -> Option<String> {
        if let Some(m) = self.decimal.find(text) {
            return Some(m.as_str().to_string());
        }
        self.digits.find(text).map(|m| format!("{}.0", m.as_str()))
    }

    /// OCRs one row under every variant and returns the best-scoring text.
    fn best_text(&self, row: &GrayImage) -> Option<String> {
        let mut best: Option<(usize, String, &str)> = None;

        for &(name, preprocess) in VARIANTS.iter() {
            let processed = preprocess(row);
            for request in REQUESTS.iter() {
                let text = match self.recognizer.recognize(&processed, request) {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("Segment OCR failed ({}, psm {}): {}", name, request.layout.psm(), e);
                        continue;
                    }
                };
                let score = self.score(&text);
                if score > best.as_ref().map_or(0, |(s, _, _)| *s) {
                    best = Some((score, text, name));
                }
            }
        }

        best.map(|(score, text, name)| {
            debug!("Winning variant {} (score {}): {:?}", name, score, text.trim());
            text
        })
    }

    /// Reads the 13 rows of one column. Empty rows are None.
    pub fn read_column(&self, img: &GrayImage, column: Column) -> Vec<Option<String>> {
        let (width, height) = img.dimensions();
        let column_rect = self.layout.scaled(column, width, height);

        (0..ROW_COUNT)
            .map(|i| {
                let row = crop_pixels(img, &row_rect(&column_rect, i));
                if row.width() == 0 || row.height() == 0 {
                    return None;
                }
                self.best_text(&row).and_then(|text| self.value_from(&text))
            })
            .collect()
    }

    /// Reads both columns and pairs rows positionally into 13 slots.
    ///
    /// `corrections` overwrite individual row values before pairing. A slot
    /// is None unless both of its rows produced a value.
    pub fn read_slots<'c>(
        &self,
        img: &GrayImage,
        corrections: impl IntoIterator<Item = &'c SegmentCorrection>,
    ) -> (Vec<Option<CandidatePair>>, usize) {
        let mut red = self.read_column(img, Column::Red);
        let mut black = self.read_column(img, Column::Black);

        let mut applied = 0;
        for correction in corrections {
            let rows = match correction.column {
                Column::Red => &mut red,
                Column::Black => &mut black,
            };
            let Some(slot) = rows.get_mut(correction.row) else {
                warn!("Segment correction row {} out of range", correction.row);
                continue;
            };
            debug!(
                "Calibration: {:?} row {} {:?} -> {}",
                correction.column, correction.row, slot, correction.value
            );
            *slot = Some(correction.value.to_string());
            applied += 1;
        }

        let slots = red
            .into_iter()
            .zip(black)
            .map(|(r, b)| match (r, b) {
                (Some(r), Some(b)) => Some(CandidatePair::new(r, b)),
                _ => None,
            })
            .collect();

        (slots, applied)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ChartError;
    use image::Luma;
    use std::collections::HashMap;

    /// Answers by the gray level of a uniform image. Binarised images (only
    /// 0 and 255 present) read as nothing, so only the plain variant scores.
    pub(crate) struct GrayLevelRecognizer {
        pub texts: HashMap<u8, String>,
    }

    impl Recognizer for GrayLevelRecognizer {
        fn recognize(&self, img: &GrayImage, _request: &OcrRequest) -> Result<String> {
            let Some(first) = img.pixels().next() else {
                return Err(ChartError::OcrFailed("empty image".to_string()));
            };
            if img.pixels().all(|p| p[0] == 0 || p[0] == 255) {
                return Ok(String::new());
            }
            Ok(self.texts.get(&first[0]).cloned().unwrap_or_default())
        }
    }

    /// Paints each row of both columns with its own gray level and returns
    /// the image plus the recognizer that reads those levels back as `values`.
    pub(crate) fn synthetic_chart(
        width: u32,
        height: u32,
        layout: &ColumnLayout,
        values: &[(&str, &str)],
    ) -> (GrayImage, GrayLevelRecognizer) {
        let mut img = GrayImage::from_pixel(width, height, Luma([255]));
        let mut texts = HashMap::new();

        for (column_index, column) in [Column::Red, Column::Black].into_iter().enumerate() {
            let column_rect = layout.scaled(column, width, height);
            for (row, pair) in values.iter().enumerate() {
                let level = 10 + (column_index * ROW_COUNT + row) as u8 * 8;
                let text = if column == Column::Red { pair.0 } else { pair.1 };
                texts.insert(level, format!("{}\n", text));

                let rect = row_rect(&column_rect, row);
                for y in rect.y..rect.y + rect.height {
                    for x in rect.x..rect.x + rect.width {
                        img.put_pixel(x, y, Luma([level]));
                    }
                }
            }
        }

        (img, GrayLevelRecognizer { texts })
    }

    struct FixedRecognizer(Vec<&'static str>);

    impl Recognizer for FixedRecognizer {
        fn recognize(&self, _img: &GrayImage, request: &OcrRequest) -> Result<String> {
            // Different answer per engine setting, same for every variant
            let index = REQUESTS.iter().position(|r| r == request).unwrap_or(0);
            Ok(self.0[index].to_string())
        }
    }

    #[test]
    fn test_layout_scales_to_image() {
        let layout = ColumnLayout::default();
        let same = layout.scaled(Column::Red, 1668, 2388);
        assert_eq!(same, layout.red);

        let half = layout.scaled(Column::Black, 834, 1194);
        assert_eq!(half, PixelRect { x: 655, y: 38, width: 53, height: 435 });
    }

    #[test]
    fn test_row_rect_uses_integer_division() {
        let column = PixelRect { x: 10, y: 76, width: 107, height: 870 };
        let row = row_rect(&column, 2);
        assert_eq!(row.height, 66);
        assert_eq!(row.y, 76 + 132);
    }

    #[test]
    fn test_highest_score_wins() {
        let layout = ColumnLayout::default();
        let recognizer = FixedRecognizer(vec!["4", "42.5", "42 5", "x"]);
        let reader = SegmentReader::new(&recognizer, &layout).unwrap();

        assert_eq!(reader.score("42.5"), 12);
        assert_eq!(reader.score("42 5"), 2);
        let row = GrayImage::from_pixel(20, 10, Luma([128]));
        assert_eq!(reader.best_text(&row).as_deref(), Some("42.5"));
    }

    #[test]
    fn test_value_fallbacks() {
        let layout = ColumnLayout::default();
        let recognizer = FixedRecognizer(vec![""; 4]);
        let reader = SegmentReader::new(&recognizer, &layout).unwrap();

        assert_eq!(reader.value_from("x 7.2 9.1").as_deref(), Some("7.2"));
        assert_eq!(reader.value_from("44").as_deref(), Some("44.0"));
        assert_eq!(reader.value_from("---"), None);
        // Nothing scores, so nothing is read
        let row = GrayImage::from_pixel(20, 10, Luma([128]));
        assert_eq!(reader.best_text(&row), None);
    }

    #[test]
    fn test_read_slots_from_synthetic_columns() {
        let layout = ColumnLayout::default();
        let values = [("42.5", "62.3"), ("32.3", "61.3"), ("48.6", "1.3")];
        let (img, recognizer) = synthetic_chart(417, 597, &layout, &values);
        let reader = SegmentReader::new(&recognizer, &layout).unwrap();

        let (slots, applied) = reader.read_slots(&img, []);
        assert_eq!(applied, 0);
        assert_eq!(slots.len(), ROW_COUNT);
        assert_eq!(slots[0], Some(CandidatePair::new("42.5", "62.3")));
        assert_eq!(slots[2], Some(CandidatePair::new("48.6", "1.3")));
        assert!(slots[3..].iter().all(|s| s.is_none()));
    }

    #[test]
    fn test_corrections_overwrite_rows() {
        let layout = ColumnLayout::default();
        let values = [("42.5", "62.3"), ("32.3", "61.3")];
        let (img, recognizer) = synthetic_chart(417, 597, &layout, &values);
        let reader = SegmentReader::new(&recognizer, &layout).unwrap();

        let corrections = [
            SegmentCorrection { image: "IMG_TEST.PNG", column: Column::Black, row: 1, value: "7.1" },
            SegmentCorrection { image: "IMG_TEST.PNG", column: Column::Red, row: 40, value: "1.1" },
        ];
        let (slots, applied) = reader.read_slots(&img, corrections.iter());
        assert_eq!(applied, 1);
        assert_eq!(slots[1], Some(CandidatePair::new("32.3", "7.1")));
    }
}
