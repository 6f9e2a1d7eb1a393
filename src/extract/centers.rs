//! Bodygraph center scan.
//!
//! Reads the body graph itself instead of the planetary table: a center
//! drawn with a colored fill is defined, and the gate numbers printed
//! around it can be OCR'd. The result only cross-checks the table-derived
//! analysis; it never changes it.

use std::collections::BTreeSet;

use image::{GrayImage, RgbImage};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::ChartAnalysis;
use crate::config::{CenterScanConfig, PixelRect};
use crate::error::Result;
use crate::ocr::preprocess::{
    colored_fraction, crop_pixels, threshold_mid, threshold_otsu, threshold_otsu_inverted,
};
use crate::ocr::{OcrRequest, Recognizer};
use crate::reference::Center;

/// Center positions as fractions of the image width and height.
pub const CENTER_POSITIONS: [(Center, f32, f32); 9] = [
    (Center::Head, 0.5, 0.9),
    (Center::Ajna, 0.5, 0.8),
    (Center::Throat, 0.5, 0.7),
    (Center::G, 0.5, 0.55),
    (Center::Heart, 0.65, 0.55),
    (Center::SolarPlexus, 0.7, 0.4),
    (Center::Spleen, 0.3, 0.4),
    (Center::Sacral, 0.5, 0.35),
    (Center::Root, 0.5, 0.2),
];

/// A whole gate number, 1 through 64.
const GATE_PATTERN: &str = r"\b([1-9]|[1-5][0-9]|6[0-4])\b";

type Preprocess = fn(&GrayImage) -> GrayImage;

const GATE_VARIANTS: [(&str, Preprocess); 3] = [
    ("otsu", threshold_otsu),
    ("mid", threshold_mid),
    ("otsu_inverted", threshold_otsu_inverted),
];

/// Pixel position of a center on a `width` × `height` image.
pub fn center_point(center: Center, width: u32, height: u32) -> (u32, u32) {
    let (fx, fy) = CENTER_POSITIONS
        .iter()
        .find(|(c, _, _)| *c == center)
        .map_or((0.5, 0.5), |(_, fx, fy)| (*fx, *fy));
    ((fx * width as f32).round() as u32, (fy * height as f32).round() as u32)
}

/// Square of half-width `radius` around a point, clamped to the image.
fn square_around(point: (u32, u32), radius: u32, width: u32, height: u32) -> PixelRect {
    let x0 = point.0.saturating_sub(radius);
    let y0 = point.1.saturating_sub(radius);
    let x1 = point.0.saturating_add(radius).min(width);
    let y1 = point.1.saturating_add(radius).min(height);
    PixelRect {
        x: x0,
        y: y0,
        width: x1.saturating_sub(x0),
        height: y1.saturating_sub(y0),
    }
}

fn crop_rgb(img: &RgbImage, rect: &PixelRect) -> RgbImage {
    let (w, h) = img.dimensions();
    let x0 = rect.x.min(w);
    let y0 = rect.y.min(h);
    image::imageops::crop_imm(img, x0, y0, rect.width.min(w - x0), rect.height.min(h - y0)).to_image()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CenterReading {
    pub center: Center,
    /// Drawn with a colored fill
    pub colored: bool,
    /// Member gates read around the center; only read for colored centers
    pub gates: Vec<u8>,
}

pub struct CenterScanner<'a, R: Recognizer + ?Sized> {
    recognizer: &'a R,
    config: &'a CenterScanConfig,
    gate_number: Regex,
}

impl<'a, R: Recognizer + ?Sized> CenterScanner<'a, R> {
    pub fn new(recognizer: &'a R, config: &'a CenterScanConfig) -> Result<Self> {
        Ok(Self {
            recognizer,
            config,
            gate_number: Regex::new(GATE_PATTERN)?,
        })
    }

    pub fn is_colored(&self, img: &RgbImage, center: Center) -> bool {
        let (width, height) = img.dimensions();
        let point = center_point(center, width, height);
        let rect = square_around(point, self.config.color_radius_px, width, height);
        colored_fraction(&crop_rgb(img, &rect)) > self.config.colored_fraction
    }

    /// Gate numbers in `text` that fall in 1..=64.
    fn gate_numbers(&self, text: &str) -> BTreeSet<u8> {
        self.gate_number
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }

    /// OCRs the area around `center` under every threshold variant and keeps
    /// the numbers that belong to that center.
    pub fn read_gates(&self, gray: &GrayImage, center: Center) -> Vec<u8> {
        let (width, height) = gray.dimensions();
        let point = center_point(center, width, height);
        let rect = square_around(point, self.config.search_radius_px, width, height);
        if rect.is_empty() {
            return Vec::new();
        }
        let region = crop_pixels(gray, &rect);

        let mut seen = BTreeSet::new();
        for &(name, preprocess) in GATE_VARIANTS.iter() {
            match self.recognizer.recognize(&preprocess(&region), &OcrRequest::gate_digits()) {
                Ok(text) => {
                    debug!("{} gates ({}): {:?}", center, name, text.trim());
                    seen.extend(self.gate_numbers(&text));
                }
                Err(e) => warn!("Gate OCR failed for {} ({}): {}", center, name, e),
            }
        }

        center
            .gates()
            .iter()
            .copied()
            .filter(|gate| seen.contains(gate))
            .collect()
    }

    /// Scans all nine centers. Gates are read only around colored ones.
    pub fn scan(&self, img: &RgbImage, gray: &GrayImage) -> Vec<CenterReading> {
        Center::ALL
            .into_iter()
            .map(|center| {
                let colored = self.is_colored(img, center);
                let gates = if colored {
                    self.read_gates(gray, center)
                } else {
                    Vec::new()
                };
                CenterReading { center, colored, gates }
            })
            .collect()
    }
}

/// Scan readings compared with the channel-derived analysis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CenterCheck {
    pub readings: Vec<CenterReading>,
    /// Centers whose fill disagrees with their channel-derived definition
    pub center_mismatches: Vec<Center>,
    /// Gates read on the body graph that no planetary value activates
    pub unexplained_gates: Vec<u8>,
}

impl CenterCheck {
    pub fn agrees(&self) -> bool {
        self.center_mismatches.is_empty() && self.unexplained_gates.is_empty()
    }
}

pub fn cross_check(readings: Vec<CenterReading>, analysis: &ChartAnalysis) -> CenterCheck {
    let center_mismatches = readings
        .iter()
        .filter(|r| r.colored != analysis.is_center_defined(r.center))
        .map(|r| r.center)
        .collect();

    let unexplained_gates: BTreeSet<u8> = readings
        .iter()
        .flat_map(|r| r.gates.iter().copied())
        .filter(|gate| !analysis.activated.contains(gate))
        .collect();

    CenterCheck {
        readings,
        center_mismatches,
        unexplained_gates: unexplained_gates.into_iter().collect(),
    }
}
