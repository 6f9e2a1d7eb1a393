pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::TesseractRecognizer;
pub use setup::{locate_tesseract, TesseractPaths};

use image::GrayImage;

use crate::error::{ChartError, Result};

/// Characters permitted when reading gate.line values.
pub const DECIMAL_WHITELIST: &str = "0123456789.";

/// Characters permitted when reading bare gate numbers on the bodygraph.
pub const DIGIT_WHITELIST: &str = "0123456789";

/// Tesseract page segmentation modes used by the readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLayout {
    /// A single uniform block of text (psm 6)
    Block,
    /// A single text line (psm 7)
    SingleLine,
    /// A single word (psm 8)
    SingleWord,
}

impl PageLayout {
    pub fn psm(&self) -> u8 {
        match self {
            PageLayout::Block => 6,
            PageLayout::SingleLine => 7,
            PageLayout::SingleWord => 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OcrRequest {
    pub whitelist: Option<&'static str>,
    pub layout: PageLayout,
}

impl OcrRequest {
    /// Whole planetary box: block layout, digits and periods only.
    pub fn block_decimal() -> Self {
        Self {
            whitelist: Some(DECIMAL_WHITELIST),
            layout: PageLayout::Block,
        }
    }

    /// Gate numbers printed around a center: single word, digits only.
    pub fn gate_digits() -> Self {
        Self {
            whitelist: Some(DIGIT_WHITELIST),
            layout: PageLayout::SingleWord,
        }
    }
}

/// The OCR collaborator: image region in, raw text out.
pub trait Recognizer {
    fn recognize(&self, img: &GrayImage, request: &OcrRequest) -> Result<String>;
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn recognize(&self, img: &GrayImage, request: &OcrRequest) -> Result<String> {
        (**self).recognize(img, request)
    }
}

/// Stands in when no OCR engine could be located; every call fails so each
/// region degrades to an empty extraction.
#[derive(Debug, Clone)]
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl Recognizer for UnavailableRecognizer {
    fn recognize(&self, _img: &GrayImage, _request: &OcrRequest) -> Result<String> {
        Err(ChartError::OcrUnavailable(self.reason.clone()))
    }
}
