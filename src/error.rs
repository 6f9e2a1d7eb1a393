use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR timed out after {0:?}")]
    OcrTimeout(Duration),

    #[error("OCR engine failed: {0}")]
    OcrFailed(String),

    #[error("Invalid gate.line value '{0}'")]
    InvalidGateLine(String),

    #[error("Commentary request failed: {0}")]
    Commentary(#[from] reqwest::Error),

    #[error("Commentary response malformed: {0}")]
    CommentaryResponse(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
