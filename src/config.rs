//! Configuration types.
//!
//! Loaded from config.json at startup. Provides the planetary box and column
//! geometry, OCR engine settings and commentary client settings. Every field
//! has a default so a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A rectangle in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The planetary number box, relative to the image size with small pixel
/// margins: left = left_fraction * W, right = W - right_margin_px,
/// top = top_px, bottom = bottom_fraction * H.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetaryRegion {
    pub left_fraction: f32,
    pub right_margin_px: u32,
    pub top_px: u32,
    pub bottom_fraction: f32,
    /// Try the prototype candidate boxes instead of this single box
    pub region_search: bool,
}

impl Default for PlanetaryRegion {
    fn default() -> Self {
        Self {
            left_fraction: 0.65,
            right_margin_px: 10,
            top_px: 10,
            bottom_fraction: 0.45,
            region_search: false,
        }
    }
}

/// Fixed geometry of the red and black planetary columns, measured on a
/// reference canvas and scaled to each image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub reference_width: u32,
    pub reference_height: u32,
    pub red: PixelRect,
    pub black: PixelRect,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            reference_width: 1668,
            reference_height: 2388,
            red: PixelRect { x: 1156, y: 76, width: 107, height: 870 },
            black: PixelRect { x: 1311, y: 76, width: 107, height: 870 },
        }
    }
}

/// Bodygraph center scan: color check and gate-number OCR around each
/// center, used to cross-check the table-derived analysis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterScanConfig {
    pub enabled: bool,
    /// Half-width of the square sampled for the fill color
    pub color_radius_px: u32,
    /// Half-width of the square OCR'd for gate numbers
    pub search_radius_px: u32,
    /// Share of colored pixels above which a center counts as filled
    pub colored_fraction: f32,
}

impl Default for CenterScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color_radius_px: 30,
            search_radius_px: 80,
            colored_fraction: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit tesseract executable; discovered when absent
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory; discovered when absent
    pub tessdata_dir: Option<PathBuf>,
    pub language: String,
    /// Upper bound on a single tesseract invocation
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            tessdata_dir: None,
            language: "eng".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_tokens: 1200,
            temperature: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Enables the per-image exception tables in `calibration`
    pub enabled: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub planetary_region: PlanetaryRegion,
    pub columns: ColumnLayout,
    pub centers: CenterScanConfig,
    pub ocr: OcrConfig,
    pub commentary: CommentaryConfig,
    pub calibration: CalibrationConfig,
}

impl AppConfig {
    /// Loads configuration from `path`, or returns defaults if the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        info!("Looking for config at: {}", path.display());

        if !path.exists() {
            info!("{} not found. Using default config.", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }
}
