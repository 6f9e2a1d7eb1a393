//! Bodygraph OCR
//!
//! Reads the planetary gate.line table off a Human Design chart screenshot,
//! resolves it into 13 design/personality activations, derives the defined
//! channels and centers, and writes a report.

pub mod analysis;
pub mod batch;
pub mod calibration;
pub mod commentary;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod ocr;
pub mod paths;
pub mod pipeline;
pub mod reference;
pub mod report;

pub use error::{ChartError, Result};
