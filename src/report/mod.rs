//! Chart report assembly and output.
//!
//! `build_report` turns an extraction plus its analysis into the artifact the
//! renderers consume: JSON (`export`), plain text (`text`) and the batch
//! summary CSV (`csv_writer`).

pub mod csv_writer;
pub mod export;
pub mod text;

pub use csv_writer::{append_to_csv, init_csv};
pub use export::export_to_json;
pub use text::{render_text, write_text};

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::analysis::{gates_with, ChartAnalysis};
use crate::calibration::Accuracy;
use crate::commentary::{commentary_for, Commentator, Subject};
use crate::extract::{CenterCheck, Confidence, Extraction, ExtractionSource, Strategy};
use crate::model::{Activation, GateLine, Planet};
use crate::reference::{center_of, gate, Center, CHANNELS};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize)]
pub struct ChartReport {
    pub image: PathBuf,
    pub generated_at: String,
    /// All 13 planetary slots resolved
    pub complete: bool,
    pub extraction: ExtractionInfo,
    pub planets: Vec<PlanetEntry>,
    pub activation_summary: ActivationSummary,
    pub gates: Vec<GateEntry>,
    pub channels: Vec<ChannelEntry>,
    pub centers: Vec<CenterEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<Accuracy>,
    /// Body graph scan compared with the table-derived centers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_check: Option<CenterCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionInfo {
    pub source: ExtractionSource,
    pub strategy: Option<Strategy>,
    pub confidence: Confidence,
    pub resolved_slots: usize,
    pub missing: Vec<Planet>,
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanetEntry {
    pub planet: Planet,
    pub design: Option<GateLine>,
    pub personality: Option<GateLine>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationSummary {
    pub conscious_only: Vec<u8>,
    pub unconscious_only: Vec<u8>,
    pub both: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateEntry {
    pub number: u8,
    pub name: &'static str,
    pub center: &'static str,
    pub activation: Activation,
    pub description: &'static str,
    pub commentary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelEntry {
    pub id: String,
    pub name: &'static str,
    pub gates: [u8; 2],
    pub centers: [&'static str; 2],
    pub defined: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    /// Lower of the two centers' hierarchy ranks
    #[serde(skip)]
    pub rank: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CenterEntry {
    pub name: &'static str,
    pub defined: bool,
    pub description: &'static str,
    pub commentary: String,
}

impl ChartReport {
    pub fn defined_channels(&self) -> impl Iterator<Item = &ChannelEntry> {
        self.channels.iter().filter(|c| c.defined)
    }

    pub fn defined_centers(&self) -> impl Iterator<Item = &CenterEntry> {
        self.centers.iter().filter(|c| c.defined)
    }
}

/// Assembles the report. Commentary is fetched per gate, per defined channel
/// and per center; each failed call falls back to the built-in text.
pub fn build_report(
    image: &Path,
    extraction: &Extraction,
    analysis: &ChartAnalysis,
    accuracy: Option<Accuracy>,
    commentator: &dyn Commentator,
) -> ChartReport {
    let chart = &extraction.chart;

    let planets = Planet::ALL
        .into_iter()
        .map(|planet| {
            let reading = chart.get(planet);
            PlanetEntry {
                planet,
                design: reading.map(|r| r.design),
                personality: reading.map(|r| r.personality),
            }
        })
        .collect();

    let activation_summary = ActivationSummary {
        conscious_only: gates_with(&analysis.activations, Activation::ConsciousOnly),
        unconscious_only: gates_with(&analysis.activations, Activation::UnconsciousOnly),
        both: gates_with(&analysis.activations, Activation::Both),
    };

    let gates = analysis
        .activations
        .iter()
        .filter_map(|(&number, &activation)| {
            let gate = gate(number)?;
            let center = center_of(number)?;
            let subject = Subject::Gate { gate, center, activation };
            Some(GateEntry {
                number,
                name: gate.name,
                center: center.name(),
                activation,
                description: gate.description,
                commentary: commentary_for(commentator, &subject),
            })
        })
        .collect();

    let channels = CHANNELS
        .iter()
        .map(|channel| {
            let defined = analysis.is_channel_defined(channel);
            ChannelEntry {
                id: channel.id(),
                name: channel.name,
                gates: channel.gates,
                centers: [channel.centers[0].name(), channel.centers[1].name()],
                defined,
                description: channel.description,
                commentary: defined
                    .then(|| commentary_for(commentator, &Subject::Channel(channel))),
                rank: channel
                    .centers
                    .iter()
                    .map(Center::hierarchy_rank)
                    .min()
                    .unwrap_or(u8::MAX),
            }
        })
        .collect();

    let centers = Center::ALL
        .into_iter()
        .map(|center| {
            let defined = analysis.is_center_defined(center);
            CenterEntry {
                name: center.name(),
                defined,
                description: center.description(defined),
                commentary: commentary_for(commentator, &Subject::Center { center, defined }),
            }
        })
        .collect();

    ChartReport {
        image: image.to_path_buf(),
        generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        complete: chart.is_complete(),
        extraction: ExtractionInfo {
            source: extraction.source,
            strategy: extraction.strategy,
            confidence: extraction.confidence,
            resolved_slots: chart.len(),
            missing: chart.missing(),
            rejected: extraction.rejected.clone(),
        },
        planets,
        activation_summary,
        gates,
        channels,
        centers,
        accuracy,
        center_check: None,
    }
}
