//! Chart data model.
//!
//! A chart is read as 13 planetary slots, each holding two gate.line
//! activations: the design (red, unconscious) column and the personality
//! (black, conscious) column.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChartError;

pub const GATE_COUNT: u8 = 64;
pub const LINE_COUNT: u8 = 6;

/// A validated gate (1..=64) and line (1..=6) pair, written `"<gate>.<line>"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateLine {
    gate: u8,
    line: u8,
}

impl GateLine {
    pub fn new(gate: u8, line: u8) -> Result<Self, ChartError> {
        if !(1..=GATE_COUNT).contains(&gate) || !(1..=LINE_COUNT).contains(&line) {
            return Err(ChartError::InvalidGateLine(format!("{}.{}", gate, line)));
        }
        Ok(Self { gate, line })
    }

    pub fn gate(&self) -> u8 {
        self.gate
    }

    pub fn line(&self) -> u8 {
        self.line
    }
}

impl FromStr for GateLine {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChartError::InvalidGateLine(s.to_string());
        let (gate, line) = s.trim().split_once('.').ok_or_else(invalid)?;
        let gate: u8 = gate.parse().map_err(|_| invalid())?;
        let line: u8 = line.parse().map_err(|_| invalid())?;
        GateLine::new(gate, line).map_err(|_| invalid())
    }
}

impl fmt::Display for GateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.gate, self.line)
    }
}

impl Serialize for GateLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GateLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The 13 planetary slots in chart order. The declaration order is the
/// reading order and must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Earth,
    Moon,
    #[serde(rename = "North Node")]
    NorthNode,
    #[serde(rename = "South Node")]
    SouthNode,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 13] = [
        Planet::Sun,
        Planet::Earth,
        Planet::Moon,
        Planet::NorthNode,
        Planet::SouthNode,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Earth => "Earth",
            Planet::Moon => "Moon",
            Planet::NorthNode => "North Node",
            Planet::SouthNode => "South Node",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Parses the display name used in annotation files ("North Node" etc).
    pub fn from_name(name: &str) -> Option<Planet> {
        Planet::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One resolved planetary slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlanetaryReading {
    pub planet: Planet,
    /// Red column (unconscious).
    pub design: GateLine,
    /// Black column (conscious).
    pub personality: GateLine,
}

/// The two OCR-read columns of the planetary table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Design / unconscious
    Red,
    /// Personality / conscious
    Black,
}

/// Two adjacent raw tokens before validation: red first, black second.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    pub red: String,
    pub black: String,
}

impl CandidatePair {
    pub fn new(red: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            red: red.into(),
            black: black.into(),
        }
    }

    /// True when both sides parse as in-range gate.line values.
    pub fn is_in_range(&self) -> bool {
        self.red.parse::<GateLine>().is_ok() && self.black.parse::<GateLine>().is_ok()
    }
}

/// Planetary readings keyed by slot. Unresolved slots are absent, never padded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanetaryChart {
    readings: BTreeMap<Planet, PlanetaryReading>,
}

impl PlanetaryChart {
    /// Builds a chart from positional slots. Slot `i` maps to `Planet::ALL[i]`;
    /// slots beyond 13 are ignored. Returns the chart plus every raw value that
    /// failed validation.
    pub fn from_slots(slots: &[Option<CandidatePair>]) -> (Self, Vec<String>) {
        let mut chart = PlanetaryChart::default();
        let mut rejected = Vec::new();

        for (planet, slot) in Planet::ALL.iter().zip(slots.iter()) {
            let Some(pair) = slot else {
                continue;
            };
            let design = pair.red.parse::<GateLine>();
            let personality = pair.black.parse::<GateLine>();
            match (design, personality) {
                (Ok(design), Ok(personality)) => {
                    chart.insert(PlanetaryReading {
                        planet: *planet,
                        design,
                        personality,
                    });
                }
                (design, personality) => {
                    if design.is_err() {
                        rejected.push(pair.red.clone());
                    }
                    if personality.is_err() {
                        rejected.push(pair.black.clone());
                    }
                }
            }
        }

        (chart, rejected)
    }

    pub fn from_pairs(pairs: &[CandidatePair]) -> (Self, Vec<String>) {
        let slots: Vec<Option<CandidatePair>> = pairs.iter().cloned().map(Some).collect();
        Self::from_slots(&slots)
    }

    pub fn insert(&mut self, reading: PlanetaryReading) {
        self.readings.insert(reading.planet, reading);
    }

    pub fn get(&self, planet: Planet) -> Option<&PlanetaryReading> {
        self.readings.get(&planet)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.readings.len() == Planet::ALL.len()
    }

    /// Readings in planetary order.
    pub fn readings(&self) -> impl Iterator<Item = &PlanetaryReading> {
        self.readings.values()
    }

    pub fn missing(&self) -> Vec<Planet> {
        Planet::ALL
            .into_iter()
            .filter(|p| !self.readings.contains_key(p))
            .collect()
    }

    /// Gates activated through the red column.
    pub fn design_gates(&self) -> BTreeSet<u8> {
        self.readings.values().map(|r| r.design.gate()).collect()
    }

    /// Gates activated through the black column.
    pub fn personality_gates(&self) -> BTreeSet<u8> {
        self.readings.values().map(|r| r.personality.gate()).collect()
    }
}

/// How a gate is activated across the two columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Black column only.
    ConsciousOnly,
    /// Red column only.
    UnconsciousOnly,
    Both,
}

impl Activation {
    pub fn label(&self) -> &'static str {
        match self {
            Activation::ConsciousOnly => "Conscious Only (Black)",
            Activation::UnconsciousOnly => "Unconscious Only (Red)",
            Activation::Both => "Both Conscious and Unconscious",
        }
    }
}
