//! Hand-written answer files for calibration images.
//!
//! One line per planet, e.g. `Sun - 42.5 (red) | 62.3 (black)`. Lines that
//! don't follow the `<planet> - <red> | <black>` shape are ignored.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::model::{Planet, PlanetaryChart};

const VALUE_PATTERN: &str = r"(\d+\.\d+)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub red: Vec<String>,
    pub black: Vec<String>,
}

impl Annotation {
    pub fn parse(content: &str) -> Result<Self> {
        let value_regex = Regex::new(VALUE_PATTERN)?;
        let mut annotation = Annotation::default();

        for line in content.lines() {
            let line = line.trim();
            let Some((_, values)) = line.split_once(" - ") else {
                continue;
            };
            let Some((red_part, black_part)) = values.split_once('|') else {
                continue;
            };

            if let Some(m) = value_regex.captures(red_part) {
                annotation.red.push(m[1].to_string());
            }
            if let Some(m) = value_regex.captures(black_part) {
                annotation.black.push(m[1].to_string());
            }
        }

        Ok(annotation)
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty() && self.black.is_empty()
    }

    /// Compares extracted values position by position.
    pub fn score(&self, chart: &PlanetaryChart) -> Accuracy {
        let (red_matches, red_total) =
            count_matches(&self.red, |p| chart.get(p).map(|r| r.design.to_string()));
        let (black_matches, black_total) =
            count_matches(&self.black, |p| chart.get(p).map(|r| r.personality.to_string()));

        Accuracy {
            expected_red: self.red.clone(),
            expected_black: self.black.clone(),
            red_matches,
            black_matches,
            red_accuracy: percent(red_matches, red_total),
            black_accuracy: percent(black_matches, black_total),
            total_accuracy: percent(red_matches + black_matches, red_total + black_total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accuracy {
    pub expected_red: Vec<String>,
    pub expected_black: Vec<String>,
    pub red_matches: usize,
    pub black_matches: usize,
    pub red_accuracy: f64,
    pub black_accuracy: f64,
    pub total_accuracy: f64,
}

impl Accuracy {
    pub fn is_perfect(&self) -> bool {
        self.total_accuracy >= 100.0
    }
}

fn count_matches(expected: &[String], extracted: impl Fn(Planet) -> Option<String>) -> (usize, usize) {
    let matches = expected
        .iter()
        .zip(Planet::ALL)
        .filter(|&(value, planet)| extracted(planet).as_deref() == Some(value.as_str()))
        .count();
    (matches, expected.len())
}

fn percent(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matches as f64 / total as f64 * 100.0
}

/// Loads the annotation file if it exists and holds at least one value.
pub fn load_annotation(path: &Path) -> Result<Option<Annotation>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read annotation file: {}", path.display()))?;
    let annotation = Annotation::parse(&content)?;
    Ok((!annotation.is_empty()).then_some(annotation))
}
