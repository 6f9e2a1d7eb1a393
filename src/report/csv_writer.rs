//! Batch summary CSV.
//!
//! One row per processed image, appended as each image finishes so completed
//! rows survive a crash. Columns: image, timestamp, completeness flag, then
//! design and personality values for the 13 planets in order.

use super::ChartReport;
use crate::model::Planet;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

fn column_prefix(planet: Planet) -> String {
    planet.name().to_lowercase().replace(' ', "_")
}

/// Header row: `image,timestamp,complete,sun_design,sun_personality,...`
pub fn csv_header() -> String {
    let mut columns = vec!["image".to_string(), "timestamp".to_string(), "complete".to_string()];
    for planet in Planet::ALL {
        let prefix = column_prefix(planet);
        columns.push(format!("{}_design", prefix));
        columns.push(format!("{}_personality", prefix));
    }
    columns.join(",")
}

/// Quotes a field containing a comma, quote or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Initializes the CSV file with a header if it doesn't exist or is empty.
///
/// Existing content is left untouched.
pub fn init_csv(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing CSV")?;
        let reader = BufReader::new(file);
        if reader.lines().next().is_some() {
            return Ok(());
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create CSV directory")?;
    }
    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", csv_header()).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one report row. Unresolved planetary cells are left empty.
pub fn append_to_csv(path: &Path, report: &ChartReport) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let mut fields = vec![
        escape(&report.image.display().to_string()),
        report.generated_at.clone(),
        report.complete.to_string(),
    ];
    for entry in &report.planets {
        fields.push(entry.design.map(|g| g.to_string()).unwrap_or_default());
        fields.push(entry.personality.map(|g| g.to_string()).unwrap_or_default());
    }

    writeln!(file, "{}", fields.join(",")).context("Failed to write CSV row")?;
    Ok(())
}
