//! Plain-text rendering of a chart report.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{ChannelEntry, ChartReport};

fn join(gates: &[u8]) -> String {
    if gates.is_empty() {
        return "none".to_string();
    }
    gates.iter().map(u8::to_string).collect::<Vec<_>>().join(", ")
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Defined channels ordered from the root of the body upwards.
pub fn channels_by_hierarchy(report: &ChartReport) -> Vec<&ChannelEntry> {
    let mut channels: Vec<&ChannelEntry> = report.defined_channels().collect();
    channels.sort_by_key(|c| c.rank);
    channels
}

pub fn render_text(report: &ChartReport) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, report).context("Failed to render text report")?;
    Ok(out)
}

fn write_report(out: &mut String, report: &ChartReport) -> fmt::Result {
    writeln!(out, "Bodygraph report: {}", report.image.display())?;
    writeln!(out, "Generated: {}", report.generated_at)?;
    writeln!(
        out,
        "Extraction: {} slots resolved via {:?} ({:?} confidence){}",
        report.extraction.resolved_slots,
        report.extraction.source,
        report.extraction.confidence,
        if report.complete { "" } else { " - INCOMPLETE" }
    )?;
    if !report.extraction.rejected.is_empty() {
        writeln!(out, "Rejected values: {}", report.extraction.rejected.join(", "))?;
    }
    if let Some(accuracy) = &report.accuracy {
        writeln!(
            out,
            "Accuracy: {:.1}% (red {:.1}%, black {:.1}%)",
            accuracy.total_accuracy, accuracy.red_accuracy, accuracy.black_accuracy
        )?;
    }

    out.push_str("\nPLANETARY VALUES\n");
    writeln!(out, "{:<12}| {:<7}| {}", "Planet", "Design", "Personality")?;
    for entry in &report.planets {
        writeln!(
            out,
            "{:<12}| {:<7}| {}",
            entry.planet.name(),
            or_dash(entry.design),
            or_dash(entry.personality)
        )?;
    }

    out.push_str("\nGATE ACTIVATIONS\n");
    let summary = &report.activation_summary;
    writeln!(out, "Conscious only (black): {}", join(&summary.conscious_only))?;
    writeln!(out, "Unconscious only (red): {}", join(&summary.unconscious_only))?;
    writeln!(out, "Both: {}", join(&summary.both))?;

    out.push_str("\nDEFINED CHANNELS\n");
    let channels = channels_by_hierarchy(report);
    if channels.is_empty() {
        out.push_str("none\n");
    }
    for channel in channels {
        writeln!(
            out,
            "{} {} ({} - {})",
            channel.id, channel.name, channel.centers[0], channel.centers[1]
        )?;
        if let Some(commentary) = &channel.commentary {
            writeln!(out, "  {}", commentary)?;
        }
    }

    out.push_str("\nGATES\n");
    for gate in &report.gates {
        writeln!(
            out,
            "Gate {} {} ({}) - {}",
            gate.number,
            gate.name,
            gate.center,
            gate.activation.label()
        )?;
        writeln!(out, "  {}", gate.commentary)?;
    }

    out.push_str("\nCENTERS\n");
    for center in &report.centers {
        writeln!(
            out,
            "{}: {}",
            center.name,
            if center.defined { "defined" } else { "undefined" }
        )?;
        writeln!(out, "  {}", center.commentary)?;
    }

    if let Some(check) = &report.center_check {
        out.push_str("\nBODY GRAPH CHECK\n");
        if check.agrees() {
            out.push_str("Center fills and gate numbers agree with the planetary values\n");
        }
        if !check.center_mismatches.is_empty() {
            let names: Vec<&str> = check.center_mismatches.iter().map(|c| c.name()).collect();
            writeln!(out, "Center fill disagrees: {}", names.join(", "))?;
        }
        if !check.unexplained_gates.is_empty() {
            writeln!(out, "Gates not in planetary values: {}", join(&check.unexplained_gates))?;
        }
    }

    Ok(())
}

pub fn write_text(report: &ChartReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output_path, render_text(report)?)
        .context(format!("Failed to write text report: {}", output_path.display()))
}
