//! Bodygraph OCR command line.
//!
//! Processes chart screenshots (files or directories of them) and writes a
//! JSON report per image, optionally a text report and a summary CSV.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};

use bodygraph_ocr::batch::{run_batch, BatchOptions};
use bodygraph_ocr::commentary::select_commentator;
use bodygraph_ocr::config::AppConfig;
use bodygraph_ocr::logging::init_logger;
use bodygraph_ocr::ocr::{locate_tesseract, Recognizer, TesseractRecognizer, UnavailableRecognizer};
use bodygraph_ocr::paths::{expand_inputs, resolve_config_path};

#[derive(Parser, Debug)]
#[command(name = "bodygraph-ocr", version, about = "Extract and analyze Human Design chart screenshots")]
struct Cli {
    /// Chart images, or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for reports
    #[arg(short, long, default_value = "results")]
    out_dir: PathBuf,

    /// Config file (default: config.json next to the executable, then ./config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ask the configured chat endpoint for commentary (needs the API key variable)
    #[arg(long)]
    commentary: bool,

    /// Append one summary row per image to this CSV file
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Also write a plain-text report per image
    #[arg(long)]
    text: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_recognizer(config: &AppConfig) -> Box<dyn Recognizer> {
    match locate_tesseract(&config.ocr) {
        Ok(paths) => Box::new(TesseractRecognizer::new(
            paths,
            config.ocr.language.clone(),
            Duration::from_secs(config.ocr.timeout_secs),
        )),
        Err(e) => {
            warn!("{}. Charts will produce empty extractions.", e);
            Box::new(UnavailableRecognizer::new(e.to_string()))
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = AppConfig::load(&resolve_config_path(cli.config.as_deref()));

    let images = expand_inputs(&cli.inputs).context("Failed to read input directory")?;
    if images.is_empty() {
        warn!("No chart images found in the given inputs");
        return Ok(true);
    }

    let recognizer = build_recognizer(&config);
    let commentator = select_commentator(cli.commentary, &config.commentary);

    let options = BatchOptions {
        out_dir: cli.out_dir,
        summary_csv: cli.summary_csv,
        write_text: cli.text,
    };
    let summary = run_batch(&images, recognizer.as_ref(), &config, commentator.as_ref(), &options);

    Ok(summary.failed.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
