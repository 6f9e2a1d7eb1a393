use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::GrayImage;
use tempfile::NamedTempFile;
use tracing::debug;

use super::setup::TesseractPaths;
use super::{OcrRequest, Recognizer};
use crate::error::{ChartError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs the tesseract executable as a subprocess, one invocation per call.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    paths: TesseractPaths,
    language: String,
    timeout: Duration,
}

impl TesseractRecognizer {
    pub fn new(paths: TesseractPaths, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            paths,
            language: language.into(),
            timeout,
        }
    }

    fn build_command(&self, input: &std::path::Path, output_base: &str, request: &OcrRequest) -> Command {
        let mut command = Command::new(&self.paths.executable);
        command
            .arg(input)
            .arg(output_base)
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(request.layout.psm().to_string());

        if let Some(dir) = &self.paths.tessdata {
            command.arg("--tessdata-dir").arg(dir);
        }
        if let Some(whitelist) = request.whitelist {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={}", whitelist));
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, img: &GrayImage, request: &OcrRequest) -> Result<String> {
        if img.width() == 0 || img.height() == 0 {
            return Ok(String::new());
        }

        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())
            .map_err(|e| ChartError::OcrFailed(format!("failed to write OCR input: {}", e)))?;

        // Tesseract appends .txt to the output base
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let child = self
            .build_command(temp_input.path(), &output_base, request)
            .spawn()
            .map_err(|e| ChartError::OcrUnavailable(format!("failed to start tesseract: {}", e)))?;

        wait_with_timeout(child, self.timeout)?;

        let txt_path = format!("{}.txt", output_base);
        let text = std::fs::read_to_string(&txt_path)
            .map_err(|e| ChartError::OcrFailed(format!("failed to read tesseract output: {}", e)))?;
        let _ = std::fs::remove_file(&txt_path);

        debug!("tesseract (psm {}) -> {:?}", request.layout.psm(), text.trim());
        Ok(text)
    }
}

/// Reads the child's stderr on its own thread so a chatty engine cannot
/// fill the pipe and stall.
fn drain_stderr(child: &mut Child) -> Option<JoinHandle<String>> {
    child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf).map(|_| buf).unwrap_or_default()
        })
    })
}

fn collect_stderr(reader: Option<JoinHandle<String>>) -> String {
    reader.and_then(|handle| handle.join().ok()).unwrap_or_default()
}

/// Waits for the child to exit, killing it once `timeout` has elapsed.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let stderr = drain_stderr(&mut child);

    loop {
        if let Some(status) = child.try_wait()? {
            let stderr = collect_stderr(stderr);
            if status.success() {
                return Ok(());
            }
            return Err(ChartError::OcrFailed(format!(
                "tesseract exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            collect_stderr(stderr);
            return Err(ChartError::OcrTimeout(timeout));
        }

        thread::sleep(POLL_INTERVAL);
    }
}
