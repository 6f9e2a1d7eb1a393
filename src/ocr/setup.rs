use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::{ChartError, Result};
use crate::paths::get_tesseract_dir;

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

#[cfg(windows)]
const COMMON_INSTALL_DIRS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];
#[cfg(not(windows))]
const COMMON_INSTALL_DIRS: &[&str] = &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];

#[derive(Debug, Clone, PartialEq)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    /// None lets tesseract use its compiled-in default
    pub tessdata: Option<PathBuf>,
}

/// Locates the tesseract executable and language data.
pub fn locate_tesseract(config: &OcrConfig) -> Result<TesseractPaths> {
    let executable = find_tesseract_executable(config.tesseract_path.as_deref())?;
    let tessdata = find_tessdata_dir(config.tessdata_dir.as_deref(), &config.language);

    info!("Tesseract found at: {}", executable.display());
    if let Some(dir) = &tessdata {
        info!("Using tessdata from: {}", dir.display());
    }

    Ok(TesseractPaths { executable, tessdata })
}

/// Finds the tesseract executable: configured path, app-local directory,
/// PATH, then common install locations.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ChartError::OcrUnavailable(format!(
            "configured tesseract not found at {}",
            path.display()
        )));
    }

    let local_exe = get_tesseract_dir().join(EXECUTABLE_NAME);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    if responds_to_version(Path::new("tesseract")) {
        return Ok(PathBuf::from("tesseract"));
    }

    for dir in COMMON_INSTALL_DIRS {
        let p = Path::new(dir).join(EXECUTABLE_NAME);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(ChartError::OcrUnavailable(
        "tesseract not found. Please install Tesseract-OCR or set ocr.tesseract_path".to_string(),
    ))
}

/// Finds a tessdata directory holding `<language>.traineddata`.
pub fn find_tessdata_dir(configured: Option<&Path>, language: &str) -> Option<PathBuf> {
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }

    let traineddata = format!("{}.traineddata", language);

    let local = get_tesseract_dir().join("tessdata");
    if local.join(&traineddata).exists() {
        return Some(local);
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if p.join(&traineddata).exists() {
            return Some(p);
        }
        let p = p.join("tessdata");
        if p.join(&traineddata).exists() {
            return Some(p);
        }
    }

    debug!("No tessdata override found; tesseract will use its default");
    None
}

fn responds_to_version(exe: &Path) -> bool {
    Command::new(exe)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configured_executable_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-tesseract");
        let err = find_tesseract_executable(Some(&missing)).unwrap_err();
        assert!(matches!(err, ChartError::OcrUnavailable(_)));

        let present = dir.path().join("tesseract");
        std::fs::write(&present, b"").unwrap();
        assert_eq!(find_tesseract_executable(Some(&present)).unwrap(), present);
    }

    #[test]
    fn test_configured_tessdata_wins() {
        let dir = tempdir().unwrap();
        assert_eq!(
            find_tessdata_dir(Some(dir.path()), "eng"),
            Some(dir.path().to_path_buf())
        );
    }
}
