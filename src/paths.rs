use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Resolves the config file: explicit path, then `<exe_dir>/config.json`,
/// then `./config.json`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let beside_exe = get_exe_dir().join("config.json");
    if beside_exe.exists() {
        return beside_exe;
    }
    PathBuf::from("config.json")
}

/// Returns the app-local tesseract directory:
/// `<data_local_dir>/bodygraph-ocr/tesseract/`
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bodygraph-ocr")
        .join("tesseract")
}

/// `<out_dir>/<stem>_report.json`
pub fn report_json_path(out_dir: &Path, image: &Path) -> PathBuf {
    out_dir.join(format!("{}_report.json", image_stem(image)))
}

/// `<out_dir>/<stem>_report.txt`
pub fn report_text_path(out_dir: &Path, image: &Path) -> PathBuf {
    out_dir.join(format!("{}_report.txt", image_stem(image)))
}

/// Annotation file next to the image: `<dir>/<stem>.txt`
pub fn annotation_path(image: &Path) -> PathBuf {
    image.with_extension("txt")
}

pub fn image_stem(image: &Path) -> String {
    image
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "chart".to_string())
}

/// Expands directories into their chart images (png/jpg/jpeg), sorted.
/// Plain file arguments pass through untouched.
pub fn expand_inputs(inputs: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_chart_image(p))
                .collect();
            found.sort();
            images.extend(found);
        } else {
            images.push(input.clone());
        }
    }
    Ok(images)
}

fn is_chart_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg")
        })
        .unwrap_or(false)
}
