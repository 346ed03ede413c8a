use crate::error::{Result, RgpError};
use crate::log_info;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn ensure_directory(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// File name for page `page_number` of the results fetched from `path`,
/// e.g. `checkins-facility-AAA-page-2.json`.
pub fn page_file_name(path: &str, page_number: usize) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let stem: Vec<&str> = path
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();
    let stem = if stem.is_empty() {
        "root".to_string()
    } else {
        stem.join("-")
    };

    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    format!("{}-page-{}.json", stem, page_number)
}

pub fn save_json(data: &impl serde::Serialize, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let json_string = serde_json::to_string_pretty(data).map_err(RgpError::Encode)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    log_info!("[utils] Saved JSON to {}", path.display());
    Ok(path.to_path_buf())
}
