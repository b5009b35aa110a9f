//! Writing downloaded inputs to disk.
//!
//! Files are keyed by `<year>__<day>.txt` and always overwritten, so a
//! re-run for the same day replaces the previous download.

use crate::date::EffectiveDate;
use crate::error::AocError;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOWNLOAD_FOLDER: &str = "./inputs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub date: EffectiveDate,
    pub destination: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(date: EffectiveDate, destination: Option<PathBuf>) -> Self {
        Self { date, destination }
    }

    /// Caller-supplied path, or the default one under `folder`.
    pub fn destination_path(&self, folder: &Path) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| default_path(folder, &self.date))
    }
}

pub fn default_path(folder: &Path, date: &EffectiveDate) -> PathBuf {
    folder.join(format!("{}__{}.txt", date.year(), date.day()))
}

/// Write `body` to `path`, creating the parent directory when missing.
pub fn persist(body: &[u8], path: &Path) -> Result<(), AocError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|source| AocError::Storage {
                path: dir.to_path_buf(),
                source,
            })?;
            info!("Download folder created: {}", dir.display());
        }
    }
    fs::write(path, body).map_err(|source| AocError::Storage {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Input saved to {}", path.display());
    Ok(())
}
