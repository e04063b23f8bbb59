// src/state/intake_state.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const CSV_SUFFIX: &str = ".csv";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error("Please select a valid CSV file")]
    InvalidFile,
    #[error("Please select a file first")]
    NoFileSelected,
}

/// Where the bytes of a chosen file live
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub size_bytes: u64,
    pub source: FileSource,
}

impl PendingFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Unreadable files still go through validation; the read at submit reports the error
        let size_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Self {
            name,
            size_bytes,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => fs::read(path),
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }

    pub fn size_mb(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Case-sensitive: `trips.CSV` is not accepted.
pub fn is_csv_name(name: &str) -> bool {
    name.ends_with(CSV_SUFFIX)
}

#[derive(Debug, Default)]
pub struct FileIntake {
    pending: Option<PendingFile>,
    drag_active: bool,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_file(&mut self, candidate: PendingFile) -> Result<(), IntakeError> {
        if is_csv_name(&candidate.name) {
            tracing::debug!(name = %candidate.name, size = candidate.size_bytes, "file staged");
            self.pending = Some(candidate);
            Ok(())
        } else {
            tracing::debug!(name = %candidate.name, "rejected non-csv file");
            self.pending = None;
            Err(IntakeError::InvalidFile)
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Only the first dropped file is considered. Returns `None` when nothing was dropped.
    pub fn drop_files(&mut self, files: Vec<PendingFile>) -> Option<Result<(), IntakeError>> {
        self.drag_active = false;
        files.into_iter().next().map(|file| self.select_file(file))
    }

    pub fn submit(&self) -> Result<PendingFile, IntakeError> {
        self.pending.clone().ok_or(IntakeError::NoFileSelected)
    }

    pub fn pending(&self) -> Option<&PendingFile> {
        self.pending.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.drag_active = false;
    }
}
