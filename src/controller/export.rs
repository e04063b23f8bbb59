// src/controller/export.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use anyhow::Result;
use tracing::{info, warn, error};

use super::{Dispatcher, TaskMessage};
use crate::analysis::{Row, Section};
use crate::client::AnalysisService;
use crate::file::export::{save_export, read_exported_csv};

/// Fetches server-rendered CSV files for one results section and saves them.
pub struct ExportController {
    service: Arc<dyn AnalysisService>,
    dispatcher: Dispatcher,
    download_dir: PathBuf,
    downloading: bool,
    alert: Option<String>,
    last_saved: Option<PathBuf>,
}

impl ExportController {
    pub fn new(service: Arc<dyn AnalysisService>, dispatcher: Dispatcher, download_dir: PathBuf) -> Self {
        Self {
            service,
            dispatcher,
            download_dir,
            downloading: false,
            alert: None,
            last_saved: None,
        }
    }

    /// Starts an export unless one is already running. Returns whether it started.
    pub fn export_section(&mut self, section: Section, rows: Vec<Row>) -> bool {
        if self.downloading {
            return false;
        }
        self.downloading = true;

        let service = Arc::clone(&self.service);
        let dispatcher = self.dispatcher.clone();
        let dir = self.download_dir.clone();
        let rows_sent = rows.len();

        let spawned = thread::Builder::new()
            .name("export-request".into())
            .spawn(move || {
                let outcome = fetch_and_save(service.as_ref(), &dir, section, &rows)
                    .map_err(|e| format!("{:#}", e));
                dispatcher.send(TaskMessage::ExportFinished { section, rows_sent, outcome });
            });

        if let Err(e) = spawned {
            error!(error = %e, "could not start export worker");
            self.finish(section, rows_sent, Err(e.to_string()));
        }
        true
    }

    pub fn finish(&mut self, section: Section, rows_sent: usize, outcome: Result<PathBuf, String>) {
        self.downloading = false;
        match outcome {
            Ok(path) => {
                info!(section = section.wire_name(), rows = rows_sent, path = %path.display(), "export saved");
                self.last_saved = Some(path);
            }
            Err(message) => {
                warn!(section = section.wire_name(), error = %message, "export failed");
                self.alert = Some(format!("Failed to download CSV: {}", message));
            }
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    pub fn forget_last_saved(&mut self) {
        self.last_saved = None;
    }
}

fn fetch_and_save(service: &dyn AnalysisService, dir: &Path, section: Section, rows: &[Row]) -> Result<PathBuf> {
    let bytes = service.download(section, rows)?;
    let path = save_export(dir, section, &bytes)?;

    match read_exported_csv(&path, rows) {
        Ok(saved) if saved.len() != rows.len() => {
            warn!(sent = rows.len(), saved = saved.len(), path = %path.display(), "export row count differs from results");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, path = %path.display(), "saved export is not readable as CSV"),
    }

    Ok(path)
}
