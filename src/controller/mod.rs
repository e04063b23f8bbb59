// src/controller/mod.rs
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, Section};
use crate::client::{AnalysisService, HealthStatus};
use crate::render::ResultsView;
use crate::state::{AppEvent, FileIntake, PendingFile, Session};

pub mod export;
pub mod submission;

use export::ExportController;
use submission::SubmissionController;

/// Completion messages from worker threads back to the UI loop
#[derive(Debug)]
pub enum TaskMessage {
    AnalysisFinished {
        generation: u64,
        outcome: Result<AnalysisResult, String>,
    },
    ExportFinished {
        section: Section,
        rows_sent: usize,
        outcome: Result<PathBuf, String>,
    },
    HealthChecked(Result<HealthStatus, String>),
}

pub type Repaint = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct Dispatcher {
    tx: Sender<TaskMessage>,
    repaint: Repaint,
}

impl Dispatcher {
    pub fn send(&self, message: TaskMessage) {
        // the receiver only goes away when the app is shutting down
        if self.tx.send(message).is_ok() {
            (self.repaint)();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthState {
    Unknown,
    Checking,
    Healthy(HealthStatus),
    Unreachable(String),
}

pub struct AppController {
    session: Session,
    intake: FileIntake,
    submission: SubmissionController,
    export: ExportController,
    service: Arc<dyn AnalysisService>,
    dispatcher: Dispatcher,
    rx: Receiver<TaskMessage>,
    view: Option<ResultsView>,
    received_at: Option<DateTime<Local>>,
    health: HealthState,
}

impl AppController {
    pub fn new(service: Arc<dyn AnalysisService>, download_dir: PathBuf, repaint: Repaint) -> Self {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher { tx, repaint };

        Self {
            session: Session::default(),
            intake: FileIntake::new(),
            submission: SubmissionController::new(Arc::clone(&service), dispatcher.clone()),
            export: ExportController::new(Arc::clone(&service), dispatcher.clone(), download_dir),
            service,
            dispatcher,
            rx,
            view: None,
            received_at: None,
            health: HealthState::Unknown,
        }
    }

    fn dispatch(&mut self, event: AppEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = session.reduce(event);
    }

    /// The staged file is locked while its submission is in flight.
    pub fn select_file(&mut self, candidate: PendingFile) {
        if self.session.is_loading() {
            debug!(file = %candidate.name, "ignoring selection during analysis");
            return;
        }
        match self.intake.select_file(candidate) {
            Ok(()) => self.dispatch(AppEvent::ErrorCleared),
            Err(e) => self.dispatch(AppEvent::ValidationFailed(e.to_string())),
        }
    }

    pub fn drag_enter(&mut self) {
        self.intake.drag_enter();
    }

    pub fn drag_over(&mut self) {
        self.intake.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.intake.drag_leave();
    }

    pub fn drop_files(&mut self, files: Vec<PendingFile>) {
        if self.session.is_loading() {
            debug!(count = files.len(), "ignoring drop during analysis");
            self.intake.drag_leave();
            return;
        }
        match self.intake.drop_files(files) {
            Some(Ok(())) => self.dispatch(AppEvent::ErrorCleared),
            Some(Err(e)) => self.dispatch(AppEvent::ValidationFailed(e.to_string())),
            None => {}
        }
    }

    pub fn submit(&mut self) {
        if self.session.is_loading() {
            debug!("submission already in flight");
            return;
        }

        match self.intake.submit() {
            Ok(file) => {
                self.dispatch(AppEvent::Submitted);
                if self.session.is_loading() {
                    self.submission.analyze(file, self.session.generation);
                }
            }
            Err(e) => self.dispatch(AppEvent::ValidationFailed(e.to_string())),
        }
    }

    /// Back to an empty upload form. Replies still in flight are ignored.
    pub fn reset(&mut self) {
        self.dispatch(AppEvent::Reset);
        self.intake.clear();
        self.view = None;
        self.received_at = None;
        self.export.forget_last_saved();
    }

    pub fn request_export(&mut self, section: Section) {
        let Some(result) = self.session.results() else {
            return;
        };
        let rows = result.rows(section);
        if rows.is_empty() {
            return;
        }
        if !self.export.export_section(section, rows) {
            debug!(section = section.wire_name(), "export already in progress");
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.export.dismiss_alert();
    }

    pub fn check_health(&mut self) {
        if self.health == HealthState::Checking {
            return;
        }
        self.health = HealthState::Checking;

        let service = Arc::clone(&self.service);
        let dispatcher = self.dispatcher.clone();
        let spawned = thread::Builder::new()
            .name("health-check".into())
            .spawn(move || {
                let outcome = service.health().map_err(|e| e.to_string());
                dispatcher.send(TaskMessage::HealthChecked(outcome));
            });

        if let Err(e) = spawned {
            self.health = HealthState::Unreachable(e.to_string());
        }
    }

    /// Applies every finished task. Called once per frame.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::AnalysisFinished { generation, outcome } => {
                if generation != self.session.generation || !self.session.is_loading() {
                    info!(generation, current = self.session.generation, "discarding stale analysis reply");
                    return;
                }

                match outcome {
                    Ok(result) => {
                        let result = Arc::new(result);
                        self.view = Some(ResultsView::project(&result));
                        self.received_at = Some(Local::now());
                        self.dispatch(AppEvent::Succeeded { generation, result });
                    }
                    Err(message) => {
                        self.view = None;
                        self.dispatch(AppEvent::Failed { generation, message });
                    }
                }
            }
            TaskMessage::ExportFinished { section, rows_sent, outcome } => {
                self.export.finish(section, rows_sent, outcome);
            }
            TaskMessage::HealthChecked(outcome) => {
                self.health = match outcome {
                    Ok(status) => {
                        info!(status = %status.status, engine = %status.engine, "analysis service reachable");
                        HealthState::Healthy(status)
                    }
                    Err(message) => {
                        warn!(error = %message, "analysis service unreachable");
                        HealthState::Unreachable(message)
                    }
                };
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn export(&self) -> &ExportController {
        &self.export
    }

    pub fn results_view(&self) -> Option<&ResultsView> {
        self.session.results().and(self.view.as_ref())
    }

    pub fn received_at(&self) -> Option<DateTime<Local>> {
        self.received_at
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }
}
