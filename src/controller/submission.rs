// src/controller/submission.rs
use std::sync::Arc;
use std::thread;
use tracing::{info, warn, error};

use super::{Dispatcher, TaskMessage};
use crate::client::AnalysisService;
use crate::state::intake_state::PendingFile;

/// Sends staged files to the analysis endpoint, one worker thread per submission.
pub struct SubmissionController {
    service: Arc<dyn AnalysisService>,
    dispatcher: Dispatcher,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn AnalysisService>, dispatcher: Dispatcher) -> Self {
        Self { service, dispatcher }
    }

    /// Exactly one `AnalysisFinished` message is sent for every call,
    /// whatever happens to the request.
    pub fn analyze(&self, file: PendingFile, generation: u64) {
        let service = Arc::clone(&self.service);
        let dispatcher = self.dispatcher.clone();

        let spawned = thread::Builder::new()
            .name("analysis-request".into())
            .spawn(move || {
                let outcome = match service.analyze(&file) {
                    Ok(result) => {
                        if result.is_empty() {
                            warn!(file = %file.name, "analysis returned no rows");
                        }
                        info!(
                            file = %file.name,
                            hours = result.best_hours.len(),
                            zones = result.best_zones.len(),
                            "analysis finished"
                        );
                        Ok(result)
                    }
                    Err(e) => {
                        warn!(file = %file.name, error = %e, "analysis failed");
                        Err(e.user_message())
                    }
                };
                dispatcher.send(TaskMessage::AnalysisFinished { generation, outcome });
            });

        if let Err(e) = spawned {
            error!(error = %e, "could not start analysis worker");
            self.dispatcher.send(TaskMessage::AnalysisFinished {
                generation,
                outcome: Err(crate::error::ANALYZE_FALLBACK_MESSAGE.to_string()),
            });
        }
    }
}
