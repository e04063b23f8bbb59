// src/state/app_state.rs
use std::sync::Arc;
use crate::analysis::AnalysisResult;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Idle,
    Loading,
    Results(Arc<AnalysisResult>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Submitted,
    Succeeded { generation: u64, result: Arc<AnalysisResult> },
    Failed { generation: u64, message: String },
    ValidationFailed(String),
    ErrorCleared,
    Reset,
}

/// The app state plus the submission generation. Each submission and each
/// reset starts a new generation; replies from older ones are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: AppState,
    pub generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: AppState::Idle,
            generation: 0,
        }
    }
}

impl Session {
    pub fn reduce(self, event: AppEvent) -> Session {
        let Session { state, generation } = self;

        match (state, event) {
            (AppState::Idle | AppState::Error(_), AppEvent::Submitted) => Session {
                state: AppState::Loading,
                generation: generation + 1,
            },
            (AppState::Loading, AppEvent::Succeeded { generation: g, result }) if g == generation => Session {
                state: AppState::Results(result),
                generation,
            },
            (AppState::Loading, AppEvent::Failed { generation: g, message }) if g == generation => Session {
                state: AppState::Error(message),
                generation,
            },
            (_, AppEvent::Reset) => Session {
                state: AppState::Idle,
                generation: generation + 1,
            },
            (AppState::Idle | AppState::Error(_), AppEvent::ValidationFailed(message)) => Session {
                state: AppState::Error(message),
                generation,
            },
            (AppState::Error(_), AppEvent::ErrorCleared) => Session {
                state: AppState::Idle,
                generation,
            },
            (state, _) => Session { state, generation },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AppState::Loading)
    }

    pub fn results(&self) -> Option<&Arc<AnalysisResult>> {
        match &self.state {
            AppState::Results(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AppState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> Arc<AnalysisResult> {
        Arc::new(AnalysisResult::default())
    }

    fn loading() -> Session {
        Session::default().reduce(AppEvent::Submitted)
    }

    #[test]
    fn submit_then_success_shows_results() {
        let session = loading();
        assert!(session.is_loading());

        let generation = session.generation;
        let session = session.reduce(AppEvent::Succeeded { generation, result: result() });
        assert!(session.results().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn failure_shows_error_without_results() {
        let session = loading();
        let generation = session.generation;
        let session = session.reduce(AppEvent::Failed { generation, message: "boom".into() });

        assert_eq!(session.state, AppState::Error("boom".into()));
        assert!(session.results().is_none());
    }

    #[test]
    fn reset_always_returns_to_idle() {
        let from_results = {
            let s = loading();
            let generation = s.generation;
            s.reduce(AppEvent::Succeeded { generation, result: result() })
        };
        let from_error = Session::default().reduce(AppEvent::ValidationFailed("x".into()));

        for session in [from_results, from_error] {
            let once = session.reduce(AppEvent::Reset);
            assert_eq!(once.state, AppState::Idle);
            let twice = once.reduce(AppEvent::Reset);
            assert_eq!(twice.state, AppState::Idle);
            assert!(twice.results().is_none() && twice.error().is_none());
        }
    }

    #[test]
    fn late_reply_after_reset_is_discarded() {
        let session = loading();
        let stale = session.generation;
        let session = session.reduce(AppEvent::Reset);

        let session = session.reduce(AppEvent::Succeeded { generation: stale, result: result() });
        assert_eq!(session.state, AppState::Idle);

        // a new submission does not accept the old reply either
        let session = session.reduce(AppEvent::Submitted);
        let session = session.reduce(AppEvent::Failed { generation: stale, message: "old".into() });
        assert!(session.is_loading());
    }

    #[test]
    fn validation_errors_come_and_go() {
        let session = Session::default().reduce(AppEvent::ValidationFailed("Please select a valid CSV file".into()));
        assert_eq!(session.error(), Some("Please select a valid CSV file"));

        let session = session.reduce(AppEvent::ErrorCleared);
        assert_eq!(session.state, AppState::Idle);
    }

    #[test]
    fn resubmit_from_error_clears_it() {
        let session = Session::default()
            .reduce(AppEvent::ValidationFailed("x".into()))
            .reduce(AppEvent::Submitted);
        assert!(session.is_loading());
        assert!(session.error().is_none());
    }

    #[test]
    fn submit_ignored_while_loading_or_showing_results() {
        let session = loading();
        let generation = session.generation;
        let again = session.clone().reduce(AppEvent::Submitted);
        assert_eq!(again, session);

        let shown = session.reduce(AppEvent::Succeeded { generation, result: result() });
        assert_eq!(shown.clone().reduce(AppEvent::Submitted), shown);
    }
}
