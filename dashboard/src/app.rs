use crate::analyzer::GeminiClient;
use crate::config::Config;
use crate::error::DashboardError;
use crate::input::UploadedFile;
use crate::insight::AnalysisResult;
use std::time::Duration;
use tracing::info;

const INVALID_DATA_FALLBACK: &str = "The uploaded file does not contain valid analytics data. \
     Please upload a file with metrics like page views, sessions, bounce rates, \
     or user engagement data.";

/// Analysis lifecycle. The analyze trigger is only accepted in `Idle`;
/// a finished run lands in `Success` or `Failed`, and [`AppState::reset`]
/// returns to `Idle` so the user can correct input and rerun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting,
    Success,
    Failed,
}

/// Explicit application state: config and uploaded file are read at request
/// time, never mutated by the request itself.
pub struct AppState {
    pub config: Config,
    pub uploaded: Option<UploadedFile>,
    phase: Phase,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            uploaded: None,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attach_file(&mut self, file: UploadedFile) {
        info!("📄 {} ({})", file.name, file.size_label());
        self.uploaded = Some(file);
    }

    /// Mirrors the analyze-trigger enablement: idle, file present, key set.
    pub fn can_analyze(&self) -> bool {
        self.phase == Phase::Idle
            && self.uploaded.is_some()
            && !self.config.api_key.trim().is_empty()
    }

    /// Validate preconditions and enter `Requesting`. Single-flight: a
    /// second trigger while a request is outstanding is rejected.
    pub fn begin_analysis(&mut self) -> Result<(), DashboardError> {
        if self.phase == Phase::Requesting {
            return Err(DashboardError::validation(
                "Analysis In Progress",
                "An analysis is already running. Please wait for it to finish.",
            ));
        }
        if self.config.api_key.trim().is_empty() {
            return Err(DashboardError::validation(
                "API Key Required",
                "Please enter your Gemini API key to continue.",
            ));
        }
        if self.uploaded.is_none() {
            return Err(DashboardError::validation(
                "File Not Ready",
                "Please wait for the file to finish uploading.",
            ));
        }
        self.phase = Phase::Requesting;
        Ok(())
    }

    /// Return to `Idle` (notice dismissed / "analyze more data").
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Run one guarded analysis. Exactly one request is in flight at a
    /// time; it runs to completion or failure with no cancellation. The
    /// caller shows the notice on failure and calls [`reset`](Self::reset)
    /// to re-enable the trigger.
    pub async fn analyze(
        &mut self,
        client: &GeminiClient,
    ) -> Result<(AnalysisResult, Duration), DashboardError> {
        self.begin_analysis()?;
        let file_text = self
            .uploaded
            .as_ref()
            .map(|f| f.text.clone())
            .unwrap_or_default();

        match client.analyze(&file_text).await {
            Ok((result, duration)) => {
                if !result.valid {
                    let message = result
                        .error_message
                        .clone()
                        .unwrap_or_else(|| INVALID_DATA_FALLBACK.to_string());
                    self.phase = Phase::Failed;
                    return Err(DashboardError::InvalidInputData(message));
                }
                self.phase = Phase::Success;
                Ok((result, duration))
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FileKind;

    fn uploaded() -> UploadedFile {
        UploadedFile {
            name: "metrics.csv".into(),
            size_bytes: 10,
            kind: FileKind::Csv,
            text: "page,views".into(),
        }
    }

    fn ready_state() -> AppState {
        let mut config = Config::default();
        config.api_key = "key".into();
        let mut state = AppState::new(config);
        state.attach_file(uploaded());
        state
    }

    #[test]
    fn analyze_requires_key_and_file() {
        let state = AppState::new(Config::default());
        assert!(!state.can_analyze());

        let mut with_key = AppState::new(Config {
            api_key: "key".into(),
            ..Config::default()
        });
        assert!(!with_key.can_analyze());
        match with_key.begin_analysis() {
            Err(DashboardError::Validation { title, .. }) => {
                assert_eq!(title, "File Not Ready")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_key_is_rejected_first() {
        let mut state = AppState::new(Config::default());
        state.attach_file(uploaded());
        match state.begin_analysis() {
            Err(DashboardError::Validation { title, .. }) => {
                assert_eq!(title, "API Key Required")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn second_trigger_while_requesting_is_rejected() {
        let mut state = ready_state();
        assert!(state.can_analyze());
        state.begin_analysis().unwrap();
        assert_eq!(state.phase(), Phase::Requesting);
        assert!(!state.can_analyze());

        match state.begin_analysis() {
            Err(DashboardError::Validation { title, .. }) => {
                assert_eq!(title, "Analysis In Progress")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = ready_state();
        state.begin_analysis().unwrap();
        state.reset();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.can_analyze());
    }
}
