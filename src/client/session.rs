use garde::Validate;
use tokio_util::sync::CancellationToken;

use super::api::GenerationBackend;
use super::gallery::Gallery;
use super::poller::{poll_until_terminal, PollConfig, PollError};
use crate::models::job::{JobId, JobRequest};
use crate::models::result::LogoVariant;

/// What the user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Form,
    /// `job_id` is known once the submission has been acknowledged.
    Generating { job_id: Option<JobId> },
    Results { variants: Vec<LogoVariant> },
}

/// User-visible error raised when a generation attempt aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    fn generation_failed(err: &PollError) -> Self {
        Self {
            title: "Generation Failed".to_string(),
            description: err.to_string(),
        }
    }
}

/// Drives the `form -> generating -> results` flow for one consumer.
#[derive(Debug)]
pub struct GenerationSession {
    state: ViewState,
    notification: Option<Notification>,
    config: PollConfig,
}

impl GenerationSession {
    pub fn new(config: PollConfig) -> Self {
        Self {
            state: ViewState::Form,
            notification: None,
            config,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// Gallery for the current results, if any.
    pub fn gallery(&self) -> Option<Gallery> {
        match &self.state {
            ViewState::Results { variants } => Some(Gallery::from_variants(variants)),
            _ => None,
        }
    }

    /// Submit `request` and poll until a terminal outcome.
    ///
    /// Every abort returns the view to `Form` with a notification, except
    /// cancellation: once `cancel` fires the session is left untouched.
    pub async fn run<B>(
        &mut self,
        backend: &B,
        request: &JobRequest,
        cancel: &CancellationToken,
    ) -> Result<(), PollError>
    where
        B: GenerationBackend + ?Sized,
    {
        self.notification = None;

        if let Err(report) = request.validate() {
            return Err(self.abort(PollError::Invalid(report.to_string())));
        }

        self.state = ViewState::Generating { job_id: None };

        let submitted = tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            submitted = backend.submit(request) => submitted,
        };
        let response = match submitted {
            Ok(r) => r,
            Err(e) => return Err(self.abort(e.into())),
        };

        tracing::info!(job_id = %response.job_id, status = %response.status, "Job created");
        self.state = ViewState::Generating {
            job_id: Some(response.job_id.clone()),
        };

        match poll_until_terminal(backend, &response.job_id, self.config, cancel).await {
            Ok(variants) => {
                self.state = ViewState::Results { variants };
                Ok(())
            }
            Err(PollError::Cancelled) => Err(PollError::Cancelled),
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Discard results and go back to the form.
    pub fn regenerate(&mut self) {
        self.state = ViewState::Form;
        self.notification = None;
    }

    fn abort(&mut self, err: PollError) -> PollError {
        tracing::warn!(error = %err, "Generation aborted");
        self.notification = Some(Notification::generation_failed(&err));
        self.state = ViewState::Form;
        err
    }
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::ResultSnapshot;
    use crate::client::test_support::{completed, ScriptedBackend};
    use crate::models::result::ResultRecord;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_success_shows_results() {
        let backend = ScriptedBackend::new(vec![
            ResultSnapshot::Pending,
            ResultSnapshot::Record(completed(&ScriptedBackend::job_id(), 1)),
        ]);
        let mut session = GenerationSession::new(fast(5));

        session
            .run(&backend, &JobRequest::new("a coffee shop logo, warm colors"), &CancellationToken::new())
            .await
            .unwrap();

        let gallery = session.gallery().unwrap();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.tiles()[0].score_label, "0.92");
        assert!(session.notification().is_none());
    }

    #[tokio::test]
    async fn test_timeout_returns_to_form_with_notification() {
        let backend = ScriptedBackend::new(Vec::new());
        let mut session = GenerationSession::new(fast(3));

        let err = session
            .run(&backend, &JobRequest::new("owl"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Timeout { attempts: 3 }));
        assert_eq!(session.state(), &ViewState::Form);
        let note = session.take_notification().unwrap();
        assert_eq!(note.title, "Generation Failed");
        assert_eq!(note.description, "Logo generation timed out. Please try again.");
    }

    #[tokio::test]
    async fn test_failed_job_surfaces_message() {
        let backend = ScriptedBackend::new(vec![ResultSnapshot::Record(ResultRecord::failed(
            ScriptedBackend::job_id(),
            "prompt rejected",
        ))]);
        let mut session = GenerationSession::new(fast(3));

        session
            .run(&backend, &JobRequest::new("owl"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(session.state(), &ViewState::Form);
        assert_eq!(session.notification().unwrap().description, "prompt rejected");
    }

    #[tokio::test]
    async fn test_blank_description_never_submits() {
        let backend = ScriptedBackend::new(Vec::new());
        let mut session = GenerationSession::new(fast(3));

        let err = session
            .run(&backend, &JobRequest::new("  "), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Invalid(_)));
        assert_eq!(backend.submits(), 0);
        assert_eq!(session.state(), &ViewState::Form);
    }

    #[tokio::test]
    async fn test_rejected_submission_returns_to_form() {
        let backend = ScriptedBackend::rejecting();
        let mut session = GenerationSession::new(fast(3));

        let err = session
            .run(&backend, &JobRequest::new("owl"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Submit(_)));
        assert_eq!(backend.polls(), 0);
        assert_eq!(session.state(), &ViewState::Form);
        assert!(session.notification().is_some());
    }

    #[tokio::test]
    async fn test_cancel_leaves_state_untouched() {
        let cancel = CancellationToken::new();
        let backend = ScriptedBackend::new(Vec::new()).cancel_on_poll(2, cancel.clone());
        let mut session = GenerationSession::new(PollConfig {
            interval: Duration::from_millis(1),
            max_attempts: 10,
        });

        let err = session
            .run(&backend, &JobRequest::new("owl"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled));
        assert_eq!(
            session.state(),
            &ViewState::Generating {
                job_id: Some(ScriptedBackend::job_id())
            }
        );
        assert!(session.notification().is_none());
        assert!(backend.polls() <= 2);
    }

    #[test]
    fn test_regenerate_resets() {
        let mut session = GenerationSession::default();
        session.state = ViewState::Results {
            variants: completed(&ScriptedBackend::job_id(), 2).logo_variants(),
        };
        session.regenerate();
        assert_eq!(session.state(), &ViewState::Form);
        assert!(session.gallery().is_none());
    }
}
