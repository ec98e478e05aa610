use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::api::{ClientError, GenerationBackend, ResultSnapshot};
use crate::models::job::{JobId, JobStatus};
use crate::models::result::LogoVariant;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

/// Fixed-interval, fixed-budget polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Submit(#[from] ClientError),

    /// The job reported `failed`.
    #[error("{0}")]
    Failed(String),

    #[error("Logo generation timed out. Please try again.")]
    Timeout { attempts: u32 },

    #[error("Polling cancelled")]
    Cancelled,
}

/// Poll until the job completes with variants, fails, runs out of attempts or
/// `cancel` fires.
///
/// Attempts are strictly sequential: the next lookup starts only after the
/// previous one returned and the interval elapsed. Queued, processing,
/// missing and completed-but-empty results all keep polling.
pub async fn poll_until_terminal<B>(
    backend: &B,
    job_id: &JobId,
    config: PollConfig,
    cancel: &CancellationToken,
) -> Result<Vec<LogoVariant>, PollError>
where
    B: GenerationBackend + ?Sized,
{
    for attempt in 1..=config.max_attempts {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        tracing::debug!(
            job_id = %job_id,
            attempt,
            max_attempts = config.max_attempts,
            "Polling for result"
        );

        let snapshot = tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            snapshot = backend.fetch_result(job_id) => snapshot,
        };

        if let ResultSnapshot::Record(record) = snapshot {
            match record.status.job_status() {
                Some(JobStatus::Completed) => {
                    let variants = record.logo_variants();
                    if !variants.is_empty() {
                        tracing::info!(job_id = %job_id, attempt, variants = variants.len(), "Generation complete");
                        return Ok(variants);
                    }
                }
                Some(JobStatus::Failed) => {
                    return Err(PollError::Failed(
                        record
                            .error
                            .unwrap_or_else(|| "Logo generation failed".to_string()),
                    ));
                }
                _ => {
                    tracing::debug!(job_id = %job_id, status = %record.status, "Result not final yet");
                }
            }
        }

        if attempt < config.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = sleep(config.interval) => {}
            }
        }
    }

    tracing::warn!(job_id = %job_id, attempts = config.max_attempts, "Polling budget exhausted");
    Err(PollError::Timeout {
        attempts: config.max_attempts,
    })
}
