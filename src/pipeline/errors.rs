use thiserror::Error;

use crate::mail::MailError;

/// Only two failures are user-facing: an auth failure from the mail provider
/// and an empty listing. Everything else is wrapped once at the orchestrator
/// boundary; degradations inside a run (decode failures, empty extractions)
/// never surface as errors at all.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("mail provider authentication failed: {0}")]
    Auth(String),

    #[error("no messages matched the configured label or fallback query")]
    NoMatchingMessages,

    #[error("newsletter pipeline failed: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    pub(crate) fn from_mail(err: MailError) -> Self {
        if err.is_auth() {
            Self::Auth(err.to_string())
        } else {
            Self::Internal(anyhow::Error::new(err))
        }
    }
}
