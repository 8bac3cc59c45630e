//! Trait abstraction for the submission service to enable mocking in tests

use super::{Application, SubmissionReceipt};
use crate::error::SubmissionError;
use async_trait::async_trait;

/// External service that turns a finished application into a stored record.
///
/// Called exactly once per submit; retries are left to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, application: &Application)
        -> Result<SubmissionReceipt, SubmissionError>;
}
