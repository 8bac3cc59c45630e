//! Error types

use crate::schema::{PlanVariantKind, StepKey};
use thiserror::Error;

/// Message shown on the review step whenever a submission fails
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "We couldn't submit your application. Your answers are saved; please try again.";

/// Misuse of the wizard controller by the presentation layer.
///
/// Validation failures are not errors; they come back as field errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("expected a {expected} payload, received {received}")]
    UnexpectedStep { expected: StepKey, received: StepKey },

    #[error("plan step resolved to {expected}, received a {received} plan")]
    PlanVariantMismatch {
        expected: PlanVariantKind,
        received: PlanVariantKind,
    },

    #[error("submission only possible from the review step (current step {current})")]
    NotOnReview { current: usize },

    #[error("a submission is already in progress")]
    Busy,

    #[error("the application has already been submitted")]
    Completed,

    #[error("cannot submit: no accepted answer for {0}")]
    IncompleteAnswers(StepKey),
}

/// Failure inside a draft store. Never shown to the user.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid draft namespace {0:?}")]
    InvalidNamespace(String),

    #[error("draft storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("draft serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Classified failure of the external submission service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission failed: {0}")]
    Other(String),
}

impl SubmissionError {
    /// The message stored in the wizard state. All kinds read the same to the user.
    pub fn user_message(&self) -> String {
        SUBMISSION_FAILED_MESSAGE.to_string()
    }
}
