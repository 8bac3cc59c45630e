//! Submission pipeline: the one network-shaped boundary of the wizard

mod application;
mod client;
mod traits;

pub use application::{Application, SubmissionReceipt};
pub use client::{HttpSubmissionClient, DEFAULT_SUBMISSION_URL, DEFAULT_TIMEOUT};
pub use traits::SubmissionService;

#[cfg(test)]
pub use traits::MockSubmissionService;
