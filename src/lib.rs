//! Project Wizard - multi-step application wizard for land-based carbon
//! removal projects
//!
//! The wizard walks an applicant through project basics, site details, a
//! plan whose shape depends on the project type, and monitoring, then submits
//! the whole application in one call. Answers survive interruptions through a
//! draft store.

pub mod command;
pub mod config;
pub mod draft;
pub mod error;
pub mod schema;
pub mod state;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use error::{DraftError, SubmissionError, WizardError};
pub use schema::{resolve_plan_variant, PlanVariantKind, Step, StepKey, TOTAL_STEPS};
pub use wizard::{AdvanceOutcome, SubmitOutcome, SubmitStart, SubmitTicket, WizardController};
