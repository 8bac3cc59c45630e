//! Line-oriented command protocol for driving the wizard headlessly
//!
//! Each input line is a JSON command, each answer a JSON [`StatusReport`].

use crate::schema::{PlanVariantKind, Step};
use crate::state::{ConsentAnswers, StepPayload};
use crate::submission::SubmissionService;
use crate::validation::FieldErrors;
use crate::wizard::WizardController;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A user action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    /// Complete the current step with a payload
    Next { payload: StepPayload },
    Back,
    /// Submit from the review step
    Submit {
        #[serde(default)]
        consent: ConsentAnswers,
    },
    Status,
    /// Discard the draft and start over
    Reset,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Snapshot of the wizard after a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub step: &'static str,
    pub title: &'static str,
    pub step_index: usize,
    pub total_steps: usize,
    /// Whether a back command would move the wizard
    pub can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_variant: Option<PlanVariantKind>,
    /// Previously accepted answer for the current step, for pre-filling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<StepPayload>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    pub is_submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_error: Option<String>,
    /// Command that could not be applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn from_controller(wizard: &WizardController) -> Self {
        let step = wizard.current_step();
        let (step_index, total_steps) = wizard.progress();
        let state = wizard.state();
        Self {
            step: step.name(),
            title: step.title(),
            step_index,
            total_steps,
            can_go_back: step.can_go_back() && !state.is_submitting,
            plan_variant: match step {
                Step::Plan(kind) => Some(kind),
                _ => None,
            },
            current: wizard.current_payload(),
            field_errors: wizard.field_errors().clone(),
            is_submitting: state.is_submitting,
            submission_id: state.submission_id.clone(),
            submission_error: state.submission_error.clone(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Apply one command and report the resulting state
pub async fn execute<S>(
    wizard: &mut WizardController,
    command: Command,
    service: &S,
) -> StatusReport
where
    S: SubmissionService + ?Sized,
{
    let result = match command {
        Command::Next { payload } => wizard.advance(payload).map(|_| ()),
        Command::Back => {
            wizard.retreat();
            Ok(())
        }
        Command::Submit { consent } => wizard.submit(consent, service).await.map(|_| ()),
        Command::Status => Ok(()),
        Command::Reset => {
            wizard.reset();
            Ok(())
        }
    };

    let report = StatusReport::from_controller(wizard);
    match result {
        Ok(()) => report,
        Err(e) => report.with_error(e),
    }
}
