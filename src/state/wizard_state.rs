//! Wizard state and its persisted subset

use super::answers::AnswerSet;
use crate::schema::{resolve_plan_variant, StepKey, FIRST_STEP, TOTAL_STEPS};
use serde::{Deserialize, Serialize};

/// Full state of one wizard session, owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    /// Always within `[1, TOTAL_STEPS]`
    pub current_step_index: usize,
    pub answers: AnswerSet,
    /// Set if and only if the terminal step was reached through a successful submission
    pub submission_id: Option<String>,
    /// User-facing message from the last failed submission
    pub submission_error: Option<String>,
    /// True only while a submission call is in flight
    pub is_submitting: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step_index: FIRST_STEP,
            answers: AnswerSet::default(),
            submission_id: None,
            submission_error: None,
            is_submitting: false,
        }
    }
}

impl WizardState {
    /// Restore a session from a saved draft
    pub fn from_draft(draft: DraftRecord) -> Self {
        Self {
            current_step_index: draft.current_step_index,
            answers: draft.answers,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_step_index == TOTAL_STEPS
    }

    /// Snapshot for the draft store
    pub fn draft(&self) -> DraftRecord {
        DraftRecord {
            answers: self.answers.clone(),
            current_step_index: self.current_step_index,
        }
    }
}

/// The part of [`WizardState`] that survives restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub answers: AnswerSet,
    pub current_step_index: usize,
}

impl DraftRecord {
    /// Structural check applied when loading.
    ///
    /// Drafts are only written before the terminal step, and every step before
    /// the current one must already have an accepted answer. Once past the plan
    /// step, the stored plan must be the variant the project type resolves to.
    pub fn is_consistent(&self) -> bool {
        if !(FIRST_STEP..TOTAL_STEPS).contains(&self.current_step_index) {
            return false;
        }
        let answered = StepKey::ALL
            .iter()
            .filter(|key| key.index() < self.current_step_index)
            .all(|key| self.answers.contains(*key));
        if !answered {
            return false;
        }
        match &self.answers.plan {
            Some(plan) if self.current_step_index > StepKey::Plan.index() => {
                let project_type = self.answers.project_type().unwrap_or_default();
                plan.kind() == resolve_plan_variant(project_type)
            }
            _ => true,
        }
    }
}
