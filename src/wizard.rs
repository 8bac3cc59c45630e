//! Wizard controller
//!
//! The state machine behind the application form. It owns the [`WizardState`],
//! gates every forward move on step validation, resolves the plan variant when
//! the plan step is entered, writes a draft after each transition, and drives
//! the final submission.
//!
//! Submission is split in two so the in-flight window is observable:
//! [`WizardController::begin_submit`] validates consent and hands out a
//! [`SubmitTicket`]; the caller awaits [`SubmitTicket::dispatch`] and passes the
//! result to [`WizardController::finish_submit`]. [`WizardController::submit`]
//! does all three in one call.

use crate::draft::DraftStore;
use crate::error::{SubmissionError, WizardError};
use crate::schema::{
    resolve_plan_variant, PlanVariantKind, Step, StepKey, DONE_STEP, FIRST_STEP, REVIEW_STEP,
    TOTAL_STEPS,
};
use crate::state::{ConsentAnswers, PlanPayload, StepPayload, WizardState};
use crate::submission::{Application, SubmissionReceipt, SubmissionService};
use crate::validation::{validate_consent, validate_step, FieldErrors};
use uuid::Uuid;

/// Result of an advance request
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Payload accepted; the wizard moved to this step
    Advanced(Step),
    /// Payload rejected; the wizard stayed put
    Rejected(FieldErrors),
}

/// Result of starting a submission
#[derive(Debug)]
pub enum SubmitStart {
    /// Consent accepted; dispatch the ticket and report back
    Ready(SubmitTicket),
    /// Consent missing; nothing was sent
    Rejected(FieldErrors),
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted { id: String },
    /// The service failed; the wizard stays on review and may resubmit
    Failed { message: String },
    /// Consent missing; the service was not called
    Rejected(FieldErrors),
    /// The result belonged to a session that has since been reset
    Stale,
}

/// An in-flight submission
#[derive(Debug)]
pub struct SubmitTicket {
    session_id: Uuid,
    application: Application,
}

impl SubmitTicket {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Make the single service call for this submission
    pub async fn dispatch<S>(&self, service: &S) -> Result<SubmissionReceipt, SubmissionError>
    where
        S: SubmissionService + ?Sized,
    {
        service.submit(&self.application).await
    }
}

/// Drives one wizard session
pub struct WizardController {
    state: WizardState,
    /// Errors from the last rejected advance or submit
    field_errors: FieldErrors,
    session_id: Uuid,
    /// Resolved when the plan step is entered
    plan_variant: Option<PlanVariantKind>,
    drafts: Box<dyn DraftStore>,
}

impl WizardController {
    /// Start a session, resuming the stored draft if there is one
    pub fn initialize(drafts: Box<dyn DraftStore>) -> Self {
        let state = match drafts.load() {
            Some(draft) => {
                tracing::info!(
                    "Resuming draft '{}' at step {}",
                    drafts.namespace(),
                    draft.current_step_index
                );
                WizardState::from_draft(draft)
            }
            None => {
                tracing::debug!("No draft in '{}', starting fresh", drafts.namespace());
                WizardState::default()
            }
        };

        let mut controller = Self {
            state,
            field_errors: FieldErrors::new(),
            session_id: Uuid::new_v4(),
            plan_variant: None,
            drafts,
        };
        controller.enter_current_step();
        controller
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// `(current, total)` step numbers
    pub fn progress(&self) -> (usize, usize) {
        (self.state.current_step_index, TOTAL_STEPS)
    }

    pub fn current_step(&self) -> Step {
        match self.state.current_step_index {
            1 => Step::Basics,
            2 => Step::SiteDetails,
            3 => Step::Plan(self.plan_variant.unwrap_or_else(|| self.resolve_plan())),
            4 => Step::Monitoring,
            REVIEW_STEP => Step::Review,
            _ => Step::Done(self.state.submission_id.clone().unwrap_or_default()),
        }
    }

    /// What the current step's form should show: the accepted answer if there is
    /// one, or an empty plan of the resolved variant when the stored plan was
    /// collected for another project type.
    pub fn current_payload(&self) -> Option<StepPayload> {
        match self.current_step() {
            Step::Plan(kind) => {
                let plan = match &self.state.answers.plan {
                    Some(plan) if plan.kind() == kind => plan.clone(),
                    _ => PlanPayload::empty(kind),
                };
                Some(StepPayload::Plan(plan))
            }
            step => step
                .key()
                .and_then(|key| self.state.answers.payload_for(key)),
        }
    }

    /// Validate `payload` for the current step and move forward if it passes
    pub fn advance(&mut self, payload: StepPayload) -> Result<AdvanceOutcome, WizardError> {
        self.ensure_idle()?;

        let index = self.state.current_step_index;
        let expected = if index < REVIEW_STEP {
            StepKey::at(index).unwrap_or(StepKey::Basics)
        } else {
            StepKey::Consent
        };
        if payload.key() != expected {
            return Err(WizardError::UnexpectedStep {
                expected,
                received: payload.key(),
            });
        }
        if let (Step::Plan(resolved), StepPayload::Plan(plan)) = (self.current_step(), &payload) {
            if plan.kind() != resolved {
                return Err(WizardError::PlanVariantMismatch {
                    expected: resolved,
                    received: plan.kind(),
                });
            }
        }

        match validate_step(payload) {
            Err(errors) => {
                tracing::debug!(
                    "Rejected {expected} payload: {} invalid field(s)",
                    errors.len()
                );
                self.field_errors = errors.clone();
                Ok(AdvanceOutcome::Rejected(errors))
            }
            Ok(validated) => {
                self.state.answers = self.state.answers.with_step(validated.into_inner());
                self.state.current_step_index = (index + 1).min(REVIEW_STEP);
                self.clear_errors();
                self.enter_current_step();
                self.persist();
                let step = self.current_step();
                tracing::info!("Accepted {expected}, now on {}", step.name());
                Ok(AdvanceOutcome::Advanced(step))
            }
        }
    }

    /// Move back one step. Ignored on the first step, while submitting, and
    /// after completion.
    pub fn retreat(&mut self) -> Step {
        if self.state.is_submitting {
            tracing::debug!("Ignoring back navigation during submission");
            return self.current_step();
        }
        if self.state.is_complete() {
            tracing::debug!("Ignoring back navigation after completion");
            return self.current_step();
        }

        self.state.current_step_index = self
            .state
            .current_step_index
            .saturating_sub(1)
            .max(FIRST_STEP);
        self.clear_errors();
        self.enter_current_step();
        self.persist();
        let step = self.current_step();
        tracing::debug!("Moved back to {}", step.name());
        step
    }

    /// Validate consent and mark the wizard as submitting
    pub fn begin_submit(&mut self, consent: ConsentAnswers) -> Result<SubmitStart, WizardError> {
        self.ensure_idle()?;
        if self.state.current_step_index != REVIEW_STEP {
            return Err(WizardError::NotOnReview {
                current: self.state.current_step_index,
            });
        }

        let consent = match validate_consent(consent) {
            Ok(consent) => consent.into_inner(),
            Err(errors) => {
                tracing::debug!("Submission blocked: consent not given");
                self.field_errors = errors.clone();
                return Ok(SubmitStart::Rejected(errors));
            }
        };

        let answers = self.state.answers.with_consent(consent);
        let application = Application::from_answers(&answers)?;
        self.state.answers = answers;
        self.state.is_submitting = true;
        self.clear_errors();
        self.persist();
        tracing::info!("Submitting application (session {})", self.session_id);

        Ok(SubmitStart::Ready(SubmitTicket {
            session_id: self.session_id,
            application,
        }))
    }

    /// Apply the service's answer to a submission started by [`Self::begin_submit`]
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> SubmitOutcome {
        if ticket.session_id != self.session_id || !self.state.is_submitting {
            tracing::warn!(
                "Dropping submission result for stale session {}",
                ticket.session_id
            );
            return SubmitOutcome::Stale;
        }

        self.state.is_submitting = false;
        match result {
            Ok(receipt) => {
                self.state.submission_id = Some(receipt.id.clone());
                self.state.submission_error = None;
                if let Err(e) = self.drafts.clear() {
                    tracing::warn!("Failed to clear draft '{}': {e}", self.drafts.namespace());
                }
                self.state.current_step_index = DONE_STEP;
                self.enter_current_step();
                tracing::info!("Application submitted as {}", receipt.id);
                SubmitOutcome::Submitted { id: receipt.id }
            }
            Err(e) => {
                tracing::warn!("Submission failed: {e}");
                let message = e.user_message();
                self.state.submission_error = Some(message.clone());
                SubmitOutcome::Failed { message }
            }
        }
    }

    /// Validate consent, call the service once, and apply the result
    pub async fn submit<S>(
        &mut self,
        consent: ConsentAnswers,
        service: &S,
    ) -> Result<SubmitOutcome, WizardError>
    where
        S: SubmissionService + ?Sized,
    {
        let ticket = match self.begin_submit(consent)? {
            SubmitStart::Ready(ticket) => ticket,
            SubmitStart::Rejected(errors) => return Ok(SubmitOutcome::Rejected(errors)),
        };
        let result = ticket.dispatch(service).await;
        Ok(self.finish_submit(ticket, result))
    }

    /// Throw the session away: forget the draft and start over at step 1.
    /// Results of submissions started before the reset are dropped.
    pub fn reset(&mut self) {
        if let Err(e) = self.drafts.clear() {
            tracing::warn!("Failed to clear draft '{}': {e}", self.drafts.namespace());
        }
        self.state = WizardState::default();
        self.field_errors.clear();
        self.session_id = Uuid::new_v4();
        self.enter_current_step();
        tracing::info!("Started new session {}", self.session_id);
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.state.is_submitting {
            return Err(WizardError::Busy);
        }
        if self.state.is_complete() {
            return Err(WizardError::Completed);
        }
        Ok(())
    }

    fn resolve_plan(&self) -> PlanVariantKind {
        resolve_plan_variant(self.state.answers.project_type().unwrap_or_default())
    }

    fn enter_current_step(&mut self) {
        self.plan_variant = if self.state.current_step_index == StepKey::Plan.index() {
            let kind = self.resolve_plan();
            tracing::debug!("Plan step resolved to {kind}");
            Some(kind)
        } else {
            None
        };
    }

    fn clear_errors(&mut self) {
        self.field_errors.clear();
        self.state.submission_error = None;
    }

    /// Best-effort draft write; failures never block a transition
    fn persist(&self) {
        if self.state.current_step_index >= TOTAL_STEPS {
            return;
        }
        if let Err(e) = self.drafts.save(&self.state.draft()) {
            tracing::warn!("Failed to save draft '{}': {e}", self.drafts.namespace());
        }
    }
}
