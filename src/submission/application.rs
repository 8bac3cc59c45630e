//! The finished application sent to the submission service

use crate::error::WizardError;
use crate::schema::StepKey;
use crate::state::{
    AnswerSet, BasicsAnswers, ConsentAnswers, MonitoringAnswers, PlanPayload, SiteDetailsAnswers,
};
use serde::{Deserialize, Serialize};

/// Every step's accepted answers plus the consent flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub basics: BasicsAnswers,
    pub site_details: SiteDetailsAnswers,
    pub plan: PlanPayload,
    pub monitoring: MonitoringAnswers,
    pub consent: ConsentAnswers,
}

impl Application {
    /// Assemble from the answer set. Fails on the first step without an answer.
    pub fn from_answers(answers: &AnswerSet) -> Result<Self, WizardError> {
        fn required<T: Clone>(value: &Option<T>, key: StepKey) -> Result<T, WizardError> {
            value.clone().ok_or(WizardError::IncompleteAnswers(key))
        }

        Ok(Self {
            basics: required(&answers.basics, StepKey::Basics)?,
            site_details: required(&answers.site_details, StepKey::SiteDetails)?,
            plan: required(&answers.plan, StepKey::Plan)?,
            monitoring: required(&answers.monitoring, StepKey::Monitoring)?,
            consent: required(&answers.consent, StepKey::Consent)?,
        })
    }
}

/// Successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: String,
}
