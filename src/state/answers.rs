//! Step payload records and the accumulated answer set

use super::plan::PlanPayload;
use crate::schema::StepKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of selected option identifiers
pub type Selection = BTreeSet<String>;

/// Shallow merge of two partial records of the same step: fields present in
/// `newer` overwrite, absent fields keep their previous value.
pub trait Merge {
    fn merge(self, newer: Self) -> Self;
}

macro_rules! impl_merge {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl Merge for $ty {
            fn merge(self, newer: Self) -> Self {
                Self {
                    $($field: newer.$field.or(self.$field),)+
                }
            }
        }
    };
}
pub(crate) use impl_merge;

/// Step 1: what the project is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicsAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acreage: Option<f64>,
    /// Discriminant for the plan step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

impl_merge!(BasicsAnswers {
    project_name,
    description,
    location,
    acreage,
    project_type,
    timeline,
});

/// Step 2: the land the project runs on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteDetailsAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_land_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetation_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
    /// Optional; may be empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_sources: Option<Selection>,
}

impl_merge!(SiteDetailsAnswers {
    current_land_use,
    soil_type,
    vegetation_description,
    infrastructure_description,
    accessibility,
    water_sources,
});

/// Step 4: how outcomes are measured and verified
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitoringAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_verification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_management: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_methods: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_standards: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl_merge!(MonitoringAnswers {
    monitoring_frequency,
    reporting_schedule,
    third_party_verification,
    data_management,
    measurement_methods,
    compliance_standards,
    additional_notes,
});

/// Collected on the review step right before submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsentAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_processing_consent: Option<bool>,
}

impl ConsentAnswers {
    pub fn accepted() -> Self {
        Self {
            terms_accepted: Some(true),
            data_processing_consent: Some(true),
        }
    }
}

impl_merge!(ConsentAnswers {
    terms_accepted,
    data_processing_consent,
});

/// A candidate payload for one of the navigable steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "kebab-case")]
pub enum StepPayload {
    Basics(BasicsAnswers),
    SiteDetails(SiteDetailsAnswers),
    Plan(PlanPayload),
    Monitoring(MonitoringAnswers),
}

impl StepPayload {
    pub fn key(&self) -> StepKey {
        match self {
            StepPayload::Basics(_) => StepKey::Basics,
            StepPayload::SiteDetails(_) => StepKey::SiteDetails,
            StepPayload::Plan(_) => StepKey::Plan,
            StepPayload::Monitoring(_) => StepKey::Monitoring,
        }
    }
}

/// Validated payloads accumulated across completed steps.
///
/// A key is present only once its step has been accepted. Updates replace the
/// sub-record of one step and leave the others untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basics: Option<BasicsAnswers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_details: Option<SiteDetailsAnswers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<MonitoringAnswers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent: Option<ConsentAnswers>,
}

impl AnswerSet {
    pub fn contains(&self, key: StepKey) -> bool {
        match key {
            StepKey::Basics => self.basics.is_some(),
            StepKey::SiteDetails => self.site_details.is_some(),
            StepKey::Plan => self.plan.is_some(),
            StepKey::Monitoring => self.monitoring.is_some(),
            StepKey::Consent => self.consent.is_some(),
        }
    }

    /// Project type chosen in the basics step, if any
    pub fn project_type(&self) -> Option<&str> {
        self.basics
            .as_ref()
            .and_then(|b| b.project_type.as_deref())
    }

    /// Previously accepted payload for a navigable step, used to pre-fill its form
    pub fn payload_for(&self, key: StepKey) -> Option<StepPayload> {
        match key {
            StepKey::Basics => self.basics.clone().map(StepPayload::Basics),
            StepKey::SiteDetails => self.site_details.clone().map(StepPayload::SiteDetails),
            StepKey::Plan => self.plan.clone().map(StepPayload::Plan),
            StepKey::Monitoring => self.monitoring.clone().map(StepPayload::Monitoring),
            StepKey::Consent => None,
        }
    }

    /// New answer set with `payload` shallow-merged into its step's record
    pub fn with_step(&self, payload: StepPayload) -> AnswerSet {
        let mut next = self.clone();
        match payload {
            StepPayload::Basics(new) => next.basics = Some(merge_into(next.basics, new)),
            StepPayload::SiteDetails(new) => {
                next.site_details = Some(merge_into(next.site_details, new))
            }
            StepPayload::Plan(new) => next.plan = Some(merge_into(next.plan, new)),
            StepPayload::Monitoring(new) => {
                next.monitoring = Some(merge_into(next.monitoring, new))
            }
        }
        next
    }

    /// New answer set with the consent record merged in
    pub fn with_consent(&self, consent: ConsentAnswers) -> AnswerSet {
        AnswerSet {
            consent: Some(merge_into(self.consent.clone(), consent)),
            ..self.clone()
        }
    }
}

fn merge_into<T: Merge>(previous: Option<T>, newer: T) -> T {
    match previous {
        Some(previous) => previous.merge(newer),
        None => newer,
    }
}
