//! Step schema registry
//!
//! Static description of the application wizard: the fixed step order, the
//! position of the conditional plan step, and the rule that picks the plan
//! variant from the project type chosen in the basics step.

pub mod options;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Total number of wizard steps, counting the review and done steps
pub const TOTAL_STEPS: usize = 6;

/// Index of the first step
pub const FIRST_STEP: usize = 1;

/// Index of the review step, where consent is collected and the application submitted
pub const REVIEW_STEP: usize = 5;

/// Index of the terminal step, reached only through a successful submission
pub const DONE_STEP: usize = TOTAL_STEPS;

/// Keys of the answer set, one per step that produces a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKey {
    Basics,
    SiteDetails,
    Plan,
    Monitoring,
    Consent,
}

impl StepKey {
    /// Every key in answer order
    pub const ALL: [StepKey; 5] = [
        StepKey::Basics,
        StepKey::SiteDetails,
        StepKey::Plan,
        StepKey::Monitoring,
        StepKey::Consent,
    ];

    /// The key collected at a given step index. The review step collects consent;
    /// the done step collects nothing.
    pub fn at(index: usize) -> Option<StepKey> {
        match index {
            1 => Some(StepKey::Basics),
            2 => Some(StepKey::SiteDetails),
            3 => Some(StepKey::Plan),
            4 => Some(StepKey::Monitoring),
            REVIEW_STEP => Some(StepKey::Consent),
            _ => None,
        }
    }

    /// Step index at which this key is collected
    pub fn index(&self) -> usize {
        match self {
            StepKey::Basics => 1,
            StepKey::SiteDetails => 2,
            StepKey::Plan => 3,
            StepKey::Monitoring => 4,
            StepKey::Consent => REVIEW_STEP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKey::Basics => "basics",
            StepKey::SiteDetails => "site-details",
            StepKey::Plan => "plan",
            StepKey::Monitoring => "monitoring",
            StepKey::Consent => "consent",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete shape of the conditional plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanVariantKind {
    CarbonInputProduction,
    ForestrySystem,
    MineralApplication,
    CoastalRestoration,
    /// Project types without a dedicated plan form. No required fields.
    Unsupported,
}

impl PlanVariantKind {
    pub const ALL: [PlanVariantKind; 5] = [
        PlanVariantKind::CarbonInputProduction,
        PlanVariantKind::ForestrySystem,
        PlanVariantKind::MineralApplication,
        PlanVariantKind::CoastalRestoration,
        PlanVariantKind::Unsupported,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanVariantKind::CarbonInputProduction => "carbon-input-production",
            PlanVariantKind::ForestrySystem => "forestry-system",
            PlanVariantKind::MineralApplication => "mineral-application",
            PlanVariantKind::CoastalRestoration => "coastal-restoration",
            PlanVariantKind::Unsupported => "unsupported",
        }
    }

    /// Heading shown above the plan step
    pub fn title(&self) -> &'static str {
        match self {
            PlanVariantKind::CarbonInputProduction => "Production & Application Plan",
            PlanVariantKind::ForestrySystem => "Planting & Management Plan",
            PlanVariantKind::MineralApplication => "Mineral Application Plan",
            PlanVariantKind::CoastalRestoration => "Coastal Restoration Plan",
            PlanVariantKind::Unsupported => "Project Plan",
        }
    }
}

impl fmt::Display for PlanVariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the plan variant for a project type.
///
/// Total: identifiers without a dedicated plan form, including empty or
/// unknown strings, resolve to [`PlanVariantKind::Unsupported`].
pub fn resolve_plan_variant(project_type: &str) -> PlanVariantKind {
    match project_type.trim().to_ascii_lowercase().as_str() {
        "biochar" | "compost" => PlanVariantKind::CarbonInputProduction,
        "agroforestry" | "reforestation" | "afforestation" => PlanVariantKind::ForestrySystem,
        "enhanced_weathering" | "rock_dust" => PlanVariantKind::MineralApplication,
        "mangrove" | "seagrass" | "salt_marsh" => PlanVariantKind::CoastalRestoration,
        _ => PlanVariantKind::Unsupported,
    }
}

/// A wizard position as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Basics,
    SiteDetails,
    /// The conditional step, carrying the variant resolved on entry
    Plan(PlanVariantKind),
    Monitoring,
    Review,
    /// Terminal step after a successful submission
    Done(String),
}

impl Step {
    pub fn index(&self) -> usize {
        match self {
            Step::Basics => 1,
            Step::SiteDetails => 2,
            Step::Plan(_) => 3,
            Step::Monitoring => 4,
            Step::Review => REVIEW_STEP,
            Step::Done(_) => DONE_STEP,
        }
    }

    /// The answer key collected at this step, if any
    pub fn key(&self) -> Option<StepKey> {
        StepKey::at(self.index())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Basics => "basics",
            Step::SiteDetails => "site-details",
            Step::Plan(_) => "plan",
            Step::Monitoring => "monitoring",
            Step::Review => "review",
            Step::Done(_) => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Basics => "Project Basics",
            Step::SiteDetails => "Site Details",
            Step::Plan(kind) => kind.title(),
            Step::Monitoring => "Monitoring & Verification",
            Step::Review => "Review & Submit",
            Step::Done(_) => "Application Submitted",
        }
    }

    /// Whether the step offers a back action
    pub fn can_go_back(&self) -> bool {
        !matches!(self, Step::Basics | Step::Done(_))
    }
}
