//! Plan step payloads, one per plan variant

use super::answers::{impl_merge, Merge, Selection};
use crate::schema::PlanVariantKind;
use serde::{Deserialize, Serialize};

/// Biochar, compost and other carbon inputs produced and applied on site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarbonInputPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedstock_type: Option<String>,
    /// Tonnes per year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedstock_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_plan: Option<String>,
    /// Tonnes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_testing: Option<Selection>,
}

impl_merge!(CarbonInputPlan {
    feedstock_type,
    feedstock_volume,
    production_method,
    application_plan,
    storage_capacity,
    quality_testing,
});

/// Agroforestry, reforestation and afforestation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForestryPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species_selection: Option<Selection>,
    /// Trees per hectare
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_plan: Option<String>,
    /// Expected survival rate, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survival_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_plan: Option<String>,
}

impl_merge!(ForestryPlan {
    species_selection,
    planting_density,
    planting_method,
    maintenance_plan,
    survival_target,
    irrigation_plan,
});

/// Enhanced weathering and other mineral amendments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MineralPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mineral_type: Option<String>,
    /// Tonnes per hectare
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_measures: Option<Selection>,
}

impl_merge!(MineralPlan {
    mineral_type,
    application_rate,
    application_method,
    particle_size,
    source_location,
    transport_plan,
    application_schedule,
    monitoring_protocol,
    safety_measures,
});

/// Mangrove, seagrass and salt marsh restoration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoastalPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem_type: Option<String>,
    /// Hectares
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restoration_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restoration_techniques: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tidal_considerations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_engagement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species_list: Option<Selection>,
}

impl_merge!(CoastalPlan {
    ecosystem_type,
    restoration_area,
    restoration_techniques,
    tidal_considerations,
    community_engagement,
    species_list,
});

/// Free-form plan for project types without a dedicated form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnsupportedPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl_merge!(UnsupportedPlan { notes });

/// Payload of the conditional plan step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum PlanPayload {
    CarbonInputProduction(CarbonInputPlan),
    ForestrySystem(ForestryPlan),
    MineralApplication(MineralPlan),
    CoastalRestoration(CoastalPlan),
    Unsupported(UnsupportedPlan),
}

impl PlanPayload {
    pub fn kind(&self) -> PlanVariantKind {
        match self {
            PlanPayload::CarbonInputProduction(_) => PlanVariantKind::CarbonInputProduction,
            PlanPayload::ForestrySystem(_) => PlanVariantKind::ForestrySystem,
            PlanPayload::MineralApplication(_) => PlanVariantKind::MineralApplication,
            PlanPayload::CoastalRestoration(_) => PlanVariantKind::CoastalRestoration,
            PlanPayload::Unsupported(_) => PlanVariantKind::Unsupported,
        }
    }

    /// An empty payload of the given variant
    pub fn empty(kind: PlanVariantKind) -> Self {
        match kind {
            PlanVariantKind::CarbonInputProduction => {
                PlanPayload::CarbonInputProduction(CarbonInputPlan::default())
            }
            PlanVariantKind::ForestrySystem => PlanPayload::ForestrySystem(ForestryPlan::default()),
            PlanVariantKind::MineralApplication => {
                PlanPayload::MineralApplication(MineralPlan::default())
            }
            PlanVariantKind::CoastalRestoration => {
                PlanPayload::CoastalRestoration(CoastalPlan::default())
            }
            PlanVariantKind::Unsupported => PlanPayload::Unsupported(UnsupportedPlan::default()),
        }
    }
}

impl Merge for PlanPayload {
    /// Same-variant payloads merge field by field; a different variant replaces the record.
    fn merge(self, newer: Self) -> Self {
        match (self, newer) {
            (PlanPayload::CarbonInputProduction(a), PlanPayload::CarbonInputProduction(b)) => {
                PlanPayload::CarbonInputProduction(a.merge(b))
            }
            (PlanPayload::ForestrySystem(a), PlanPayload::ForestrySystem(b)) => {
                PlanPayload::ForestrySystem(a.merge(b))
            }
            (PlanPayload::MineralApplication(a), PlanPayload::MineralApplication(b)) => {
                PlanPayload::MineralApplication(a.merge(b))
            }
            (PlanPayload::CoastalRestoration(a), PlanPayload::CoastalRestoration(b)) => {
                PlanPayload::CoastalRestoration(a.merge(b))
            }
            (PlanPayload::Unsupported(a), PlanPayload::Unsupported(b)) => {
                PlanPayload::Unsupported(a.merge(b))
            }
            (_, newer) => newer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_matches_kind() {
        for kind in PlanVariantKind::ALL {
            assert_eq!(PlanPayload::empty(kind).kind(), kind);
        }
    }

    #[test]
    fn test_same_variant_merges_fields() {
        let a = PlanPayload::MineralApplication(MineralPlan {
            mineral_type: Some("basalt".to_string()),
            ..Default::default()
        });
        let b = PlanPayload::MineralApplication(MineralPlan {
            application_rate: Some(40.0),
            ..Default::default()
        });
        let PlanPayload::MineralApplication(merged) = a.merge(b) else {
            panic!("variant changed");
        };
        assert_eq!(merged.mineral_type.as_deref(), Some("basalt"));
        assert_eq!(merged.application_rate, Some(40.0));
    }

    #[test]
    fn test_different_variant_replaces() {
        let a = PlanPayload::empty(PlanVariantKind::ForestrySystem);
        let b = PlanPayload::empty(PlanVariantKind::Unsupported);
        assert_eq!(a.merge(b.clone()), b);
    }

    #[test]
    fn test_variant_tag_on_the_wire() {
        let json = serde_json::to_value(PlanPayload::empty(PlanVariantKind::CoastalRestoration))
            .unwrap();
        assert_eq!(json, serde_json::json!({ "variant": "coastal-restoration" }));

        let parsed: PlanPayload = serde_json::from_str(r#"{"variant":"unsupported"}"#).unwrap();
        assert_eq!(parsed, PlanPayload::empty(PlanVariantKind::Unsupported));
    }
}
