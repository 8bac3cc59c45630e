//! Step validation
//!
//! One pure check per step. A check either hands the payload back wrapped in
//! [`Validated`] or returns a [`FieldErrors`] map with one entry per invalid
//! field. Checks never panic and never depend on anything but the payload.

mod field_errors;
mod rules;

pub use field_errors::FieldErrors;

use crate::schema::options::{ACCESSIBILITY, LAND_USES, SOIL_TYPES, TIMELINES};
use crate::state::{
    BasicsAnswers, CarbonInputPlan, CoastalPlan, ConsentAnswers, ForestryPlan, MineralPlan,
    MonitoringAnswers, PlanPayload, SiteDetailsAnswers, StepPayload,
};
use rules::Rules;

/// Field key used for the combined consent error
pub const CONSENT_FIELD: &str = "consent";

/// A payload that passed its step's validation
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Validate a payload for one of the navigable steps
pub fn validate_step(payload: StepPayload) -> Result<Validated<StepPayload>, FieldErrors> {
    let checked = match &payload {
        StepPayload::Basics(p) => basics(p),
        StepPayload::SiteDetails(p) => site_details(p),
        StepPayload::Plan(p) => plan(p),
        StepPayload::Monitoring(p) => monitoring(p),
    };
    checked.map(|()| Validated(payload))
}

/// Validate the consent collected on the review step.
///
/// Both flags must be true. Either one missing yields a single combined error.
pub fn validate_consent(
    consent: ConsentAnswers,
) -> Result<Validated<ConsentAnswers>, FieldErrors> {
    let accepted =
        consent.terms_accepted == Some(true) && consent.data_processing_consent == Some(true);
    if accepted {
        return Ok(Validated(consent));
    }
    let mut errors = FieldErrors::new();
    errors.insert(
        CONSENT_FIELD,
        "Please accept the terms and consent to data processing to submit",
    );
    Err(errors)
}

fn basics(p: &BasicsAnswers) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .text("projectName", &p.project_name, "Project name")
        .text("description", &p.description, "Project description")
        .text("location", &p.location, "Location")
        .positive("acreage", p.acreage, "Acreage")
        .selected("projectType", &p.project_type, "a project type")
        .choice("timeline", &p.timeline, TIMELINES, "a timeline");
    rules.finish(())
}

fn site_details(p: &SiteDetailsAnswers) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .choice(
            "currentLandUse",
            &p.current_land_use,
            LAND_USES,
            "the current land use",
        )
        .choice("soilType", &p.soil_type, SOIL_TYPES, "a soil type")
        .text(
            "vegetationDescription",
            &p.vegetation_description,
            "Vegetation description",
        )
        .text(
            "infrastructureDescription",
            &p.infrastructure_description,
            "Infrastructure description",
        )
        .choice(
            "accessibility",
            &p.accessibility,
            ACCESSIBILITY,
            "site accessibility",
        );
    rules.finish(())
}

fn plan(p: &PlanPayload) -> Result<(), FieldErrors> {
    match p {
        PlanPayload::CarbonInputProduction(p) => carbon_input(p),
        PlanPayload::ForestrySystem(p) => forestry(p),
        PlanPayload::MineralApplication(p) => mineral(p),
        PlanPayload::CoastalRestoration(p) => coastal(p),
        PlanPayload::Unsupported(_) => Ok(()),
    }
}

fn carbon_input(p: &CarbonInputPlan) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .selected("feedstockType", &p.feedstock_type, "a feedstock type")
        .positive("feedstockVolume", p.feedstock_volume, "Feedstock volume")
        .selected("productionMethod", &p.production_method, "a production method")
        .text("applicationPlan", &p.application_plan, "Application plan")
        .positive("storageCapacity", p.storage_capacity, "Storage capacity");
    rules.finish(())
}

fn forestry(p: &ForestryPlan) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .at_least_one("speciesSelection", &p.species_selection, "species")
        .positive("plantingDensity", p.planting_density, "Planting density")
        .selected("plantingMethod", &p.planting_method, "a planting method")
        .text("maintenancePlan", &p.maintenance_plan, "Maintenance plan")
        .percentage("survivalTarget", p.survival_target, "Survival target");
    rules.finish(())
}

fn mineral(p: &MineralPlan) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .selected("mineralType", &p.mineral_type, "a mineral type")
        .positive("applicationRate", p.application_rate, "Application rate")
        .selected(
            "applicationMethod",
            &p.application_method,
            "an application method",
        )
        .selected("particleSize", &p.particle_size, "a particle size")
        .text("sourceLocation", &p.source_location, "Source location")
        .text("transportPlan", &p.transport_plan, "Transport plan")
        .selected(
            "applicationSchedule",
            &p.application_schedule,
            "an application schedule",
        )
        .text(
            "monitoringProtocol",
            &p.monitoring_protocol,
            "Monitoring protocol",
        );
    rules.finish(())
}

fn coastal(p: &CoastalPlan) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .selected("ecosystemType", &p.ecosystem_type, "an ecosystem type")
        .positive("restorationArea", p.restoration_area, "Restoration area")
        .at_least_one(
            "restorationTechniques",
            &p.restoration_techniques,
            "restoration technique",
        )
        .text(
            "tidalConsiderations",
            &p.tidal_considerations,
            "Tidal considerations",
        )
        .text(
            "communityEngagement",
            &p.community_engagement,
            "Community engagement plan",
        );
    rules.finish(())
}

fn monitoring(p: &MonitoringAnswers) -> Result<(), FieldErrors> {
    let mut rules = Rules::new();
    rules
        .selected(
            "monitoringFrequency",
            &p.monitoring_frequency,
            "a monitoring frequency",
        )
        .selected(
            "reportingSchedule",
            &p.reporting_schedule,
            "a reporting schedule",
        )
        .selected(
            "thirdPartyVerification",
            &p.third_party_verification,
            "a verification approach",
        )
        .selected(
            "dataManagement",
            &p.data_management,
            "a data management approach",
        )
        .at_least_one(
            "measurementMethods",
            &p.measurement_methods,
            "measurement method",
        )
        .at_least_one(
            "complianceStandards",
            &p.compliance_standards,
            "compliance standard",
        );
    rules.finish(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PlanVariantKind;
    use crate::state::Selection;
    use pretty_assertions::assert_eq;

    fn set(values: &[&str]) -> Option<Selection> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn valid_basics() -> BasicsAnswers {
        BasicsAnswers {
            project_name: Some("Mauna Grove".into()),
            description: Some("Biochar from invasive albizia".into()),
            location: Some("Hilo, Hawaii".into()),
            acreage: Some(120.0),
            project_type: Some("biochar".into()),
            timeline: Some("2-5_years".into()),
        }
    }

    fn valid_monitoring() -> MonitoringAnswers {
        MonitoringAnswers {
            monitoring_frequency: Some("quarterly".into()),
            reporting_schedule: Some("annual".into()),
            third_party_verification: Some("accredited_verifier".into()),
            data_management: Some("cloud_platform".into()),
            measurement_methods: set(&["soil_sampling"]),
            compliance_standards: set(&["iso_14064"]),
            additional_notes: None,
        }
    }

    fn error_fields(result: Result<Validated<StepPayload>, FieldErrors>) -> Vec<String> {
        result
            .err()
            .map(|e| e.fields().map(str::to_string).collect())
            .unwrap_or_default()
    }

    mod basics_step {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_payload_is_accepted() {
            let payload = StepPayload::Basics(valid_basics());
            let validated = validate_step(payload.clone()).unwrap();
            assert_eq!(validated.into_inner(), payload);
        }

        #[test]
        fn test_empty_payload_reports_every_field() {
            let fields = error_fields(validate_step(StepPayload::Basics(Default::default())));
            assert_eq!(
                fields,
                vec![
                    "acreage",
                    "description",
                    "location",
                    "projectName",
                    "projectType",
                    "timeline"
                ]
            );
        }

        #[test]
        fn test_whitespace_name_is_rejected() {
            let payload = StepPayload::Basics(BasicsAnswers {
                project_name: Some("  \t".into()),
                ..valid_basics()
            });
            assert_eq!(error_fields(validate_step(payload)), vec!["projectName"]);
        }

        #[test]
        fn test_non_positive_acreage_is_rejected() {
            let payload = StepPayload::Basics(BasicsAnswers {
                acreage: Some(0.0),
                ..valid_basics()
            });
            assert_eq!(error_fields(validate_step(payload)), vec!["acreage"]);
        }

        #[test]
        fn test_unlisted_project_type_is_accepted() {
            let payload = StepPayload::Basics(BasicsAnswers {
                project_type: Some("unlisted_experimental".into()),
                ..valid_basics()
            });
            assert!(validate_step(payload).is_ok());
        }

        #[test]
        fn test_unlisted_timeline_is_rejected() {
            let payload = StepPayload::Basics(BasicsAnswers {
                timeline: Some("eventually".into()),
                ..valid_basics()
            });
            assert_eq!(error_fields(validate_step(payload)), vec!["timeline"]);
        }
    }

    mod site_details_step {
        use super::*;
        use pretty_assertions::assert_eq;

        fn valid() -> SiteDetailsAnswers {
            SiteDetailsAnswers {
                current_land_use: Some("degraded".into()),
                soil_type: Some("volcanic".into()),
                vegetation_description: Some("Invasive albizia stands".into()),
                infrastructure_description: Some("Gravel road, shed".into()),
                accessibility: Some("unpaved_road".into()),
                water_sources: None,
            }
        }

        #[test]
        fn test_water_sources_are_optional() {
            assert!(validate_step(StepPayload::SiteDetails(valid())).is_ok());
            let empty = SiteDetailsAnswers {
                water_sources: Some(Selection::new()),
                ..valid()
            };
            assert!(validate_step(StepPayload::SiteDetails(empty)).is_ok());
        }

        #[test]
        fn test_unknown_soil_type_is_rejected() {
            let payload = SiteDetailsAnswers {
                soil_type: Some("granite".into()),
                ..valid()
            };
            assert_eq!(
                error_fields(validate_step(StepPayload::SiteDetails(payload))),
                vec!["soilType"]
            );
        }
    }

    mod plan_step {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_carbon_input_plan_errors() {
            let payload = StepPayload::Plan(PlanPayload::empty(
                PlanVariantKind::CarbonInputProduction,
            ));
            assert_eq!(
                error_fields(validate_step(payload)),
                vec![
                    "applicationPlan",
                    "feedstockType",
                    "feedstockVolume",
                    "productionMethod",
                    "storageCapacity"
                ]
            );
        }

        #[test]
        fn test_empty_mineral_plan_errors_exclude_safety_measures() {
            let payload =
                StepPayload::Plan(PlanPayload::empty(PlanVariantKind::MineralApplication));
            let fields = error_fields(validate_step(payload));
            assert_eq!(fields.len(), 8);
            assert!(!fields.contains(&"safetyMeasures".to_string()));
        }

        #[test]
        fn test_valid_mineral_plan_without_safety_measures() {
            let payload = StepPayload::Plan(PlanPayload::MineralApplication(MineralPlan {
                mineral_type: Some("basalt".into()),
                application_rate: Some(40.0),
                application_method: Some("broadcast_spreader".into()),
                particle_size: Some("fine".into()),
                source_location: Some("Kona quarry".into()),
                transport_plan: Some("Truck, 30 km".into()),
                application_schedule: Some("annual".into()),
                monitoring_protocol: Some("Soil pH and alkalinity sampling".into()),
                safety_measures: None,
            }));
            assert!(validate_step(payload).is_ok());
        }

        #[test]
        fn test_forestry_survival_target_range() {
            let payload = |target| {
                StepPayload::Plan(PlanPayload::ForestrySystem(ForestryPlan {
                    species_selection: set(&["koa"]),
                    planting_density: Some(400.0),
                    planting_method: Some("seedlings".into()),
                    maintenance_plan: Some("Weeding for 3 years".into()),
                    survival_target: Some(target),
                    irrigation_plan: None,
                }))
            };
            assert!(validate_step(payload(85.0)).is_ok());
            assert_eq!(
                error_fields(validate_step(payload(120.0))),
                vec!["survivalTarget"]
            );
        }

        #[test]
        fn test_empty_coastal_plan_errors() {
            let payload =
                StepPayload::Plan(PlanPayload::empty(PlanVariantKind::CoastalRestoration));
            assert_eq!(error_fields(validate_step(payload)).len(), 5);
        }

        #[test]
        fn test_unsupported_plan_always_validates() {
            let payload = StepPayload::Plan(PlanPayload::empty(PlanVariantKind::Unsupported));
            assert!(validate_step(payload).is_ok());
        }
    }

    mod monitoring_step {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_measurement_methods_rejected() {
            let payload = StepPayload::Monitoring(MonitoringAnswers {
                measurement_methods: Some(Selection::new()),
                ..valid_monitoring()
            });
            let errors = validate_step(payload).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get("measurementMethods"),
                Some("Please select at least one measurement method")
            );
        }

        #[test]
        fn test_one_measurement_method_accepted() {
            assert!(validate_step(StepPayload::Monitoring(valid_monitoring())).is_ok());
        }

        #[test]
        fn test_compliance_standards_required() {
            let payload = StepPayload::Monitoring(MonitoringAnswers {
                compliance_standards: None,
                ..valid_monitoring()
            });
            assert_eq!(
                error_fields(validate_step(payload)),
                vec!["complianceStandards"]
            );
        }
    }

    mod consent_step {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_both_flags_required() {
            assert!(validate_consent(ConsentAnswers::accepted()).is_ok());

            let cases = [
                ConsentAnswers::default(),
                ConsentAnswers {
                    terms_accepted: Some(false),
                    data_processing_consent: Some(true),
                },
                ConsentAnswers {
                    terms_accepted: Some(true),
                    data_processing_consent: None,
                },
            ];
            for consent in cases {
                let errors = validate_consent(consent).unwrap_err();
                assert_eq!(errors.len(), 1);
                assert!(errors.contains(CONSENT_FIELD));
            }
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let payloads = [
            StepPayload::Basics(BasicsAnswers::default()),
            StepPayload::Basics(valid_basics()),
            StepPayload::Plan(PlanPayload::empty(PlanVariantKind::ForestrySystem)),
            StepPayload::Monitoring(valid_monitoring()),
        ];
        for payload in payloads {
            let first = validate_step(payload.clone());
            let second = validate_step(payload);
            assert_eq!(first, second);
        }
    }
}
