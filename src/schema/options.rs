//! Closed option lists offered by the select inputs of each step

/// A selectable option: the stored identifier and its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

/// Project types offered in the basics step.
///
/// The list is what the form presents; the plan step resolves any identifier,
/// listed or not, through [`super::resolve_plan_variant`].
pub const PROJECT_TYPES: &[SelectOption] = &[
    opt("biochar", "Biochar production"),
    opt("compost", "Compost application"),
    opt("agroforestry", "Agroforestry"),
    opt("reforestation", "Reforestation"),
    opt("afforestation", "Afforestation"),
    opt("enhanced_weathering", "Enhanced rock weathering"),
    opt("rock_dust", "Rock dust application"),
    opt("mangrove", "Mangrove restoration"),
    opt("seagrass", "Seagrass restoration"),
    opt("salt_marsh", "Salt marsh restoration"),
    opt("soil_carbon", "Soil carbon management"),
    opt("other", "Other"),
];

pub const TIMELINES: &[SelectOption] = &[
    opt("under_1_year", "Less than 1 year"),
    opt("1-2_years", "1 to 2 years"),
    opt("2-5_years", "2 to 5 years"),
    opt("5-10_years", "5 to 10 years"),
    opt("over_10_years", "More than 10 years"),
];

pub const LAND_USES: &[SelectOption] = &[
    opt("cropland", "Cropland"),
    opt("grazing", "Grazing / pasture"),
    opt("forest", "Forest"),
    opt("degraded", "Degraded land"),
    opt("wetland", "Wetland"),
    opt("coastal", "Coastal"),
    opt("fallow", "Fallow"),
    opt("other", "Other"),
];

pub const SOIL_TYPES: &[SelectOption] = &[
    opt("clay", "Clay"),
    opt("sandy", "Sandy"),
    opt("loam", "Loam"),
    opt("silt", "Silt"),
    opt("peat", "Peat"),
    opt("volcanic", "Volcanic"),
    opt("mixed", "Mixed"),
    opt("unknown", "Unknown"),
];

pub const ACCESSIBILITY: &[SelectOption] = &[
    opt("paved_road", "Paved road access"),
    opt("unpaved_road", "Unpaved road access"),
    opt("seasonal", "Seasonal access only"),
    opt("boat", "Boat access"),
    opt("remote", "Remote / on foot"),
];

/// Returns true if `value` is one of `options`.
pub fn is_listed(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}
